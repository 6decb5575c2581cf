//! Length of a chain of selected traces.

use crate::board::Board;
use crate::error::MeasureError;
use crate::items::{BoardItem, ItemId};
use std::collections::HashSet;

const MM_PER_INCH: f64 = 25.4;

/// Result of [`measure_trace`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraceMeasurement {
    /// Summed length of the visited traces in millimetres.
    pub total_length: f64,
    /// Traces making up the chain, the seed first.
    pub visited: Vec<ItemId>,
    /// Number of traces selected on the board.
    pub selected_count: usize,
}

impl TraceMeasurement {
    pub fn length_mm(&self) -> f64 {
        self.total_length
    }

    pub fn length_inch(&self) -> f64 {
        self.total_length / MM_PER_INCH
    }

    /// Whether the chain covers every selected trace.
    pub fn is_connected(&self) -> bool {
        self.visited.len() == self.selected_count
    }
}

/// Measure the linear chain of selected traces through `seed`.
///
/// The chain is followed from the end anchor of the seed, then from its start
/// anchor. An anchor with more than one unvisited selected trace fails with
/// [`MeasureError::Branch`].
pub fn measure_trace(board: &Board, seed: ItemId) -> Result<TraceMeasurement, MeasureError> {
    let line = board.net_line(seed).ok_or(MeasureError::NotANetLine(seed))?;
    if !board.is_selected(seed) {
        return Err(MeasureError::SeedNotSelected(seed));
    }

    let mut visited = vec![seed];
    let mut seen: HashSet<ItemId> = HashSet::from([seed]);
    let mut total_length = line.length();

    for start in [line.end(), line.start()] {
        let mut anchor_id = start;
        loop {
            let Some(anchor) = board.anchor(anchor_id) else {
                break;
            };
            let mut candidates = anchor
                .net_lines()
                .iter()
                .copied()
                .filter(|id| !seen.contains(id) && board.is_selected(*id));
            let Some(next) = candidates.next() else {
                break;
            };
            if candidates.next().is_some() {
                log::warn!("Trace branches at anchor {anchor_id}");
                return Err(MeasureError::Branch);
            }
            let Some(next_line) = board.net_line(next) else {
                break;
            };
            total_length += next_line.length();
            seen.insert(next);
            visited.push(next);
            match next_line.other_anchor(anchor_id) {
                Some(other) => anchor_id = other,
                None => break,
            }
        }
    }

    let selected_count = board
        .items_ordered()
        .filter(|i| i.is_selected() && matches!(i, BoardItem::NetLine(_)))
        .count();
    let measurement = TraceMeasurement {
        total_length,
        visited,
        selected_count,
    };
    if measurement.is_connected() {
        log::info!(
            "Trace length: {:.3} mm ({:.4} in)",
            measurement.length_mm(),
            measurement.length_inch()
        );
    } else {
        log::warn!(
            "Measured {} of {} selected traces; the selection is not one connected trace",
            measurement.visited.len(),
            measurement.selected_count
        );
    }
    Ok(measurement)
}
