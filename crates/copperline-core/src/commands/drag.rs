//! Interactive move/rotate of the selection.

use super::{bounds_of, capture, movable_selection, restore};
use crate::board::Board;
use crate::error::EditorResult;
use crate::geometry::{Angle, snap_to_grid, snap_vec_to_grid};
use crate::items::{BoardItem, ItemId};
use crate::undo::UndoCommand;
use kurbo::{Point, Vec2};

/// Moves the selected items while the pointer is dragged.
///
/// Position updates are applied to the board immediately for live feedback.
/// Executing the command through the undo stack records the difference
/// between the captured start state and the board at that moment;
/// [`discard`](Self::discard) reverts every live change instead.
#[derive(Debug)]
pub struct DragSelectedItems {
    start_pos: Point,
    grid_interval: f64,
    delta: Vec2,
    item_ids: Vec<ItemId>,
    original: Vec<BoardItem>,
    modified: Vec<BoardItem>,
}

impl DragSelectedItems {
    /// Capture the current selection. `start_pos` is where the drag began.
    pub fn new(board: &Board, start_pos: Point, grid_interval: f64) -> Self {
        let item_ids = movable_selection(board);
        let original = capture(board, &item_ids);
        Self {
            start_pos,
            grid_interval,
            delta: Vec2::ZERO,
            item_ids,
            original,
            modified: Vec::new(),
        }
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    /// Current grid-snapped offset from the start position.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Move the items so that they are offset by the grid-snapped distance
    /// between `pos` and the start position.
    pub fn set_current_position(&mut self, board: &mut Board, pos: Point) -> EditorResult<()> {
        let delta = snap_vec_to_grid(pos - self.start_pos, self.grid_interval);
        if delta == self.delta {
            return Ok(());
        }
        let step = delta - self.delta;
        for &id in &self.item_ids {
            board.update_item(id, |item| item.translate(step))?;
        }
        self.delta = delta;
        Ok(())
    }

    /// Rotate the items around the grid-aligned center of their bounds.
    pub fn rotate(&mut self, board: &mut Board, angle: Angle) -> EditorResult<()> {
        let Some(bounds) = bounds_of(board, &self.item_ids) else {
            return Ok(());
        };
        let center = snap_to_grid(bounds.center(), self.grid_interval);
        for &id in &self.item_ids {
            board.update_item(id, |item| item.rotate(center, angle))?;
        }
        Ok(())
    }

    pub fn snap_to_grid(&mut self, board: &mut Board) -> EditorResult<()> {
        let grid = self.grid_interval;
        for &id in &self.item_ids {
            board.update_item(id, |item| item.snap_to_grid(grid))?;
        }
        Ok(())
    }

    /// Move texts attached to dragged devices back to their default placement.
    pub fn reset_all_texts(&mut self, board: &mut Board) -> EditorResult<()> {
        for &id in &self.item_ids {
            let Some(device) = board
                .item(id)
                .and_then(BoardItem::as_stroke_text)
                .and_then(|t| t.device())
                .and_then(|d| board.device(d))
                .cloned()
            else {
                continue;
            };
            board.update_item(id, |item| {
                if let BoardItem::StrokeText(text) = item {
                    text.reset_to_default(&device);
                }
            })?;
        }
        Ok(())
    }

    /// Revert all live changes.
    pub fn discard(&mut self, board: &mut Board) -> EditorResult<()> {
        restore(board, &self.original)?;
        self.delta = Vec2::ZERO;
        Ok(())
    }
}

impl UndoCommand for DragSelectedItems {
    fn description(&self) -> &str {
        "Drag board elements"
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        self.modified = capture(board, &self.item_ids);
        Ok(self.modified != self.original)
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        restore(board, &self.original)
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        restore(board, &self.modified)
    }
}
