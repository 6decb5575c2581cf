//! Mirror the selection.

use super::{bounds_of, capture, movable_selection, restore};
use crate::board::Board;
use crate::error::EditorResult;
use crate::geometry::{Orientation, snap_to_grid};
use crate::items::BoardItem;
use crate::undo::UndoCommand;

/// Mirrors all selected items around the grid-aligned center of the selection.
/// Devices and texts change board side.
#[derive(Debug)]
pub struct FlipSelectedItems {
    orientation: Orientation,
    grid_interval: f64,
    original: Vec<BoardItem>,
    modified: Vec<BoardItem>,
}

impl FlipSelectedItems {
    pub fn new(orientation: Orientation, grid_interval: f64) -> Self {
        Self {
            orientation,
            grid_interval,
            original: Vec::new(),
            modified: Vec::new(),
        }
    }
}

impl UndoCommand for FlipSelectedItems {
    fn description(&self) -> &str {
        "Flip board elements"
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        let ids = movable_selection(board);
        let Some(bounds) = bounds_of(board, &ids) else {
            return Ok(false);
        };
        let center = snap_to_grid(bounds.center(), self.grid_interval);
        self.original = capture(board, &ids);
        for &id in &ids {
            board.update_item(id, |item| item.mirror(center, self.orientation))?;
        }
        self.modified = capture(board, &ids);
        Ok(self.modified != self.original)
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        restore(board, &self.original)
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        restore(board, &self.modified)
    }
}
