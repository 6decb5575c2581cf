//! Replace the outline path of a polygon or plane.

use crate::board::Board;
use crate::error::{EditorError, EditorResult};
use crate::geometry::Path;
use crate::outline::OutlineTarget;
use crate::undo::UndoCommand;

/// Sets a new outline on a polygon or plane.
///
/// [`set_path`](Self::set_path) with `immediate = true` shows the path on the
/// board right away, which is how vertex dragging previews its result.
#[derive(Debug)]
pub struct OutlineEditCommand {
    target: OutlineTarget,
    description: String,
    original: Path,
    new_path: Option<Path>,
}

impl OutlineEditCommand {
    pub fn new(board: &Board, target: OutlineTarget) -> EditorResult<Self> {
        let original = board
            .outline(target)
            .cloned()
            .ok_or(EditorError::ItemNotFound(target.item_id()))?;
        let description = match target {
            OutlineTarget::Polygon(_) => "Edit polygon",
            OutlineTarget::Plane(_) => "Edit plane",
        };
        Ok(Self {
            target,
            description: description.to_string(),
            original,
            new_path: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn target(&self) -> OutlineTarget {
        self.target
    }

    /// The path this command will set.
    pub fn path(&self) -> &Path {
        self.new_path.as_ref().unwrap_or(&self.original)
    }

    pub fn set_path(&mut self, board: &mut Board, path: Path, immediate: bool) -> EditorResult<()> {
        if immediate {
            board.set_outline(self.target, path.clone())?;
        }
        self.new_path = Some(path);
        Ok(())
    }

    /// Put the original outline back.
    pub fn discard(&mut self, board: &mut Board) -> EditorResult<()> {
        board.set_outline(self.target, self.original.clone())?;
        self.new_path = None;
        Ok(())
    }
}

impl UndoCommand for OutlineEditCommand {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        let Some(path) = self.new_path.clone() else {
            return Ok(false);
        };
        let modified = path != self.original;
        board.set_outline(self.target, path)?;
        Ok(modified)
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        board.set_outline(self.target, self.original.clone())
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        match &self.new_path {
            Some(path) => board.set_outline(self.target, path.clone()),
            None => Ok(()),
        }
    }
}
