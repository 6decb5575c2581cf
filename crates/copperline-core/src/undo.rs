//! Undo/redo command stack with atomic command groups.
//!
//! Every board modification is an [`UndoCommand`]. Commands either run on their
//! own ([`UndoStack::exec_command`]) or are collected into a group opened with
//! [`UndoStack::begin_group`]. An open group is committed as one undo entry or
//! aborted, which reverts every command appended to it.

use crate::board::Board;
use crate::config::{DEFAULT_MAX_UNDO_DEPTH, EditorConfig};
use crate::error::{EditorResult, UndoError};
use std::collections::VecDeque;
use std::fmt;

/// A reversible board modification.
pub trait UndoCommand: fmt::Debug {
    /// Human-readable label, e.g. "Drag board elements".
    fn description(&self) -> &str;

    /// Perform the command for the first time.
    ///
    /// Returns whether the board was modified. Commands that changed nothing
    /// are dropped instead of being recorded.
    fn execute(&mut self, board: &mut Board) -> EditorResult<bool>;

    fn undo(&mut self, board: &mut Board) -> EditorResult<()>;

    fn redo(&mut self, board: &mut Board) -> EditorResult<()>;
}

/// Commands recorded as one undo entry.
#[derive(Debug)]
pub struct CommandGroup {
    description: String,
    children: Vec<Box<dyn UndoCommand>>,
}

impl CommandGroup {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl UndoCommand for CommandGroup {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        let mut modified = false;
        for child in &mut self.children {
            modified |= child.execute(board)?;
        }
        Ok(modified)
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        for child in self.children.iter_mut().rev() {
            child.undo(board)?;
        }
        Ok(())
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        for child in &mut self.children {
            child.redo(board)?;
        }
        Ok(())
    }
}

/// Linear undo/redo history.
///
/// At most one command group can be open. While it is open, standalone
/// commands as well as undo and redo are refused.
#[derive(Debug)]
pub struct UndoStack {
    undo_stack: VecDeque<Box<dyn UndoCommand>>,
    redo_stack: Vec<Box<dyn UndoCommand>>,
    active_group: Option<CommandGroup>,
    max_depth: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_DEPTH)
    }
}

impl UndoStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            active_group: None,
            max_depth: max_depth.max(1),
        }
    }

    /// Stack bounded by the configured undo depth.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.max_undo_depth)
    }

    pub fn is_group_active(&self) -> bool {
        self.active_group.is_some()
    }

    /// Open a command group.
    pub fn begin_group(&mut self, description: impl Into<String>) -> Result<(), UndoError> {
        if self.active_group.is_some() {
            return Err(UndoError::GroupAlreadyActive);
        }
        let group = CommandGroup::new(description);
        log::debug!("Begin command group \"{}\"", group.description);
        self.active_group = Some(group);
        Ok(())
    }

    /// Execute a command and append it to the open group.
    ///
    /// Returns whether the command modified the board. A command that changed
    /// nothing is dropped.
    pub fn append_to_group(
        &mut self,
        board: &mut Board,
        mut command: Box<dyn UndoCommand>,
    ) -> EditorResult<bool> {
        let group = self.active_group.as_mut().ok_or(UndoError::NoActiveGroup)?;
        let modified = command.execute(board)?;
        if modified {
            group.children.push(command);
        }
        Ok(modified)
    }

    /// Close the open group and record it as one undo entry.
    ///
    /// An empty group is discarded; returns whether an entry was recorded.
    pub fn commit_group(&mut self) -> Result<bool, UndoError> {
        let group = self.active_group.take().ok_or(UndoError::NoActiveGroup)?;
        log::debug!(
            "Commit command group \"{}\" ({} commands)",
            group.description,
            group.len()
        );
        if group.is_empty() {
            return Ok(false);
        }
        self.push(Box::new(group));
        Ok(true)
    }

    /// Close the open group and revert every command appended to it.
    pub fn abort_group(&mut self, board: &mut Board) -> EditorResult<()> {
        let mut group = self.active_group.take().ok_or(UndoError::NoActiveGroup)?;
        log::debug!("Abort command group \"{}\"", group.description);
        group.undo(board)
    }

    /// Execute a standalone command and record it.
    ///
    /// Returns whether the command modified the board.
    pub fn exec_command(
        &mut self,
        board: &mut Board,
        mut command: Box<dyn UndoCommand>,
    ) -> EditorResult<bool> {
        if self.active_group.is_some() {
            return Err(UndoError::GroupActive.into());
        }
        let modified = command.execute(board)?;
        if modified {
            log::debug!("Executed \"{}\"", command.description());
            self.push(command);
        }
        Ok(modified)
    }

    fn push(&mut self, command: Box<dyn UndoCommand>) {
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    pub fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        if self.active_group.is_some() {
            return Err(UndoError::GroupActive.into());
        }
        let mut command = self.undo_stack.pop_back().ok_or(UndoError::NothingToUndo)?;
        command.undo(board)?;
        self.redo_stack.push(command);
        Ok(())
    }

    pub fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        if self.active_group.is_some() {
            return Err(UndoError::GroupActive.into());
        }
        let mut command = self.redo_stack.pop().ok_or(UndoError::NothingToRedo)?;
        command.redo(board)?;
        self.undo_stack.push_back(command);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.active_group.is_none() && !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.active_group.is_none() && !self.redo_stack.is_empty()
    }

    /// Description of the entry [`undo`](Self::undo) would revert.
    pub fn undo_text(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn redo_text(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::items::{Hole, ItemId};
    use kurbo::{Point, Vec2};

    /// Moves one item by a fixed offset.
    #[derive(Debug)]
    struct Nudge {
        id: ItemId,
        delta: Vec2,
    }

    impl UndoCommand for Nudge {
        fn description(&self) -> &str {
            "Nudge"
        }

        fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
            self.redo(board)?;
            Ok(self.delta != Vec2::ZERO)
        }

        fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
            board.update_item(self.id, |i| i.translate(-self.delta))
        }

        fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
            board.update_item(self.id, |i| i.translate(self.delta))
        }
    }

    fn board_with_hole() -> (Board, ItemId) {
        let mut board = Board::new("test");
        let id = board.add_item(Hole::new(Point::ZERO, 1.0)).unwrap();
        (board, id)
    }

    fn pos(board: &Board, id: ItemId) -> Point {
        board.item(id).unwrap().position().unwrap()
    }

    fn nudge(id: ItemId, x: f64) -> Box<dyn UndoCommand> {
        Box::new(Nudge {
            id,
            delta: Vec2::new(x, 0.0),
        })
    }

    #[test]
    fn test_exec_undo_redo() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        assert!(stack.exec_command(&mut board, nudge(id, 1.0)).unwrap());
        assert_eq!(pos(&board, id), Point::new(1.0, 0.0));
        assert_eq!(stack.undo_text(), Some("Nudge"));

        stack.undo(&mut board).unwrap();
        assert_eq!(pos(&board, id), Point::ZERO);
        assert!(stack.can_redo());

        stack.redo(&mut board).unwrap();
        assert_eq!(pos(&board, id), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_unmodified_command_not_recorded() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        assert!(!stack.exec_command(&mut board, nudge(id, 0.0)).unwrap());
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_group_commit_is_one_entry() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        stack.begin_group("Two nudges").unwrap();
        stack.append_to_group(&mut board, nudge(id, 1.0)).unwrap();
        stack.append_to_group(&mut board, nudge(id, 2.0)).unwrap();
        assert!(stack.commit_group().unwrap());
        assert_eq!(stack.undo_count(), 1);
        assert_eq!(stack.undo_text(), Some("Two nudges"));

        stack.undo(&mut board).unwrap();
        assert_eq!(pos(&board, id), Point::ZERO);
    }

    #[test]
    fn test_group_abort_reverts_children() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        stack.begin_group("Aborted").unwrap();
        stack.append_to_group(&mut board, nudge(id, 3.0)).unwrap();
        stack.abort_group(&mut board).unwrap();
        assert_eq!(pos(&board, id), Point::ZERO);
        assert!(!stack.is_group_active());
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_empty_group_commit_records_nothing() {
        let mut stack = UndoStack::default();
        stack.begin_group("Empty").unwrap();
        assert!(!stack.commit_group().unwrap());
        assert_eq!(stack.undo_count(), 0);
    }

    #[test]
    fn test_protocol_violations() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        assert_eq!(stack.commit_group(), Err(UndoError::NoActiveGroup));
        assert!(matches!(
            stack.append_to_group(&mut board, nudge(id, 1.0)),
            Err(EditorError::Undo(UndoError::NoActiveGroup))
        ));

        stack.begin_group("First").unwrap();
        assert_eq!(stack.begin_group("Second"), Err(UndoError::GroupAlreadyActive));
        assert!(matches!(
            stack.exec_command(&mut board, nudge(id, 1.0)),
            Err(EditorError::Undo(UndoError::GroupActive))
        ));
        assert!(matches!(
            stack.undo(&mut board),
            Err(EditorError::Undo(UndoError::GroupActive))
        ));
    }

    #[test]
    fn test_new_command_clears_redo() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::default();
        stack.exec_command(&mut board, nudge(id, 1.0)).unwrap();
        stack.undo(&mut board).unwrap();
        stack.exec_command(&mut board, nudge(id, 2.0)).unwrap();
        assert!(!stack.can_redo());
        assert!(matches!(
            stack.redo(&mut board),
            Err(EditorError::Undo(UndoError::NothingToRedo))
        ));
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let (mut board, id) = board_with_hole();
        let mut stack = UndoStack::new(2);
        for _ in 0..3 {
            stack.exec_command(&mut board, nudge(id, 1.0)).unwrap();
        }
        assert_eq!(stack.undo_count(), 2);
    }

    #[test]
    fn test_depth_from_config() {
        let (mut board, id) = board_with_hole();
        let config = EditorConfig::from_json(r#"{ "max_undo_depth": 3 }"#).unwrap();
        let mut stack = UndoStack::from_config(&config);
        for _ in 0..5 {
            stack.exec_command(&mut board, nudge(id, 1.0)).unwrap();
        }
        assert_eq!(stack.undo_count(), 3);
        assert_eq!(pos(&board, id), Point::new(5.0, 0.0));
    }
}
