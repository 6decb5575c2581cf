//! Copperline Core Library
//!
//! Interactive editing core of a PCB board editor: board items and their
//! connectivity, undoable edit commands and the select tool state machine.

pub mod board;
pub mod clipboard;
pub mod command_set;
pub mod commands;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod items;
pub mod measure;
pub mod outline;
pub mod tool;
pub mod undo;

#[cfg(test)]
mod test_support;

pub use board::{Board, FindFlags, SelectionQuery};
pub use clipboard::{ClipboardData, ClipboardDataBuilder, ClipboardProvider, JsonClipboard};
pub use command_set::{CommandId, CommandSet, EditorCommand, Shortcut};
pub use config::EditorConfig;
pub use connectivity::{NetLineAnchor, NetSegment, SegmentId};
pub use error::{EditorError, EditorResult};
pub use geometry::{Angle, Orientation, Path, Vertex, snap_to_grid};
pub use input::{Modifiers, MouseButton, PointerEvent, SelectionModifier};
pub use items::{BoardItem, BoardItemTrait, ItemId, ItemKind};
pub use measure::{TraceMeasurement, measure_trace};
pub use outline::OutlineTarget;
pub use tool::{
    ContextAction, ContextMenu, EditorContext, PropertiesPresenter, SelectState, SelectTool,
};
pub use undo::{UndoCommand, UndoStack};
