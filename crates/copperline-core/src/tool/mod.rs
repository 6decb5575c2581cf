//! Interactive editing tools.

mod context_menu;
mod select;

pub use context_menu::{ContextAction, ContextMenu, ContextMenuEntry};
pub use select::{SelectState, SelectTool};

use crate::board::Board;
use crate::clipboard::ClipboardProvider;
use crate::command_set::CommandSet;
use crate::config::EditorConfig;
use crate::error::PresenterError;
use crate::items::BoardItem;
use crate::undo::UndoStack;

/// Shows the properties dialog of an item.
pub trait PropertiesPresenter {
    /// Returns whether a dialog was shown for the item.
    fn open_properties(&mut self, item: &BoardItem) -> Result<bool, PresenterError>;
}

/// Everything a tool needs to handle one event.
pub struct EditorContext<'a> {
    pub board: &'a mut Board,
    pub undo_stack: &'a mut UndoStack,
    pub clipboard: &'a mut dyn ClipboardProvider,
    pub presenter: &'a mut dyn PropertiesPresenter,
    pub commands: &'a CommandSet,
    pub config: &'a EditorConfig,
}
