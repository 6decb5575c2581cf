//! Error types for the editing core.

use crate::items::ItemId;
use thiserror::Error;

/// Misuse of the undo stack protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndoError {
    #[error("An undo command group is already active")]
    GroupAlreadyActive,
    #[error("No undo command group is active")]
    NoActiveGroup,
    #[error("Cannot execute a command while a command group is active")]
    GroupActive,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Violations of the anchor/net line registration protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    #[error("Net line {0} is already registered on this anchor")]
    AlreadyRegistered(ItemId),
    #[error("Net line {0} is not registered on this anchor")]
    NotRegistered(ItemId),
    #[error("Anchor {0} does not exist")]
    AnchorNotFound(ItemId),
    #[error("Item {0} cannot anchor net lines")]
    NotAnAnchor(ItemId),
    #[error("Net line {0} must connect two different anchors")]
    SameAnchor(ItemId),
}

/// Trace length measurement failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    #[error("Selected trace segments may not branch!")]
    Branch,
    #[error("Item {0} is not a net line")]
    NotANetLine(ItemId),
    #[error("Net line {0} is not selected")]
    SeedNotSelected(ItemId),
}

/// Clipboard provider failures.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Malformed clipboard payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure reported by the host's properties dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Properties dialog failed: {0}")]
pub struct PresenterError(pub String);

/// Top-level error of the editing core.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Undo(#[from] UndoError),
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Presenter(#[from] PresenterError),
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Item already exists: {0}")]
    DuplicateItem(ItemId),
    #[error("Item {0} is still referenced by other items")]
    ItemInUse(ItemId),
}

/// Result type for editing operations.
pub type EditorResult<T> = Result<T, EditorError>;
