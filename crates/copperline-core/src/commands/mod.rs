//! Undoable board edits.

mod drag;
mod flip;
mod outline_edit;
mod paste;
mod remove;

pub use drag::DragSelectedItems;
pub use flip::FlipSelectedItems;
pub use outline_edit::OutlineEditCommand;
pub use paste::PasteItems;
pub use remove::RemoveSelectedItems;

use crate::board::Board;
use crate::error::EditorResult;
use crate::items::{BoardItem, ItemId};
use kurbo::Rect;

/// Items that move when the selection is transformed.
///
/// Pads and traces follow their owners, so a selected pad contributes its
/// device and a selected trace contributes the net points at its ends. Texts
/// attached to a moved device move with it.
pub(crate) fn movable_selection(board: &Board) -> Vec<ItemId> {
    let mut ids: Vec<ItemId> = Vec::new();
    let push = |ids: &mut Vec<ItemId>, id: ItemId| {
        if !ids.contains(&id) {
            ids.push(id);
        }
    };
    for item in board.items_ordered().filter(|i| i.is_selected()) {
        match item {
            BoardItem::FootprintPad(pad) => push(&mut ids, pad.device()),
            BoardItem::NetLine(line) => {
                for anchor in [line.start(), line.end()] {
                    if matches!(board.item(anchor), Some(BoardItem::NetPoint(_))) {
                        push(&mut ids, anchor);
                    }
                }
            }
            other => push(&mut ids, other.id()),
        }
    }
    let attached: Vec<ItemId> = board
        .items_ordered()
        .filter_map(BoardItem::as_stroke_text)
        .filter(|t| t.device().is_some_and(|d| ids.contains(&d)))
        .map(|t| t.id)
        .collect();
    for id in attached {
        push(&mut ids, id);
    }
    ids
}

/// Copies of the given items in their current state.
pub(crate) fn capture(board: &Board, ids: &[ItemId]) -> Vec<BoardItem> {
    ids.iter().filter_map(|id| board.item(*id).cloned()).collect()
}

/// Write item copies back onto the board.
pub(crate) fn restore(board: &mut Board, snapshots: &[BoardItem]) -> EditorResult<()> {
    for snapshot in snapshots {
        board.replace_item(snapshot.clone())?;
    }
    Ok(())
}

/// Union of the bounds of the given items.
pub(crate) fn bounds_of(board: &Board, ids: &[ItemId]) -> Option<Rect> {
    ids.iter()
        .filter_map(|id| board.item(*id))
        .map(BoardItem::bounds)
        .reduce(|a, b| a.union(b))
}
