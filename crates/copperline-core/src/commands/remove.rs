//! Delete the selection.

use crate::board::Board;
use crate::error::EditorResult;
use crate::items::{BoardItem, ItemId, ItemKind};
use crate::undo::UndoCommand;
use std::collections::HashSet;

/// Removes the selected items together with everything depending on them.
///
/// Removing a device removes its pads and attached texts, removing an anchor
/// removes its traces, and net points left without traces are removed too.
/// Selected pads alone are ignored since they belong to their device.
#[derive(Debug, Default)]
pub struct RemoveSelectedItems {
    /// Removed items with their former z-index, in removal order.
    removed: Vec<(usize, BoardItem)>,
    item_ids: Vec<ItemId>,
}

impl RemoveSelectedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items removed by the last execution, in removal order.
    pub fn removed_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    fn collect(board: &Board) -> Vec<ItemId> {
        let mut set: HashSet<ItemId> = board
            .items_ordered()
            .filter(|i| i.is_selected() && i.kind() != ItemKind::FootprintPad)
            .map(BoardItem::id)
            .collect();

        for item in board.items_ordered() {
            match item {
                BoardItem::Device(d) if set.contains(&d.id) => {
                    set.extend(d.pads().iter().filter(|p| board.contains(**p)));
                }
                _ => {}
            }
        }
        let attached: Vec<ItemId> = board
            .items_ordered()
            .filter_map(BoardItem::as_stroke_text)
            .filter(|t| t.device().is_some_and(|d| set.contains(&d)))
            .map(|t| t.id)
            .collect();
        set.extend(attached);

        let lines: Vec<ItemId> = set
            .iter()
            .filter_map(|id| board.anchor(*id))
            .flat_map(|a| a.net_lines().iter().copied())
            .collect();
        set.extend(lines);

        let orphans: Vec<ItemId> = board
            .items_ordered()
            .filter_map(BoardItem::as_net_point)
            .filter(|p| !set.contains(&p.id))
            .filter(|p| {
                p.anchor().is_used() && p.anchor().net_lines().iter().all(|l| set.contains(l))
            })
            .map(|p| p.id)
            .collect();
        set.extend(orphans);

        // Traces before anchors, pads before their device.
        let rank = |kind: ItemKind| match kind {
            ItemKind::NetLine => 0,
            ItemKind::FootprintPad => 1,
            ItemKind::StrokeText => 2,
            ItemKind::Device => 4,
            _ => 3,
        };
        let mut ordered: Vec<&BoardItem> = board
            .items_ordered()
            .filter(|i| set.contains(&i.id()))
            .collect();
        ordered.sort_by_key(|i| rank(i.kind()));
        ordered.into_iter().map(BoardItem::id).collect()
    }

    fn remove_all(&mut self, board: &mut Board) -> EditorResult<()> {
        for &id in &self.item_ids {
            let z = board.z_index(id).unwrap_or(usize::MAX);
            match board.remove_item(id) {
                Ok(item) => self.removed.push((z, item)),
                Err(e) => {
                    self.restore_all(board)?;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn restore_all(&mut self, board: &mut Board) -> EditorResult<()> {
        while let Some((z, item)) = self.removed.pop() {
            board.restore_item(item, z)?;
        }
        Ok(())
    }
}

impl UndoCommand for RemoveSelectedItems {
    fn description(&self) -> &str {
        "Remove board elements"
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        self.item_ids = Self::collect(board);
        self.remove_all(board)?;
        Ok(!self.removed.is_empty())
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        self.restore_all(board)
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        self.remove_all(board)
    }
}
