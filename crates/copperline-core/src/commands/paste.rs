//! Insert clipboard contents.

use crate::board::Board;
use crate::clipboard::ClipboardData;
use crate::connectivity::{NetSegment, SegmentId};
use crate::error::EditorResult;
use crate::items::{BoardItem, ItemId, ItemKind, new_item_id};
use crate::undo::UndoCommand;
use kurbo::Vec2;
use std::collections::{HashMap, HashSet};

/// Inserts copies of clipboard items, offset by a fixed vector.
///
/// Every pasted item gets a new id and ends up selected. Executing reports
/// `false` when nothing could be pasted.
#[derive(Debug)]
pub struct PasteItems {
    data: ClipboardData,
    offset: Vec2,
    added: Vec<BoardItem>,
    added_segments: Vec<NetSegment>,
}

impl PasteItems {
    pub fn new(data: ClipboardData, offset: Vec2) -> Self {
        Self {
            data,
            offset,
            added: Vec::new(),
            added_segments: Vec::new(),
        }
    }

    /// Build the remapped, translated copies in insertion order.
    fn prepare(&mut self) {
        let ids: HashMap<ItemId, ItemId> = self
            .data
            .items
            .iter()
            .map(|i| (i.id(), new_item_id()))
            .collect();
        let mut segments: HashMap<SegmentId, SegmentId> = HashMap::new();
        self.added_segments = self
            .data
            .segments
            .iter()
            .map(|s| {
                let copy = NetSegment::new(s.net_name.clone());
                segments.insert(s.id, copy.id);
                copy
            })
            .collect();
        let new_ids: HashSet<ItemId> = ids.values().copied().collect();

        // Owners and anchors before the items referencing them.
        let rank = |kind: ItemKind| match kind {
            ItemKind::Device => 0,
            ItemKind::FootprintPad => 1,
            ItemKind::Via | ItemKind::NetPoint => 2,
            ItemKind::NetLine => 3,
            _ => 4,
        };
        let mut items = self.data.items.clone();
        items.sort_by_key(|i| rank(i.kind()));

        self.added = items
            .into_iter()
            .filter_map(|mut item| {
                item.remap(&ids, &segments);
                let complete = match &mut item {
                    BoardItem::NetLine(l) => new_ids.contains(&l.start) && new_ids.contains(&l.end),
                    BoardItem::FootprintPad(p) => new_ids.contains(&p.device),
                    BoardItem::StrokeText(t) => {
                        if t.device.is_some_and(|d| !new_ids.contains(&d)) {
                            t.device = None;
                        }
                        true
                    }
                    _ => true,
                };
                if !complete {
                    log::warn!("Skipping pasted {} with missing references", item.kind());
                    return None;
                }
                item.translate(self.offset);
                item.set_selected(true);
                Some(item)
            })
            .collect();
    }

    fn insert_all(&self, board: &mut Board) -> EditorResult<()> {
        for segment in &self.added_segments {
            board.add_segment(segment.clone());
        }
        for (i, item) in self.added.iter().enumerate() {
            if let Err(e) = board.add_item(item.clone()) {
                for inserted in self.added[..i].iter().rev() {
                    board.remove_item(inserted.id())?;
                }
                self.remove_segments(board);
                return Err(e);
            }
        }
        Ok(())
    }

    fn remove_segments(&self, board: &mut Board) {
        for segment in &self.added_segments {
            board.remove_segment(segment.id);
        }
    }
}

impl UndoCommand for PasteItems {
    fn description(&self) -> &str {
        "Paste board elements"
    }

    fn execute(&mut self, board: &mut Board) -> EditorResult<bool> {
        if self.data.is_empty() {
            return Ok(false);
        }
        self.prepare();
        if self.added.is_empty() {
            return Ok(false);
        }
        self.insert_all(board)?;
        log::debug!("Pasted {} items", self.added.len());
        Ok(true)
    }

    fn undo(&mut self, board: &mut Board) -> EditorResult<()> {
        for item in self.added.iter().rev() {
            board.remove_item(item.id())?;
        }
        self.remove_segments(board);
        Ok(())
    }

    fn redo(&mut self, board: &mut Board) -> EditorResult<()> {
        self.insert_all(board)
    }
}
