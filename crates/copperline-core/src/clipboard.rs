//! Clipboard contents for copy, cut and paste of board items.

use crate::board::Board;
use crate::connectivity::{NetSegment, SegmentId};
use crate::error::ClipboardError;
use crate::items::{BoardItem, ItemId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Items copied from a board, relative to the cursor position at copy time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardData {
    /// Cursor position when the items were copied.
    pub cursor_pos: Point,
    pub items: Vec<BoardItem>,
    /// Net segments referenced by copied traces, vias and net points.
    #[serde(default)]
    pub segments: Vec<NetSegment>,
}

impl ClipboardData {
    pub fn new(cursor_pos: Point) -> Self {
        Self {
            cursor_pos,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Serialize into the JSON clipboard payload.
    pub fn to_payload(&self) -> Result<String, ClipboardError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON clipboard payload.
    pub fn from_payload(payload: &str) -> Result<Self, ClipboardError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Collects the current selection of a board into [`ClipboardData`].
pub struct ClipboardDataBuilder<'a> {
    board: &'a Board,
    cursor_pos: Point,
}

impl<'a> ClipboardDataBuilder<'a> {
    pub fn new(board: &'a Board, cursor_pos: Point) -> Self {
        Self { board, cursor_pos }
    }

    /// Copy the selection.
    ///
    /// Devices bring their pads and attached texts, traces bring the net
    /// points at their ends. Traces ending at a pad or via that is not copied
    /// are left out.
    pub fn build(self) -> ClipboardData {
        let board = self.board;
        let mut ids: HashSet<ItemId> = HashSet::new();
        let mut lines: Vec<ItemId> = Vec::new();

        for item in board.items_ordered().filter(|i| i.is_selected()) {
            match item {
                BoardItem::FootprintPad(_) => {}
                BoardItem::NetLine(line) => {
                    lines.push(line.id);
                    for anchor in [line.start(), line.end()] {
                        if matches!(board.item(anchor), Some(BoardItem::NetPoint(_))) {
                            ids.insert(anchor);
                        }
                    }
                }
                BoardItem::Device(device) => {
                    ids.insert(device.id);
                    ids.extend(device.pads().iter().filter(|p| board.contains(**p)));
                }
                other => {
                    ids.insert(other.id());
                }
            }
        }
        let attached: Vec<ItemId> = board
            .items_ordered()
            .filter_map(BoardItem::as_stroke_text)
            .filter(|t| t.device().is_some_and(|d| ids.contains(&d)))
            .map(|t| t.id)
            .collect();
        ids.extend(attached);
        for line in lines {
            let complete = board
                .net_line(line)
                .is_some_and(|l| ids.contains(&l.start()) && ids.contains(&l.end()));
            if complete {
                ids.insert(line);
            } else {
                log::debug!("Skipping trace {line} with an anchor outside the copied items");
            }
        }

        let items: Vec<BoardItem> = board
            .items_ordered()
            .filter(|i| ids.contains(&i.id()))
            .cloned()
            .collect();
        let segment_ids: HashSet<SegmentId> = items.iter().filter_map(BoardItem::segment).collect();
        let segments = board
            .segments()
            .filter(|s| segment_ids.contains(&s.id))
            .cloned()
            .collect();

        ClipboardData {
            cursor_pos: self.cursor_pos,
            items,
            segments,
        }
    }
}

/// System clipboard access.
pub trait ClipboardProvider {
    /// Replace the clipboard contents.
    fn store(&mut self, data: &ClipboardData) -> Result<(), ClipboardError>;

    /// Read board items from the clipboard, `None` if it holds none.
    fn load(&mut self) -> Result<Option<ClipboardData>, ClipboardError>;
}

/// Clipboard holding the JSON payload in memory.
#[derive(Debug, Clone, Default)]
pub struct JsonClipboard {
    payload: Option<String>,
}

impl JsonClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Put raw text on the clipboard, as another application would.
    pub fn set_payload(&mut self, payload: impl Into<String>) {
        self.payload = Some(payload.into());
    }
}

impl ClipboardProvider for JsonClipboard {
    fn store(&mut self, data: &ClipboardData) -> Result<(), ClipboardError> {
        self.payload = Some(data.to_payload()?);
        Ok(())
    }

    fn load(&mut self) -> Result<Option<ClipboardData>, ClipboardError> {
        self.payload
            .as_deref()
            .map(ClipboardData::from_payload)
            .transpose()
    }
}
