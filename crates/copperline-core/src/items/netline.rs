//! Straight copper trace segment.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::connectivity::SegmentId;
use crate::geometry::point_to_segment_dist;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A trace segment between two anchors.
///
/// Endpoint coordinates are cached from the anchors by the board and kept in
/// sync whenever an anchor moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetLine {
    pub(crate) id: ItemId,
    pub segment: SegmentId,
    pub(crate) start: ItemId,
    pub(crate) end: ItemId,
    pub width: f64,
    pub layer: String,
    pub(crate) start_pos: Point,
    pub(crate) end_pos: Point,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl NetLine {
    pub const DEFAULT_LAYER: &'static str = "top_copper";

    pub fn new(segment: SegmentId, start: ItemId, end: ItemId, width: f64) -> Self {
        Self {
            id: new_item_id(),
            segment,
            start,
            end,
            width,
            layer: Self::DEFAULT_LAYER.to_string(),
            start_pos: Point::ZERO,
            end_pos: Point::ZERO,
            selected: false,
        }
    }

    pub fn start(&self) -> ItemId {
        self.start
    }

    pub fn end(&self) -> ItemId {
        self.end
    }

    /// The anchor at the opposite end, or `None` if `anchor` is not an endpoint.
    pub fn other_anchor(&self, anchor: ItemId) -> Option<ItemId> {
        if anchor == self.start {
            Some(self.end)
        } else if anchor == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    pub fn start_position(&self) -> Point {
        self.start_pos
    }

    pub fn end_position(&self) -> Point {
        self.end_pos
    }

    /// Euclidean distance between the two anchors.
    pub fn length(&self) -> f64 {
        self.start_pos.distance(self.end_pos)
    }
}

impl BoardItemTrait for NetLine {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::NetLine
    }

    fn bounds(&self) -> Rect {
        let half = self.width / 2.0;
        Rect::from_points(self.start_pos, self.end_pos).inflate(half, half)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start_pos, self.end_pos) <= self.width / 2.0 + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
