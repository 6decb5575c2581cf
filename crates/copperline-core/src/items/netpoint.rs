//! Junction point of traces.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::connectivity::{NetLineAnchor, SegmentId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A free trace junction. Acts as a net line anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetPoint {
    pub(crate) id: ItemId,
    pub segment: SegmentId,
    pub position: Point,
    #[serde(skip)]
    pub(crate) anchor: NetLineAnchor,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl NetPoint {
    /// Grab radius around the junction.
    pub const RADIUS: f64 = 0.1;

    pub fn new(segment: SegmentId, position: Point) -> Self {
        Self {
            id: new_item_id(),
            segment,
            position,
            anchor: NetLineAnchor::new(),
            selected: false,
        }
    }

    pub fn anchor(&self) -> &NetLineAnchor {
        &self.anchor
    }
}

impl BoardItemTrait for NetPoint {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::NetPoint
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.position, self.position).inflate(Self::RADIUS, Self::RADIUS)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.position) <= Self::RADIUS + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
