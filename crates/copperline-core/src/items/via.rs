//! Plated through via.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::connectivity::{NetLineAnchor, SegmentId};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A via connecting copper layers. Acts as a net line anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub(crate) id: ItemId,
    pub segment: SegmentId,
    pub position: Point,
    pub outer_diameter: f64,
    pub drill_diameter: f64,
    #[serde(skip)]
    pub(crate) anchor: NetLineAnchor,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Via {
    pub const DEFAULT_OUTER_DIAMETER: f64 = 0.7;
    pub const DEFAULT_DRILL_DIAMETER: f64 = 0.3;

    pub fn new(segment: SegmentId, position: Point) -> Self {
        Self {
            id: new_item_id(),
            segment,
            position,
            outer_diameter: Self::DEFAULT_OUTER_DIAMETER,
            drill_diameter: Self::DEFAULT_DRILL_DIAMETER,
            anchor: NetLineAnchor::new(),
            selected: false,
        }
    }

    pub fn anchor(&self) -> &NetLineAnchor {
        &self.anchor
    }
}

impl BoardItemTrait for Via {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Via
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(
            self.position,
            Size::new(self.outer_diameter, self.outer_diameter),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.position) <= self.outer_diameter / 2.0 + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
