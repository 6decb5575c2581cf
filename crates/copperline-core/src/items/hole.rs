//! Non-plated mounting hole.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub(crate) id: ItemId,
    pub position: Point,
    pub diameter: f64,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Hole {
    pub fn new(position: Point, diameter: f64) -> Self {
        Self {
            id: new_item_id(),
            position,
            diameter,
            selected: false,
        }
    }
}

impl BoardItemTrait for Hole {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Hole
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, Size::new(self.diameter, self.diameter))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.position) <= self.diameter / 2.0 + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
