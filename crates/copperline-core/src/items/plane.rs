//! Copper pour area.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::geometry::Path;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A copper plane filled around its outline and connected to a net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub(crate) id: ItemId,
    pub net_name: String,
    pub layer: String,
    pub outline: Path,
    /// Display flag. Toggling it is not an undoable edit.
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(skip)]
    pub(crate) selected: bool,
}

fn default_visible() -> bool {
    true
}

impl Plane {
    pub fn new(net_name: impl Into<String>, layer: impl Into<String>, outline: Path) -> Self {
        Self {
            id: new_item_id(),
            net_name: net_name.into(),
            layer: layer.into(),
            outline,
            visible: true,
            selected: false,
        }
    }
}

impl BoardItemTrait for Plane {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Plane
    }

    fn bounds(&self) -> Rect {
        self.outline
            .bounds()
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.outline.distance_to(point) <= tolerance || self.outline.contains(point)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
