//! Graphical polygon on a board layer.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::geometry::Path;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A stroked (and optionally filled) path, e.g. board outline or silkscreen art.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub(crate) id: ItemId,
    pub layer: String,
    pub line_width: f64,
    #[serde(default)]
    pub filled: bool,
    pub path: Path,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Polygon {
    pub fn new(layer: impl Into<String>, line_width: f64, path: Path) -> Self {
        Self {
            id: new_item_id(),
            layer: layer.into(),
            line_width,
            filled: false,
            path,
            selected: false,
        }
    }
}

impl BoardItemTrait for Polygon {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Polygon
    }

    fn bounds(&self) -> Rect {
        let half = self.line_width / 2.0;
        self.path
            .bounds()
            .map(|r| r.inflate(half, half))
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.path.distance_to(point) <= self.line_width / 2.0 + tolerance {
            return true;
        }
        self.filled && self.path.is_closed() && self.path.contains(point)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
