//! Placed component instance.

use super::{BoardItemTrait, ItemId, ItemKind, new_item_id};
use crate::geometry::{Angle, rotate_vec};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A component placed on the board.
///
/// Pads are separate items owned by the device. The device keeps the ordered list
/// of its pads and every placement change is pushed to them in that order (see
/// [`Board::notify_device_changed`](crate::board::Board::notify_device_changed)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub(crate) id: ItemId,
    /// Component designator, e.g. "R1".
    pub name: String,
    /// Origin of the footprint on the board.
    pub position: Point,
    pub rotation: Angle,
    /// Placed on the bottom side.
    pub mirrored: bool,
    /// Body outline, centered on the origin.
    pub body: Size,
    pub(crate) pads: Vec<ItemId>,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl Device {
    pub fn new(name: impl Into<String>, position: Point, body: Size) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            position,
            rotation: Angle::deg0(),
            mirrored: false,
            body,
            pads: Vec::new(),
            selected: false,
        }
    }

    /// Pads notified on placement changes, in notification order.
    pub fn pads(&self) -> &[ItemId] {
        &self.pads
    }

    /// Map a footprint-local offset to board coordinates.
    pub fn map_to_board(&self, local: Vec2) -> Point {
        let local = if self.mirrored {
            Vec2::new(-local.x, local.y)
        } else {
            local
        };
        self.position + rotate_vec(local, self.rotation)
    }

    /// Map a board point into footprint-local coordinates.
    fn map_from_board(&self, point: Point) -> Vec2 {
        let local = rotate_vec(point - self.position, -self.rotation);
        if self.mirrored {
            Vec2::new(-local.x, local.y)
        } else {
            local
        }
    }
}

impl BoardItemTrait for Device {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Device
    }

    fn bounds(&self) -> Rect {
        let (hw, hh) = (self.body.width / 2.0, self.body.height / 2.0);
        let corners = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        let first = self.map_to_board(corners[0]);
        corners[1..]
            .iter()
            .fold(Rect::from_points(first, first), |r, &c| {
                r.union_pt(self.map_to_board(c))
            })
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.map_from_board(point);
        local.x.abs() <= self.body.width / 2.0 + tolerance
            && local.y.abs() <= self.body.height / 2.0 + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
