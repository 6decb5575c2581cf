//! Footprint pad.

use super::{BoardItemTrait, Device, ItemId, ItemKind, new_item_id};
use crate::connectivity::NetLineAnchor;
use crate::geometry::{Angle, rotate_vec};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// A copper pad of a device footprint. Acts as a net line anchor.
///
/// The absolute placement is derived from the owning device and refreshed
/// whenever the device changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintPad {
    pub(crate) id: ItemId,
    pub(crate) device: ItemId,
    pub name: String,
    /// Position relative to the device origin, in footprint coordinates.
    pub offset: Vec2,
    pub size: Size,
    position: Point,
    rotation: Angle,
    #[serde(skip)]
    pub(crate) anchor: NetLineAnchor,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl FootprintPad {
    /// Create a pad and append it to the device's pad list.
    pub fn new(device: &mut Device, name: impl Into<String>, offset: Vec2, size: Size) -> Self {
        let mut pad = Self {
            id: new_item_id(),
            device: device.id,
            name: name.into(),
            offset,
            size,
            position: Point::ZERO,
            rotation: Angle::deg0(),
            anchor: NetLineAnchor::new(),
            selected: false,
        };
        device.pads.push(pad.id);
        pad.device_changed(device);
        pad
    }

    pub fn device(&self) -> ItemId {
        self.device
    }

    /// Absolute position on the board.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn anchor(&self) -> &NetLineAnchor {
        &self.anchor
    }

    /// Recompute the absolute placement from the owning device.
    pub(crate) fn device_changed(&mut self, device: &Device) {
        self.position = device.map_to_board(self.offset);
        self.rotation = device.rotation;
    }
}

impl BoardItemTrait for FootprintPad {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::FootprintPad
    }

    fn bounds(&self) -> Rect {
        let r = self.size.width.max(self.size.height) / 2.0;
        Rect::from_center_size(self.position, Size::new(2.0 * r, 2.0 * r))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_vec(point - self.position, -self.rotation);
        local.x.abs() <= self.size.width / 2.0 + tolerance
            && local.y.abs() <= self.size.height / 2.0 + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pad_registers_with_device() {
        let mut device = Device::new("R1", Point::new(5.0, 5.0), Size::new(3.0, 1.0));
        let pad = FootprintPad::new(&mut device, "1", Vec2::new(-1.0, 0.0), Size::new(0.8, 0.8));
        assert_eq!(device.pads(), &[pad.id]);
        assert_eq!(pad.device(), device.id);
        assert_eq!(pad.position(), Point::new(4.0, 5.0));
    }

    #[test]
    fn test_pad_follows_device() {
        let mut device = Device::new("R1", Point::ZERO, Size::new(3.0, 1.0));
        let mut pad = FootprintPad::new(&mut device, "2", Vec2::new(1.0, 0.0), Size::new(1.0, 0.5));
        device.position = Point::new(2.0, 0.0);
        device.rotation = Angle::deg90();
        pad.device_changed(&device);
        assert_eq!(pad.position(), Point::new(2.0, 1.0));
        // Long side now vertical.
        assert!(pad.hit_test(Point::new(2.0, 1.45), 0.0));
        assert!(!pad.hit_test(Point::new(2.45, 1.0), 0.0));
    }
}
