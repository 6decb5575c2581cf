//! Stroke font text.

use super::{BoardItemTrait, Device, ItemId, ItemKind, new_item_id};
use crate::geometry::{Angle, rotate_vec};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Approximate glyph advance relative to the text height.
const CHAR_WIDTH_FACTOR: f64 = 0.8;

/// Text drawn with a stroke font, either free or attached to a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeText {
    pub(crate) id: ItemId,
    pub text: String,
    /// Bottom-left corner of the text box.
    pub position: Point,
    pub rotation: Angle,
    pub mirrored: bool,
    pub height: f64,
    pub(crate) device: Option<ItemId>,
    /// Placement relative to the device, used by "reset texts".
    pub default_offset: Vec2,
    pub default_rotation: Angle,
    #[serde(skip)]
    pub(crate) selected: bool,
}

impl StrokeText {
    pub const DEFAULT_HEIGHT: f64 = 1.0;

    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            id: new_item_id(),
            text: text.into(),
            position,
            rotation: Angle::deg0(),
            mirrored: false,
            height: Self::DEFAULT_HEIGHT,
            device: None,
            default_offset: Vec2::ZERO,
            default_rotation: Angle::deg0(),
            selected: false,
        }
    }

    /// Create a text attached to a device at its default placement.
    pub fn for_device(text: impl Into<String>, device: &Device, offset: Vec2) -> Self {
        let mut t = Self::new(text, device.position);
        t.device = Some(device.id);
        t.default_offset = offset;
        t.reset_to_default(device);
        t
    }

    pub fn device(&self) -> Option<ItemId> {
        self.device
    }

    /// Move the text back to its default placement relative to `device`.
    pub fn reset_to_default(&mut self, device: &Device) {
        self.position = device.map_to_board(self.default_offset);
        self.rotation = (device.rotation + self.default_rotation).mapped_to_0_360();
        self.mirrored = device.mirrored;
    }

    fn width(&self) -> f64 {
        self.text.chars().count() as f64 * self.height * CHAR_WIDTH_FACTOR
    }

    fn local_corners(&self) -> [Vec2; 4] {
        let w = if self.mirrored { -self.width() } else { self.width() };
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(w, self.height),
            Vec2::new(0.0, self.height),
        ]
    }
}

impl BoardItemTrait for StrokeText {
    fn id(&self) -> ItemId {
        self.id
    }

    fn kind(&self) -> ItemKind {
        ItemKind::StrokeText
    }

    fn bounds(&self) -> Rect {
        let corners = self.local_corners();
        corners.iter().fold(
            Rect::from_points(self.position, self.position),
            |r, &c| r.union_pt(self.position + rotate_vec(c, self.rotation)),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_vec(point - self.position, -self.rotation);
        let x = if self.mirrored { -local.x } else { local.x };
        x >= -tolerance
            && x <= self.width() + tolerance
            && local.y >= -tolerance
            && local.y <= self.height + tolerance
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
