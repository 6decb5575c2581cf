//! Board item definitions.

mod device;
mod hole;
mod netline;
mod netpoint;
mod pad;
mod plane;
mod polygon;
mod text;
mod via;

pub use device::Device;
pub use hole::Hole;
pub use netline::NetLine;
pub use netpoint::NetPoint;
pub use pad::FootprintPad;
pub use plane::Plane;
pub use polygon::Polygon;
pub use text::StrokeText;
pub use via::Via;

use crate::connectivity::{NetLineAnchor, SegmentId};
use crate::geometry::{Angle, Orientation, is_on_grid, mirror_point, rotate_point, snap_to_grid};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for board items.
pub type ItemId = Uuid;

/// Discriminant of [`BoardItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Device,
    FootprintPad,
    Via,
    NetLine,
    NetPoint,
    Plane,
    Polygon,
    StrokeText,
    Hole,
}

impl ItemKind {
    /// Pick priority when several items lie under the cursor (lower wins).
    pub fn pick_priority(self) -> u8 {
        match self {
            ItemKind::NetPoint => 0,
            ItemKind::Via => 1,
            ItemKind::NetLine => 2,
            ItemKind::FootprintPad => 3,
            ItemKind::StrokeText => 4,
            ItemKind::Device => 5,
            ItemKind::Hole => 6,
            ItemKind::Polygon => 7,
            ItemKind::Plane => 8,
        }
    }

    /// Whether items of this kind carry a [`NetLineAnchor`].
    pub fn is_anchor(self) -> bool {
        matches!(self, ItemKind::FootprintPad | ItemKind::Via | ItemKind::NetPoint)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Device => "device",
            ItemKind::FootprintPad => "pad",
            ItemKind::Via => "via",
            ItemKind::NetLine => "trace",
            ItemKind::NetPoint => "net point",
            ItemKind::Plane => "plane",
            ItemKind::Polygon => "polygon",
            ItemKind::StrokeText => "text",
            ItemKind::Hole => "hole",
        };
        f.write_str(name)
    }
}

/// Common trait for all board items.
pub trait BoardItemTrait {
    /// Get the unique identifier.
    fn id(&self) -> ItemId;

    fn kind(&self) -> ItemKind;

    /// Get the bounding box in board coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in board coordinates) hits this item.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);
}

/// Enum wrapper for all board item types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardItem {
    Device(Device),
    FootprintPad(FootprintPad),
    Via(Via),
    NetLine(NetLine),
    NetPoint(NetPoint),
    Plane(Plane),
    Polygon(Polygon),
    StrokeText(StrokeText),
    Hole(Hole),
}

impl BoardItem {
    pub fn id(&self) -> ItemId {
        self.as_trait().id()
    }

    pub fn kind(&self) -> ItemKind {
        self.as_trait().kind()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    pub fn is_selected(&self) -> bool {
        self.as_trait().is_selected()
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.as_trait_mut().set_selected(selected)
    }

    fn as_trait(&self) -> &dyn BoardItemTrait {
        match self {
            BoardItem::Device(i) => i,
            BoardItem::FootprintPad(i) => i,
            BoardItem::Via(i) => i,
            BoardItem::NetLine(i) => i,
            BoardItem::NetPoint(i) => i,
            BoardItem::Plane(i) => i,
            BoardItem::Polygon(i) => i,
            BoardItem::StrokeText(i) => i,
            BoardItem::Hole(i) => i,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn BoardItemTrait {
        match self {
            BoardItem::Device(i) => i,
            BoardItem::FootprintPad(i) => i,
            BoardItem::Via(i) => i,
            BoardItem::NetLine(i) => i,
            BoardItem::NetPoint(i) => i,
            BoardItem::Plane(i) => i,
            BoardItem::Polygon(i) => i,
            BoardItem::StrokeText(i) => i,
            BoardItem::Hole(i) => i,
        }
    }

    /// The net line registry if this item is an anchor.
    pub fn anchor(&self) -> Option<&NetLineAnchor> {
        match self {
            BoardItem::FootprintPad(p) => Some(&p.anchor),
            BoardItem::Via(v) => Some(&v.anchor),
            BoardItem::NetPoint(n) => Some(&n.anchor),
            _ => None,
        }
    }

    pub(crate) fn anchor_mut(&mut self) -> Option<&mut NetLineAnchor> {
        match self {
            BoardItem::FootprintPad(p) => Some(&mut p.anchor),
            BoardItem::Via(v) => Some(&mut v.anchor),
            BoardItem::NetPoint(n) => Some(&mut n.anchor),
            _ => None,
        }
    }

    /// Reference position of point-like items.
    pub fn position(&self) -> Option<Point> {
        match self {
            BoardItem::Device(d) => Some(d.position),
            BoardItem::FootprintPad(p) => Some(p.position()),
            BoardItem::Via(v) => Some(v.position),
            BoardItem::NetPoint(n) => Some(n.position),
            BoardItem::StrokeText(t) => Some(t.position),
            BoardItem::Hole(h) => Some(h.position),
            BoardItem::NetLine(_) | BoardItem::Plane(_) | BoardItem::Polygon(_) => None,
        }
    }

    /// Owning net segment of trace items.
    pub fn segment(&self) -> Option<SegmentId> {
        match self {
            BoardItem::Via(v) => Some(v.segment),
            BoardItem::NetPoint(n) => Some(n.segment),
            BoardItem::NetLine(l) => Some(l.segment),
            _ => None,
        }
    }

    pub fn as_device(&self) -> Option<&Device> {
        match self {
            BoardItem::Device(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_pad(&self) -> Option<&FootprintPad> {
        match self {
            BoardItem::FootprintPad(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_via(&self) -> Option<&Via> {
        match self {
            BoardItem::Via(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_net_line(&self) -> Option<&NetLine> {
        match self {
            BoardItem::NetLine(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_net_point(&self) -> Option<&NetPoint> {
        match self {
            BoardItem::NetPoint(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            BoardItem::Plane(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            BoardItem::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_stroke_text(&self) -> Option<&StrokeText> {
        match self {
            BoardItem::StrokeText(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_hole(&self) -> Option<&Hole> {
        match self {
            BoardItem::Hole(h) => Some(h),
            _ => None,
        }
    }

    /// Move the item. Pads and net lines follow their owners instead.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            BoardItem::Device(d) => d.position += delta,
            BoardItem::Via(v) => v.position += delta,
            BoardItem::NetPoint(n) => n.position += delta,
            BoardItem::StrokeText(t) => t.position += delta,
            BoardItem::Hole(h) => h.position += delta,
            BoardItem::Plane(p) => p.outline.translate(delta),
            BoardItem::Polygon(p) => p.path.translate(delta),
            BoardItem::FootprintPad(_) | BoardItem::NetLine(_) => {}
        }
    }

    /// Rotate the item around `center`.
    pub fn rotate(&mut self, center: Point, angle: Angle) {
        match self {
            BoardItem::Device(d) => {
                d.position = rotate_point(d.position, center, angle);
                d.rotation = (d.rotation + angle).mapped_to_0_360();
            }
            BoardItem::StrokeText(t) => {
                t.position = rotate_point(t.position, center, angle);
                t.rotation = (t.rotation + angle).mapped_to_0_360();
            }
            BoardItem::Via(v) => v.position = rotate_point(v.position, center, angle),
            BoardItem::NetPoint(n) => n.position = rotate_point(n.position, center, angle),
            BoardItem::Hole(h) => h.position = rotate_point(h.position, center, angle),
            BoardItem::Plane(p) => p.outline.rotate(center, angle),
            BoardItem::Polygon(p) => p.path.rotate(center, angle),
            BoardItem::FootprintPad(_) | BoardItem::NetLine(_) => {}
        }
    }

    /// Mirror the item across the axis through `center`.
    ///
    /// Devices and texts switch sides: a vertical flip is a horizontal flip
    /// followed by a half turn.
    pub fn mirror(&mut self, center: Point, orientation: Orientation) {
        let mirrored_rotation = |rotation: Angle| match orientation {
            Orientation::Horizontal => (-rotation).mapped_to_0_360(),
            Orientation::Vertical => (Angle::deg180() - rotation).mapped_to_0_360(),
        };
        match self {
            BoardItem::Device(d) => {
                d.position = mirror_point(d.position, center, orientation);
                d.rotation = mirrored_rotation(d.rotation);
                d.mirrored = !d.mirrored;
            }
            BoardItem::StrokeText(t) => {
                t.position = mirror_point(t.position, center, orientation);
                t.rotation = mirrored_rotation(t.rotation);
                t.mirrored = !t.mirrored;
            }
            BoardItem::Via(v) => v.position = mirror_point(v.position, center, orientation),
            BoardItem::NetPoint(n) => n.position = mirror_point(n.position, center, orientation),
            BoardItem::Hole(h) => h.position = mirror_point(h.position, center, orientation),
            BoardItem::Plane(p) => p.outline.mirror(center, orientation),
            BoardItem::Polygon(p) => p.path.mirror(center, orientation),
            BoardItem::FootprintPad(_) | BoardItem::NetLine(_) => {}
        }
    }

    /// Snap reference positions (or all outline vertices) to the grid.
    pub fn snap_to_grid(&mut self, grid_interval: f64) {
        match self {
            BoardItem::Device(d) => d.position = snap_to_grid(d.position, grid_interval),
            BoardItem::Via(v) => v.position = snap_to_grid(v.position, grid_interval),
            BoardItem::NetPoint(n) => n.position = snap_to_grid(n.position, grid_interval),
            BoardItem::StrokeText(t) => t.position = snap_to_grid(t.position, grid_interval),
            BoardItem::Hole(h) => h.position = snap_to_grid(h.position, grid_interval),
            BoardItem::Plane(p) => p.outline.snap_to_grid(grid_interval),
            BoardItem::Polygon(p) => p.path.snap_to_grid(grid_interval),
            BoardItem::FootprintPad(_) | BoardItem::NetLine(_) => {}
        }
    }

    /// Whether [`snap_to_grid`](Self::snap_to_grid) would leave the item unchanged.
    pub fn is_on_grid(&self, grid_interval: f64) -> bool {
        match self {
            BoardItem::Plane(p) => p.outline.is_on_grid(grid_interval),
            BoardItem::Polygon(p) => p.path.is_on_grid(grid_interval),
            BoardItem::FootprintPad(_) | BoardItem::NetLine(_) => true,
            other => other
                .position()
                .is_none_or(|pos| is_on_grid(pos, grid_interval)),
        }
    }

    /// Assign fresh ids and rewrite references through the given maps.
    ///
    /// References missing from `ids` are kept unchanged.
    pub(crate) fn remap(
        &mut self,
        ids: &HashMap<ItemId, ItemId>,
        segments: &HashMap<SegmentId, SegmentId>,
    ) {
        let map = |id: ItemId| ids.get(&id).copied().unwrap_or(id);
        let map_segment = |id: SegmentId| segments.get(&id).copied().unwrap_or(id);
        match self {
            BoardItem::Device(d) => {
                d.id = map(d.id);
                d.pads = d.pads.iter().map(|&p| map(p)).collect();
            }
            BoardItem::FootprintPad(p) => {
                p.id = map(p.id);
                p.device = map(p.device);
            }
            BoardItem::Via(v) => {
                v.id = map(v.id);
                v.segment = map_segment(v.segment);
            }
            BoardItem::NetLine(l) => {
                l.id = map(l.id);
                l.segment = map_segment(l.segment);
                l.start = map(l.start);
                l.end = map(l.end);
            }
            BoardItem::NetPoint(n) => {
                n.id = map(n.id);
                n.segment = map_segment(n.segment);
            }
            BoardItem::Plane(p) => p.id = map(p.id),
            BoardItem::Polygon(p) => p.id = map(p.id),
            BoardItem::StrokeText(t) => {
                t.id = map(t.id);
                t.device = t.device.map(map);
            }
            BoardItem::Hole(h) => h.id = map(h.id),
        }
    }
}

impl From<Device> for BoardItem {
    fn from(item: Device) -> Self {
        BoardItem::Device(item)
    }
}

impl From<FootprintPad> for BoardItem {
    fn from(item: FootprintPad) -> Self {
        BoardItem::FootprintPad(item)
    }
}

impl From<Via> for BoardItem {
    fn from(item: Via) -> Self {
        BoardItem::Via(item)
    }
}

impl From<NetLine> for BoardItem {
    fn from(item: NetLine) -> Self {
        BoardItem::NetLine(item)
    }
}

impl From<NetPoint> for BoardItem {
    fn from(item: NetPoint) -> Self {
        BoardItem::NetPoint(item)
    }
}

impl From<Plane> for BoardItem {
    fn from(item: Plane) -> Self {
        BoardItem::Plane(item)
    }
}

impl From<Polygon> for BoardItem {
    fn from(item: Polygon) -> Self {
        BoardItem::Polygon(item)
    }
}

impl From<StrokeText> for BoardItem {
    fn from(item: StrokeText) -> Self {
        BoardItem::StrokeText(item)
    }
}

impl From<Hole> for BoardItem {
    fn from(item: Hole) -> Self {
        BoardItem::Hole(item)
    }
}

/// Create a fresh item id.
pub(crate) fn new_item_id() -> ItemId {
    Uuid::new_v4()
}
