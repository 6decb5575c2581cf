//! Board document: item storage, connectivity bookkeeping, hit testing and selection.

use crate::connectivity::{NetLineAnchor, NetSegment, SegmentId};
use crate::error::{ConnectivityError, EditorError, EditorResult};
use crate::geometry::Path;
use crate::items::{
    BoardItem, Device, FootprintPad, Hole, ItemId, ItemKind, NetLine, NetPoint, Plane, Polygon,
    StrokeText, Via,
};
use crate::outline::OutlineTarget;
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Options for [`Board::find_items_at`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindFlags {
    /// Extra distance accepted around item shapes.
    pub tolerance: f64,
    /// Also report planes whose visibility is switched off.
    pub include_hidden_planes: bool,
}

impl FindFlags {
    /// Only items whose shape contains the point.
    pub fn exact() -> Self {
        Self {
            tolerance: 0.0,
            include_hidden_planes: false,
        }
    }

    /// Accept items within `tolerance` of the point.
    pub fn near_match(tolerance: f64) -> Self {
        Self {
            tolerance,
            include_hidden_planes: false,
        }
    }
}

/// A circuit board with all its items.
#[derive(Debug, Clone, Default)]
pub struct Board {
    /// Board name.
    pub name: String,
    /// All items on the board, keyed by ID.
    items: HashMap<ItemId, BoardItem>,
    /// Z-order of items (back to front).
    z_order: Vec<ItemId>,
    segments: HashMap<SegmentId, NetSegment>,
    /// Rubber band rectangle while the user drags out a selection.
    selection_rect: Option<Rect>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_segment(&mut self, segment: NetSegment) -> SegmentId {
        let id = segment.id;
        self.segments.insert(id, segment);
        id
    }

    pub fn segment(&self, id: SegmentId) -> Option<&NetSegment> {
        self.segments.get(&id)
    }

    pub fn remove_segment(&mut self, id: SegmentId) -> Option<NetSegment> {
        self.segments.remove(&id)
    }

    pub fn segments(&self) -> impl Iterator<Item = &NetSegment> {
        self.segments.values()
    }

    /// Add an item to the board.
    ///
    /// Net lines are registered on both anchors; pads are attached to their
    /// device. Nothing changes if validation fails.
    pub fn add_item(&mut self, item: impl Into<BoardItem>) -> EditorResult<ItemId> {
        let mut item = item.into();
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(EditorError::DuplicateItem(id));
        }
        if let Some(anchor) = item.anchor_mut() {
            anchor.clear();
        }

        match &mut item {
            BoardItem::NetLine(line) => {
                if line.start == line.end {
                    return Err(ConnectivityError::SameAnchor(id).into());
                }
                line.start_pos = self.anchor_position(line.start)?;
                line.end_pos = self.anchor_position(line.end)?;
                let (start, end) = (line.start, line.end);
                for anchor in [start, end] {
                    if let Some(anchor) = self.anchor_mut(anchor) {
                        anchor.register_net_line(id)?;
                    }
                }
            }
            BoardItem::FootprintPad(pad) => {
                let device = self
                    .device_mut(pad.device)
                    .ok_or(EditorError::ItemNotFound(pad.device))?;
                if !device.pads.contains(&id) {
                    device.pads.push(id);
                }
                pad.device_changed(device);
            }
            _ => {}
        }

        log::debug!("Added {} {}", item.kind(), id);
        self.z_order.push(id);
        self.items.insert(id, item);
        Ok(id)
    }

    /// Remove an item from the board.
    ///
    /// Anchors with attached net lines and devices with remaining pads are
    /// rejected with [`EditorError::ItemInUse`].
    pub fn remove_item(&mut self, id: ItemId) -> EditorResult<BoardItem> {
        let item = self.items.get(&id).ok_or(EditorError::ItemNotFound(id))?;
        if item.anchor().is_some_and(NetLineAnchor::is_used) {
            return Err(EditorError::ItemInUse(id));
        }
        let line_anchors = match item {
            BoardItem::Device(device) => {
                if device.pads.iter().any(|p| self.items.contains_key(p)) {
                    return Err(EditorError::ItemInUse(id));
                }
                None
            }
            BoardItem::NetLine(line) => Some([line.start, line.end]),
            _ => None,
        };
        if let Some(anchors) = line_anchors {
            for anchor in anchors {
                if !self.anchor(anchor).is_some_and(|a| a.is_registered(id)) {
                    return Err(ConnectivityError::NotRegistered(id).into());
                }
            }
            for anchor in anchors {
                if let Some(anchor) = self.anchor_mut(anchor) {
                    anchor.unregister_net_line(id)?;
                }
            }
        }

        self.z_order.retain(|&item_id| item_id != id);
        let item = self.items.remove(&id).ok_or(EditorError::ItemNotFound(id))?;
        log::debug!("Removed {} {}", item.kind(), id);
        Ok(item)
    }

    /// Position of an item in the z-order (0 = bottom).
    pub fn z_index(&self, id: ItemId) -> Option<usize> {
        self.z_order.iter().position(|&item_id| item_id == id)
    }

    /// Re-insert a previously removed item at its former z-index.
    pub(crate) fn restore_item(&mut self, item: BoardItem, z_index: usize) -> EditorResult<ItemId> {
        let id = self.add_item(item)?;
        self.z_order.pop();
        let index = z_index.min(self.z_order.len());
        self.z_order.insert(index, id);
        Ok(id)
    }

    /// Mutate an item in place and propagate the change to dependent items.
    pub fn update_item<R>(
        &mut self,
        id: ItemId,
        f: impl FnOnce(&mut BoardItem) -> R,
    ) -> EditorResult<R> {
        let item = self.items.get_mut(&id).ok_or(EditorError::ItemNotFound(id))?;
        let result = f(item);
        self.propagate(id);
        Ok(result)
    }

    /// Overwrite an item with an earlier copy of itself.
    ///
    /// Live connectivity (anchor registrations, device pad list, net line
    /// endpoints) and the selection flag are kept from the current item.
    pub fn replace_item(&mut self, snapshot: BoardItem) -> EditorResult<()> {
        let id = snapshot.id();
        let current = self.items.get_mut(&id).ok_or(EditorError::ItemNotFound(id))?;
        let mut snapshot = snapshot;
        if let (Some(live), Some(slot)) = (current.anchor(), snapshot.anchor_mut()) {
            *slot = live.clone();
        }
        match (&*current, &mut snapshot) {
            (BoardItem::Device(live), BoardItem::Device(snap)) => snap.pads = live.pads.clone(),
            (BoardItem::NetLine(live), BoardItem::NetLine(snap)) => {
                snap.start = live.start;
                snap.end = live.end;
            }
            _ => {}
        }
        snapshot.set_selected(current.is_selected());
        *current = snapshot;
        self.propagate(id);
        Ok(())
    }

    fn propagate(&mut self, id: ItemId) {
        match self.items.get(&id).map(BoardItem::kind) {
            Some(ItemKind::Device) => {
                self.notify_device_changed(id);
            }
            Some(kind) if kind.is_anchor() => self.refresh_net_lines(id),
            _ => {}
        }
    }

    /// Push the device placement to each of its pads, in pad order.
    /// Returns the number of pads notified.
    pub fn notify_device_changed(&mut self, device_id: ItemId) -> usize {
        let Some(BoardItem::Device(device)) = self.items.get(&device_id) else {
            return 0;
        };
        let device = device.clone();
        let mut notified = 0;
        for &pad_id in &device.pads {
            let updated = match self.items.get_mut(&pad_id) {
                Some(BoardItem::FootprintPad(pad)) => {
                    pad.device_changed(&device);
                    true
                }
                _ => false,
            };
            if updated {
                notified += 1;
                self.refresh_net_lines(pad_id);
            }
        }
        notified
    }

    /// Copy the anchor position into the cached endpoints of attached net lines.
    fn refresh_net_lines(&mut self, anchor_id: ItemId) {
        let Some(item) = self.items.get(&anchor_id) else {
            return;
        };
        let (Some(pos), Some(anchor)) = (item.position(), item.anchor()) else {
            return;
        };
        let lines: Vec<ItemId> = anchor.net_lines().iter().copied().collect();
        for line_id in lines {
            if let Some(BoardItem::NetLine(line)) = self.items.get_mut(&line_id) {
                if line.start == anchor_id {
                    line.start_pos = pos;
                }
                if line.end == anchor_id {
                    line.end_pos = pos;
                }
            }
        }
    }

    fn anchor_position(&self, id: ItemId) -> EditorResult<Point> {
        let item = self
            .items
            .get(&id)
            .ok_or(ConnectivityError::AnchorNotFound(id))?;
        match (item.anchor(), item.position()) {
            (Some(_), Some(pos)) => Ok(pos),
            _ => Err(ConnectivityError::NotAnAnchor(id).into()),
        }
    }

    fn anchor_mut(&mut self, id: ItemId) -> Option<&mut NetLineAnchor> {
        self.items.get_mut(&id).and_then(BoardItem::anchor_mut)
    }

    fn device_mut(&mut self, id: ItemId) -> Option<&mut Device> {
        match self.items.get_mut(&id) {
            Some(BoardItem::Device(d)) => Some(d),
            _ => None,
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&BoardItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in z-order (back to front).
    pub fn items_ordered(&self) -> impl Iterator<Item = &BoardItem> {
        self.z_order.iter().filter_map(|id| self.items.get(id))
    }

    /// The net line registry of an anchor item.
    pub fn anchor(&self, id: ItemId) -> Option<&NetLineAnchor> {
        self.items.get(&id).and_then(BoardItem::anchor)
    }

    pub fn device(&self, id: ItemId) -> Option<&Device> {
        self.items.get(&id).and_then(BoardItem::as_device)
    }

    pub fn net_line(&self, id: ItemId) -> Option<&NetLine> {
        self.items.get(&id).and_then(BoardItem::as_net_line)
    }

    pub fn plane(&self, id: ItemId) -> Option<&Plane> {
        self.items.get(&id).and_then(BoardItem::as_plane)
    }

    pub fn polygon(&self, id: ItemId) -> Option<&Polygon> {
        self.items.get(&id).and_then(BoardItem::as_polygon)
    }

    /// Length of a net line, or `None` if `id` is not a net line.
    pub fn net_line_length(&self, id: ItemId) -> Option<f64> {
        self.net_line(id).map(NetLine::length)
    }

    /// The anchor at the other end of `line` as seen from `anchor`.
    pub fn other_anchor(&self, line: ItemId, anchor: ItemId) -> Option<ItemId> {
        self.net_line(line).and_then(|l| l.other_anchor(anchor))
    }

    /// Outline path of a polygon or plane.
    pub fn outline(&self, target: OutlineTarget) -> Option<&Path> {
        match target {
            OutlineTarget::Polygon(id) => self.polygon(id).map(|p| &p.path),
            OutlineTarget::Plane(id) => self.plane(id).map(|p| &p.outline),
        }
    }

    pub fn set_outline(&mut self, target: OutlineTarget, path: Path) -> EditorResult<()> {
        let id = target.item_id();
        self.update_item(id, |item| match item {
            BoardItem::Polygon(p) if matches!(target, OutlineTarget::Polygon(_)) => {
                p.path = path;
                true
            }
            BoardItem::Plane(p) if matches!(target, OutlineTarget::Plane(_)) => {
                p.outline = path;
                true
            }
            _ => false,
        })?
        .then_some(())
        .ok_or(EditorError::ItemNotFound(id))
    }

    /// Find all items at a point, topmost first.
    ///
    /// Items are ordered by kind (net points, vias, traces, pads, texts, devices,
    /// holes, polygons, planes) and by reverse z-order within a kind.
    pub fn find_items_at(&self, point: Point, flags: FindFlags) -> Vec<ItemId> {
        let mut hits: Vec<(u8, usize, ItemId)> = self
            .z_order
            .iter()
            .enumerate()
            .filter_map(|(z, id)| {
                let item = self.items.get(id)?;
                if let BoardItem::Plane(plane) = item {
                    if !plane.visible && !flags.include_hidden_planes {
                        return None;
                    }
                }
                item.hit_test(point, flags.tolerance)
                    .then(|| (item.kind().pick_priority(), z, *id))
            })
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        hits.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Set the selection flag of one item. Returns false if the item does not exist.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.set_selected(selected);
                true
            }
            None => false,
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.items.get(&id).is_some_and(BoardItem::is_selected)
    }

    pub fn clear_selection(&mut self) {
        for item in self.items.values_mut() {
            item.set_selected(false);
        }
    }

    /// Select every item except pads, which are selected through their device.
    pub fn select_all(&mut self) {
        for item in self.items.values_mut() {
            item.set_selected(item.kind() != ItemKind::FootprintPad);
        }
    }

    /// Selected item ids in z-order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.items_ordered()
            .filter(|i| i.is_selected())
            .map(BoardItem::id)
            .collect()
    }

    pub fn selection_query(&self) -> SelectionQuery<'_> {
        SelectionQuery { board: self }
    }

    /// Update the rubber band.
    ///
    /// With `preview` the rectangle is shown and exactly the items touching it
    /// become selected. Without it the rectangle is hidden and the selection kept.
    pub fn set_selection_rect(&mut self, p1: Point, p2: Point, preview: bool) {
        if !preview {
            self.selection_rect = None;
            return;
        }
        let rect = Rect::from_points(p1, p2);
        self.selection_rect = Some(rect);
        for item in self.items.values_mut() {
            let b = item.bounds();
            let touches = rect.x0 <= b.x1 && b.x0 <= rect.x1 && rect.y0 <= b.y1 && b.y0 <= rect.y1;
            let hidden = matches!(item, BoardItem::Plane(p) if !p.visible);
            item.set_selected(touches && !hidden && item.kind() != ItemKind::FootprintPad);
        }
    }

    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection_rect
    }

    /// Select every via, net point and trace of a net segment.
    /// Returns the number of items selected.
    pub fn select_net_segment(&mut self, segment: SegmentId) -> usize {
        let mut count = 0;
        for item in self.items.values_mut() {
            if item.segment() == Some(segment) {
                item.set_selected(true);
                count += 1;
            }
        }
        count
    }
}

/// Typed view of the currently selected items.
#[derive(Debug, Clone, Copy)]
pub struct SelectionQuery<'a> {
    board: &'a Board,
}

impl<'a> SelectionQuery<'a> {
    fn collect<T: 'a>(&self, f: impl Fn(&'a BoardItem) -> Option<&'a T>) -> Vec<&'a T> {
        self.board
            .items_ordered()
            .filter(|i| i.is_selected())
            .filter_map(f)
            .collect()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.board.selected_ids()
    }

    pub fn len(&self) -> usize {
        self.board.items.values().filter(|i| i.is_selected()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn devices(&self) -> Vec<&'a Device> {
        self.collect(BoardItem::as_device)
    }

    pub fn pads(&self) -> Vec<&'a FootprintPad> {
        self.collect(BoardItem::as_pad)
    }

    pub fn vias(&self) -> Vec<&'a Via> {
        self.collect(BoardItem::as_via)
    }

    pub fn net_lines(&self) -> Vec<&'a NetLine> {
        self.collect(BoardItem::as_net_line)
    }

    pub fn net_points(&self) -> Vec<&'a NetPoint> {
        self.collect(BoardItem::as_net_point)
    }

    pub fn planes(&self) -> Vec<&'a Plane> {
        self.collect(BoardItem::as_plane)
    }

    pub fn polygons(&self) -> Vec<&'a Polygon> {
        self.collect(BoardItem::as_polygon)
    }

    pub fn stroke_texts(&self) -> Vec<&'a StrokeText> {
        self.collect(BoardItem::as_stroke_text)
    }

    pub fn holes(&self) -> Vec<&'a Hole> {
        self.collect(BoardItem::as_hole)
    }
}
