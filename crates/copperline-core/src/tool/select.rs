//! The select tool: picking, dragging, outline vertex editing and paste placement.

use super::{ContextAction, ContextMenu, EditorContext};
use crate::board::{Board, FindFlags};
use crate::clipboard::{ClipboardData, ClipboardDataBuilder};
use crate::commands::{
    DragSelectedItems, FlipSelectedItems, OutlineEditCommand, PasteItems, RemoveSelectedItems,
};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{Angle, Orientation, Path, snap_to_grid, snap_vec_to_grid};
use crate::input::{Modifiers, MouseButton, PointerEvent, SelectionModifier};
use crate::items::{BoardItem, ItemId, ItemKind};
use crate::measure::{TraceMeasurement, measure_trace};
use crate::outline::{OutlineTarget, insert_vertex, remove_vertices, vertex_indices_at};
use kurbo::{Point, Vec2};

/// Kinds that have a properties dialog, in the order they are looked up.
const PROPERTIES_ORDER: [ItemKind; 6] = [
    ItemKind::Device,
    ItemKind::Via,
    ItemKind::Plane,
    ItemKind::Polygon,
    ItemKind::StrokeText,
    ItemKind::Hole,
];

/// Sub-state of the select tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectState {
    /// Waiting for input; a rubber band may be shown.
    #[default]
    Idle,
    /// Moving the selection with the left button held.
    Dragging,
    /// Moving outline vertices of a polygon.
    EditingPolygonVertex,
    /// Moving outline vertices of a plane.
    EditingPlaneVertex,
    /// Pasted items follow the pointer until the next click.
    PlacingPaste,
}

/// State machine translating pointer and keyboard events into board edits.
///
/// Every handler returns whether the event was consumed. Failures abort the
/// running operation, are logged and can be fetched with
/// [`take_error`](Self::take_error); the tool is back in
/// [`SelectState::Idle`] afterwards.
#[derive(Debug, Default)]
pub struct SelectTool {
    state: SelectState,
    /// Live drag of the selection or of pasted items.
    drag: Option<DragSelectedItems>,
    /// Open outline edit while moving vertices.
    outline_edit: Option<OutlineEditCommand>,
    /// Vertex indices moved by the open outline edit.
    vertex_indices: Vec<usize>,
    /// Start corner of the rubber band, while one is shown.
    rubber_band_start: Option<Point>,
    /// Last known pointer position.
    cursor_pos: Point,
    right_press_pos: Option<Point>,
    context_menu: Option<ContextMenu>,
    last_measurement: Option<TraceMeasurement>,
    last_error: Option<EditorError>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SelectState::Idle
    }

    /// Menu built by the last right click.
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn last_measurement(&self) -> Option<&TraceMeasurement> {
        self.last_measurement.as_ref()
    }

    /// Vertex indices grabbed by the running outline edit.
    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    /// The error that made the last event fail, if any.
    pub fn take_error(&mut self) -> Option<EditorError> {
        self.last_error.take()
    }

    pub fn entry(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        let result = self.abort_command(ctx).map(|()| true);
        self.finish(ctx, result)
    }

    pub fn exit(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        let result = self.abort_command(ctx).map(|()| true);
        ctx.board.clear_selection();
        self.finish(ctx, result)
    }

    /// Dispatch a raw pointer event.
    pub fn handle_pointer(&mut self, ctx: &mut EditorContext<'_>, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Pressed {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.left_pressed(ctx, position, modifiers),
            PointerEvent::Pressed {
                position,
                button: MouseButton::Right,
                ..
            } => {
                self.right_press_pos = Some(position);
                false
            }
            PointerEvent::Released {
                position,
                button: MouseButton::Left,
            } => self.left_released(ctx, position),
            PointerEvent::Released {
                position,
                button: MouseButton::Right,
            } => {
                let press_pos = self.right_press_pos.take().unwrap_or(position);
                self.right_released(ctx, position, press_pos)
            }
            PointerEvent::Moved {
                position,
                left_button_down,
            } => self.pointer_moved(ctx, position, left_button_down),
            PointerEvent::DoubleClicked {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.left_double_clicked(ctx, position, modifiers),
            _ => false,
        }
    }

    pub fn pointer_moved(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        left_button_down: bool,
    ) -> bool {
        self.cursor_pos = pos;
        let result = self.process_pointer_moved(ctx, pos, left_button_down);
        self.finish(ctx, result)
    }

    pub fn left_pressed(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        modifiers: Modifiers,
    ) -> bool {
        self.cursor_pos = pos;
        let result = match self.state {
            SelectState::PlacingPaste => self.place_paste(ctx, pos),
            SelectState::Idle => self.start_idle_press(ctx, pos, modifiers),
            _ => Ok(false),
        };
        self.finish(ctx, result)
    }

    pub fn left_released(&mut self, ctx: &mut EditorContext<'_>, pos: Point) -> bool {
        self.cursor_pos = pos;
        let result = self.process_left_released(ctx, pos);
        self.finish(ctx, result)
    }

    /// With Shift or Control a double click acts like a press, otherwise it
    /// opens the properties of the first selected item under the cursor.
    pub fn left_double_clicked(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        modifiers: Modifiers,
    ) -> bool {
        if modifiers.shift || modifiers.ctrl {
            return self.left_pressed(ctx, pos, modifiers);
        }
        if !self.is_idle() {
            return false;
        }
        let candidates: Vec<ItemId> = hit_items(ctx, pos)
            .into_iter()
            .filter(|id| ctx.board.is_selected(*id))
            .collect();
        let result = self.open_first_properties(ctx, &candidates);
        self.finish(ctx, result)
    }

    /// A right click without moving rotates a running drag, otherwise it
    /// builds the context menu of the item under the cursor.
    pub fn right_released(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        press_pos: Point,
    ) -> bool {
        self.cursor_pos = pos;
        let result = self.process_right_released(ctx, pos, press_pos);
        self.finish(ctx, result)
    }

    pub fn select_all(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        ctx.board.select_all();
        true
    }

    pub fn copy(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = self.copy_selection(ctx);
        self.finish(ctx, result)
    }

    pub fn cut(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = self.copy_selection(ctx).and_then(|copied| {
            if !copied {
                return Ok(false);
            }
            ctx.undo_stack
                .exec_command(ctx.board, Box::new(RemoveSelectedItems::new()))
        });
        self.finish(ctx, result)
    }

    /// Paste the clipboard contents, attached to the pointer until the next click.
    pub fn paste(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = match ctx.clipboard.load() {
            Ok(Some(data)) => self.paste_data(ctx, data, None),
            Ok(None) => Ok(false),
            Err(e) => Err(e.into()),
        };
        self.finish(ctx, result)
    }

    /// Insert externally built items, e.g. from an imported drawing.
    ///
    /// With `fixed_position` the items are offset by it and placed at once,
    /// otherwise they follow the pointer like a paste.
    pub fn import(
        &mut self,
        ctx: &mut EditorContext<'_>,
        data: ClipboardData,
        fixed_position: Option<Point>,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = self.paste_data(ctx, data, fixed_position);
        self.finish(ctx, result)
    }

    pub fn move_selected(&mut self, ctx: &mut EditorContext<'_>, delta: Vec2) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = transform_selection(ctx, |drag, board| {
            drag.set_current_position(board, Point::ZERO + delta)
        });
        self.finish(ctx, result)
    }

    /// Rotate the selection, or the items being dragged.
    pub fn rotate(&mut self, ctx: &mut EditorContext<'_>, angle: Angle) -> bool {
        let result = if let Some(drag) = self.drag.as_mut() {
            drag.rotate(ctx.board, angle).map(|()| true)
        } else if self.is_idle() {
            transform_selection(ctx, |drag, board| drag.rotate(board, angle))
        } else {
            Ok(false)
        };
        self.finish(ctx, result)
    }

    pub fn flip(&mut self, ctx: &mut EditorContext<'_>, orientation: Orientation) -> bool {
        if !self.is_idle() {
            return false;
        }
        let command = FlipSelectedItems::new(orientation, ctx.config.grid_interval);
        let result = ctx.undo_stack.exec_command(ctx.board, Box::new(command));
        self.finish(ctx, result)
    }

    pub fn snap_to_grid(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = transform_selection(ctx, DragSelectedItems::snap_to_grid);
        self.finish(ctx, result)
    }

    /// Move texts of the selected devices back to their default placement.
    pub fn reset_all_texts(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = transform_selection(ctx, DragSelectedItems::reset_all_texts);
        self.finish(ctx, result)
    }

    pub fn remove(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let result = ctx
            .undo_stack
            .exec_command(ctx.board, Box::new(RemoveSelectedItems::new()));
        self.finish(ctx, result)
    }

    /// Open the properties of a selected item. Devices are preferred, then
    /// vias, planes, polygons, texts and holes. Traces have no dialog.
    pub fn edit_properties(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        if !self.is_idle() {
            return false;
        }
        let board = &*ctx.board;
        let selected = &board.selected_ids();
        let candidates: Vec<ItemId> = PROPERTIES_ORDER
            .iter()
            .flat_map(move |&kind| {
                selected
                    .iter()
                    .copied()
                    .filter(move |id| board.item(*id).is_some_and(|i| i.kind() == kind))
            })
            .collect();
        let result = self.open_first_properties(ctx, &candidates);
        self.finish(ctx, result)
    }

    /// Cancel the running operation and clear the selection.
    pub fn abort(&mut self, ctx: &mut EditorContext<'_>) -> bool {
        let result = self.abort_command(ctx).map(|()| true);
        ctx.board.clear_selection();
        self.finish(ctx, result)
    }

    /// The host may only switch boards while the tool is idle.
    pub fn switch_board(&mut self, _index: usize) -> bool {
        self.is_idle()
    }

    /// Run an entry of the last context menu.
    pub fn trigger(&mut self, ctx: &mut EditorContext<'_>, action: ContextAction) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        if !menu.is_enabled(action) || !self.is_idle() {
            log::warn!("Context action {action:?} is not available");
            return false;
        }
        log::debug!("Trigger {action:?} on {}", menu.item);
        match action {
            ContextAction::Properties => self.edit_properties(ctx),
            ContextAction::Cut => self.cut(ctx),
            ContextAction::Copy => self.copy(ctx),
            ContextAction::Remove => self.remove(ctx),
            ContextAction::RotateCcw => self.rotate(ctx, Angle::deg90()),
            ContextAction::RotateCw => self.rotate(ctx, -Angle::deg90()),
            ContextAction::FlipHorizontal => self.flip(ctx, Orientation::Horizontal),
            ContextAction::FlipVertical => self.flip(ctx, Orientation::Vertical),
            ContextAction::SnapToGrid => self.snap_to_grid(ctx),
            ContextAction::ResetAllTexts => self.reset_all_texts(ctx),
            ContextAction::SelectWholeTrace => {
                match ctx.board.item(menu.item).and_then(BoardItem::segment) {
                    Some(segment) => ctx.board.select_net_segment(segment) > 0,
                    None => false,
                }
            }
            ContextAction::RemoveWholeTrace => {
                match ctx.board.item(menu.item).and_then(BoardItem::segment) {
                    Some(segment) => {
                        ctx.board.select_net_segment(segment);
                        self.remove(ctx)
                    }
                    None => false,
                }
            }
            ContextAction::MeasureLength => match trace_seed(ctx, menu.item) {
                Some(seed) => {
                    ctx.board.set_selected(seed, true);
                    self.measure_selected_trace(ctx, seed)
                }
                None => false,
            },
            ContextAction::RemoveVertices => {
                let result = self.edit_outline(ctx, menu.item, "Remove vertex", |path| {
                    remove_vertices(path, &menu.vertex_indices)
                });
                self.finish(ctx, result)
            }
            ContextAction::AddVertex => {
                let Some(index) = menu.line_index else {
                    return false;
                };
                let result = self.start_adding_vertex(ctx, menu.item, index, menu.position);
                self.finish(ctx, result)
            }
            ContextAction::TogglePlaneVisibility => {
                let result = ctx.board.update_item(menu.item, |item| match item {
                    BoardItem::Plane(plane) => {
                        plane.visible = !plane.visible;
                        true
                    }
                    _ => false,
                });
                self.finish(ctx, result)
            }
        }
    }

    /// Measure the chain of selected traces through `line`.
    pub fn measure_selected_trace(&mut self, ctx: &mut EditorContext<'_>, line: ItemId) -> bool {
        let result = measure_trace(ctx.board, line)
            .map(|m| {
                self.last_measurement = Some(m);
                true
            })
            .map_err(EditorError::from);
        self.finish(ctx, result)
    }

    /// Turn a handler result into the consumed flag, recovering from errors.
    fn finish(&mut self, ctx: &mut EditorContext<'_>, result: EditorResult<bool>) -> bool {
        match result {
            Ok(consumed) => consumed,
            Err(e) => {
                log::error!("Select tool: {e}");
                if let Err(abort_err) = self.abort_command(ctx) {
                    log::error!("Failed to abort after error: {abort_err}");
                }
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Drop live changes of the running operation and return to idle.
    fn abort_command(&mut self, ctx: &mut EditorContext<'_>) -> EditorResult<()> {
        let mut result = Ok(());
        if let Some(mut drag) = self.drag.take() {
            result = result.and(drag.discard(ctx.board));
        }
        if let Some(mut edit) = self.outline_edit.take() {
            result = result.and(edit.discard(ctx.board));
        }
        if ctx.undo_stack.is_group_active() {
            result = result.and(ctx.undo_stack.abort_group(ctx.board));
        }
        self.vertex_indices.clear();
        if self.rubber_band_start.take().is_some() {
            ctx.board.set_selection_rect(self.cursor_pos, self.cursor_pos, false);
        }
        if self.state != SelectState::Idle {
            log::debug!("Abort {:?}", self.state);
        }
        self.state = SelectState::Idle;
        result
    }

    fn start_idle_press(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        modifiers: Modifiers,
    ) -> EditorResult<bool> {
        if let Some((target, indices)) = grabbed_vertices(ctx, pos) {
            let edit = OutlineEditCommand::new(ctx.board, target)?;
            self.begin_vertex_edit(edit, indices);
            return Ok(true);
        }

        let hits = hit_items(ctx, pos);
        if hits.is_empty() {
            ctx.board.clear_selection();
            ctx.board.set_selection_rect(pos, pos, true);
            self.rubber_band_start = Some(pos);
            return Ok(true);
        }

        apply_selection(ctx, &hits, modifiers.selection_modifier());
        self.drag = Some(DragSelectedItems::new(ctx.board, pos, ctx.config.grid_interval));
        self.state = SelectState::Dragging;
        log::debug!("Start dragging");
        Ok(true)
    }

    fn process_pointer_moved(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        left_button_down: bool,
    ) -> EditorResult<bool> {
        match self.state {
            SelectState::Dragging | SelectState::PlacingPaste => match self.drag.as_mut() {
                Some(drag) => drag.set_current_position(ctx.board, pos).map(|()| true),
                None => Ok(false),
            },
            SelectState::EditingPolygonVertex | SelectState::EditingPlaneVertex => {
                let Some(edit) = self.outline_edit.as_mut() else {
                    return Ok(false);
                };
                let snapped = snap_to_grid(pos, ctx.config.grid_interval);
                let mut path = edit.path().clone();
                for &i in &self.vertex_indices {
                    if let Some(vertex) = path.vertices_mut().get_mut(i) {
                        vertex.pos = snapped;
                    }
                }
                edit.set_path(ctx.board, path, true)?;
                Ok(true)
            }
            SelectState::Idle => match self.rubber_band_start {
                Some(start) if left_button_down => {
                    ctx.board.set_selection_rect(start, pos, true);
                    Ok(true)
                }
                _ => Ok(false),
            },
        }
    }

    fn process_left_released(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
    ) -> EditorResult<bool> {
        match self.state {
            SelectState::Dragging => {
                self.state = SelectState::Idle;
                let Some(mut drag) = self.drag.take() else {
                    return Ok(false);
                };
                drag.set_current_position(ctx.board, pos)?;
                ctx.undo_stack.exec_command(ctx.board, Box::new(drag))?;
                Ok(true)
            }
            SelectState::EditingPolygonVertex | SelectState::EditingPlaneVertex => {
                self.state = SelectState::Idle;
                self.vertex_indices.clear();
                let Some(edit) = self.outline_edit.take() else {
                    return Ok(false);
                };
                ctx.undo_stack.exec_command(ctx.board, Box::new(edit))?;
                Ok(true)
            }
            SelectState::Idle => match self.rubber_band_start.take() {
                Some(start) => {
                    ctx.board.set_selection_rect(start, pos, false);
                    Ok(true)
                }
                None => Ok(false),
            },
            SelectState::PlacingPaste => Ok(false),
        }
    }

    fn process_right_released(
        &mut self,
        ctx: &mut EditorContext<'_>,
        pos: Point,
        press_pos: Point,
    ) -> EditorResult<bool> {
        if let Some(drag) = self.drag.as_mut() {
            if pos != press_pos {
                return Ok(false);
            }
            drag.rotate(ctx.board, Angle::deg90())?;
            return Ok(true);
        }
        if !self.is_idle() {
            return Ok(false);
        }

        let hits = hit_items(ctx, pos);
        let item = match hits.iter().copied().find(|id| ctx.board.is_selected(*id)) {
            Some(selected) => selected,
            None => {
                let Some(&topmost) = hits.first() else {
                    self.context_menu = None;
                    return Ok(false);
                };
                ctx.board.clear_selection();
                ctx.board.set_selected(topmost, true);
                topmost
            }
        };
        let Some(board_item) = ctx.board.item(item) else {
            return Ok(false);
        };
        let menu = ContextMenu::for_item(ctx.board, board_item, pos, ctx.commands, ctx.config);
        log::debug!("Context menu for {} with {} entries", board_item.kind(), menu.entries.len());
        self.context_menu = Some(menu);
        Ok(true)
    }

    fn copy_selection(&mut self, ctx: &mut EditorContext<'_>) -> EditorResult<bool> {
        let data = ClipboardDataBuilder::new(ctx.board, self.cursor_pos).build();
        if data.is_empty() {
            return Ok(false);
        }
        ctx.clipboard.store(&data)?;
        log::debug!("Copied {} items", data.len());
        Ok(true)
    }

    fn paste_data(
        &mut self,
        ctx: &mut EditorContext<'_>,
        data: ClipboardData,
        fixed_position: Option<Point>,
    ) -> EditorResult<bool> {
        let grid = ctx.config.grid_interval;
        let offset = match fixed_position {
            Some(position) => position.to_vec2(),
            None => snap_vec_to_grid(self.cursor_pos - data.cursor_pos, grid),
        };

        ctx.board.clear_selection();
        ctx.undo_stack.begin_group("Paste board elements")?;
        let pasted = ctx
            .undo_stack
            .append_to_group(ctx.board, Box::new(PasteItems::new(data, offset)))?;
        if !pasted {
            ctx.undo_stack.abort_group(ctx.board)?;
            log::debug!("Nothing to paste");
            return Ok(false);
        }
        if fixed_position.is_some() {
            ctx.undo_stack.commit_group()?;
            return Ok(true);
        }
        self.drag = Some(DragSelectedItems::new(ctx.board, self.cursor_pos, grid));
        self.state = SelectState::PlacingPaste;
        log::debug!("Start placing pasted items");
        Ok(true)
    }

    fn place_paste(&mut self, ctx: &mut EditorContext<'_>, pos: Point) -> EditorResult<bool> {
        let Some(mut drag) = self.drag.take() else {
            return Ok(false);
        };
        drag.set_current_position(ctx.board, pos)?;
        ctx.undo_stack.append_to_group(ctx.board, Box::new(drag))?;
        ctx.undo_stack.commit_group()?;
        self.state = SelectState::Idle;
        Ok(true)
    }

    /// Offer the candidates to the presenter until one of them shows a dialog.
    fn open_first_properties(
        &mut self,
        ctx: &mut EditorContext<'_>,
        candidates: &[ItemId],
    ) -> EditorResult<bool> {
        for &id in candidates {
            let item = ctx.board.item(id).ok_or(EditorError::ItemNotFound(id))?;
            if ctx.presenter.open_properties(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Enter vertex editing with `edit` open and `indices` following the pointer.
    fn begin_vertex_edit(&mut self, edit: OutlineEditCommand, indices: Vec<usize>) {
        self.state = match edit.target() {
            OutlineTarget::Polygon(_) => SelectState::EditingPolygonVertex,
            OutlineTarget::Plane(_) => SelectState::EditingPlaneVertex,
        };
        log::debug!("Start editing vertices {indices:?} of {}", edit.target().item_id());
        self.vertex_indices = indices;
        self.outline_edit = Some(edit);
    }

    /// Insert a vertex before `index` and let it follow the pointer until the
    /// next left release commits the edit.
    fn start_adding_vertex(
        &mut self,
        ctx: &mut EditorContext<'_>,
        item: ItemId,
        index: usize,
        pos: Point,
    ) -> EditorResult<bool> {
        let Some(target) = ctx.board.item(item).and_then(OutlineTarget::for_item) else {
            return Ok(false);
        };
        let mut edit = OutlineEditCommand::new(ctx.board, target)?.with_description("Add vertex");
        let Some(path) = insert_vertex(edit.path(), index, pos, ctx.config.grid_interval) else {
            return Ok(false);
        };
        edit.set_path(ctx.board, path, true)?;
        self.begin_vertex_edit(edit, vec![index]);
        Ok(true)
    }

    fn edit_outline(
        &mut self,
        ctx: &mut EditorContext<'_>,
        item: ItemId,
        description: &str,
        edit: impl FnOnce(&Path) -> Option<Path>,
    ) -> EditorResult<bool> {
        let Some(target) = ctx.board.item(item).and_then(OutlineTarget::for_item) else {
            return Ok(false);
        };
        let mut command = OutlineEditCommand::new(ctx.board, target)?.with_description(description);
        let Some(path) = edit(command.path()) else {
            return Ok(false);
        };
        command.set_path(ctx.board, path, false)?;
        ctx.undo_stack.exec_command(ctx.board, Box::new(command))
    }
}

/// Apply `f` to the movable selection and record it as one drag command.
fn transform_selection(
    ctx: &mut EditorContext<'_>,
    f: impl FnOnce(&mut DragSelectedItems, &mut Board) -> EditorResult<()>,
) -> EditorResult<bool> {
    let mut drag = DragSelectedItems::new(ctx.board, Point::ZERO, ctx.config.grid_interval);
    if drag.is_empty() {
        return Ok(false);
    }
    f(&mut drag, ctx.board)?;
    ctx.undo_stack.exec_command(ctx.board, Box::new(drag))
}

/// Items under `pos`, topmost first. Pads stand for their device.
fn hit_items(ctx: &EditorContext<'_>, pos: Point) -> Vec<ItemId> {
    let mut hits: Vec<ItemId> = Vec::new();
    for id in ctx
        .board
        .find_items_at(pos, FindFlags::near_match(ctx.config.hit_tolerance))
    {
        let id = match ctx.board.item(id) {
            Some(BoardItem::FootprintPad(pad)) => pad.device(),
            _ => id,
        };
        if !hits.contains(&id) {
            hits.push(id);
        }
    }
    hits
}

/// Outline vertices of a selected polygon or plane under `pos`.
fn grabbed_vertices(ctx: &EditorContext<'_>, pos: Point) -> Option<(OutlineTarget, Vec<usize>)> {
    let query = ctx.board.selection_query();
    let polygons = query
        .polygons()
        .into_iter()
        .map(|p| (OutlineTarget::Polygon(p.id), &p.path));
    let planes = query
        .planes()
        .into_iter()
        .filter(|p| p.visible)
        .map(|p| (OutlineTarget::Plane(p.id), &p.outline));
    polygons.chain(planes).find_map(|(target, path)| {
        let indices = vertex_indices_at(path, pos, ctx.config.vertex_handle_radius);
        (!indices.is_empty()).then_some((target, indices))
    })
}

/// Update the selection for a click on `hits` (topmost first).
fn apply_selection(ctx: &mut EditorContext<'_>, hits: &[ItemId], modifier: SelectionModifier) {
    let board = &mut *ctx.board;
    let first_selected = hits.iter().position(|id| board.is_selected(*id));
    match modifier {
        SelectionModifier::Toggle => {
            let id = hits[first_selected.unwrap_or(0)];
            let selected = board.is_selected(id);
            board.set_selected(id, !selected);
        }
        SelectionModifier::Cycle => {
            let next = first_selected.map_or(0, |i| (i + 1) % hits.len());
            board.clear_selection();
            board.set_selected(hits[next], true);
        }
        SelectionModifier::Replace => {
            if first_selected.is_none() {
                board.clear_selection();
                board.set_selected(hits[0], true);
            }
        }
    }
}

/// A trace to start measuring from: the item itself, or a trace at a net point.
fn trace_seed(ctx: &EditorContext<'_>, item: ItemId) -> Option<ItemId> {
    match ctx.board.item(item)? {
        BoardItem::NetLine(line) => Some(line.id),
        other => {
            let lines = other.anchor()?.net_lines();
            lines
                .iter()
                .copied()
                .find(|l| ctx.board.is_selected(*l))
                .or_else(|| lines.iter().copied().min())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::JsonClipboard;
    use crate::command_set::CommandSet;
    use crate::config::EditorConfig;
    use crate::error::{MeasureError, PresenterError};
    use crate::items::{Device, Hole, NetLine, NetPoint, Plane, Polygon, StrokeText};
    use crate::test_support::{TraceFixture, init_logging};
    use crate::tool::PropertiesPresenter;
    use crate::undo::UndoStack;
    use kurbo::{Rect, Size};

    #[derive(Default)]
    struct RecordingPresenter {
        opened: Vec<ItemId>,
        /// Items without a dialog.
        declined: Vec<ItemId>,
        fail: bool,
    }

    impl PropertiesPresenter for RecordingPresenter {
        fn open_properties(&mut self, item: &BoardItem) -> Result<bool, PresenterError> {
            if self.fail {
                return Err(PresenterError("dialog crashed".to_string()));
            }
            if self.declined.contains(&item.id()) {
                return Ok(false);
            }
            self.opened.push(item.id());
            Ok(true)
        }
    }

    struct Editor {
        board: Board,
        undo: UndoStack,
        clipboard: JsonClipboard,
        presenter: RecordingPresenter,
        commands: CommandSet,
        config: EditorConfig,
        tool: SelectTool,
    }

    impl Editor {
        fn new(board: Board) -> Self {
            init_logging();
            Self {
                board,
                undo: UndoStack::default(),
                clipboard: JsonClipboard::new(),
                presenter: RecordingPresenter::default(),
                commands: CommandSet::new(),
                config: EditorConfig::default(),
                tool: SelectTool::new(),
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut SelectTool, &mut EditorContext<'_>) -> R) -> R {
            let mut ctx = EditorContext {
                board: &mut self.board,
                undo_stack: &mut self.undo,
                clipboard: &mut self.clipboard,
                presenter: &mut self.presenter,
                commands: &self.commands,
                config: &self.config,
            };
            f(&mut self.tool, &mut ctx)
        }

        fn press(&mut self, pos: Point, modifiers: Modifiers) -> bool {
            self.run(|t, c| t.left_pressed(c, pos, modifiers))
        }

        fn drag_to(&mut self, pos: Point) -> bool {
            self.run(|t, c| t.pointer_moved(c, pos, true))
        }

        fn hover(&mut self, pos: Point) -> bool {
            self.run(|t, c| t.pointer_moved(c, pos, false))
        }

        fn release(&mut self, pos: Point) -> bool {
            self.run(|t, c| t.left_released(c, pos))
        }

        fn click(&mut self, pos: Point, modifiers: Modifiers) {
            self.press(pos, modifiers);
            self.release(pos);
        }

        fn position(&self, id: ItemId) -> Point {
            self.board.item(id).unwrap().position().unwrap()
        }
    }

    /// Two overlapping holes, `upper` on top.
    fn overlapping_holes() -> (Editor, ItemId, ItemId) {
        let mut board = Board::new("test");
        let lower = board.add_item(Hole::new(Point::ZERO, 2.0)).unwrap();
        let upper = board.add_item(Hole::new(Point::new(0.5, 0.0), 2.0)).unwrap();
        (Editor::new(board), lower, upper)
    }

    fn square_polygon(board: &mut Board) -> ItemId {
        board
            .add_item(Polygon::new(
                "top_silkscreen",
                0.2,
                Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            ))
            .unwrap()
    }

    const HIT: Point = Point::new(0.2, 0.0);

    #[test]
    fn test_plain_click_selects_topmost() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.click(HIT, Modifiers::NONE);
        assert!(ed.board.is_selected(upper));
        assert!(!ed.board.is_selected(lower));

        // A hit item is already selected, so the selection stays.
        ed.board.clear_selection();
        ed.board.set_selected(lower, true);
        ed.click(HIT, Modifiers::NONE);
        assert!(ed.board.is_selected(lower));
        assert!(!ed.board.is_selected(upper));
        assert_eq!(ed.undo.undo_count(), 0);
    }

    #[test]
    fn test_shift_click_cycles_through_stack() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.click(HIT, Modifiers::NONE);
        ed.click(HIT, Modifiers::SHIFT);
        assert_eq!(ed.board.selected_ids(), vec![lower]);
        ed.click(HIT, Modifiers::SHIFT);
        assert_eq!(ed.board.selected_ids(), vec![upper]);
    }

    #[test]
    fn test_ctrl_click_toggles() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.board.set_selected(lower, true);
        ed.click(HIT, Modifiers::CTRL);
        assert!(!ed.board.is_selected(lower));
        assert!(!ed.board.is_selected(upper));

        ed.click(HIT, Modifiers::CTRL);
        assert_eq!(ed.board.selected_ids(), vec![upper]);
    }

    #[test]
    fn test_drag_records_one_undo_entry() {
        let mut f = TraceFixture::new();
        let p1 = f.points[1];
        let start = f.board.item(p1).unwrap().position().unwrap();
        let mut ed = Editor::new(f.board);

        assert!(ed.press(start, Modifiers::NONE));
        assert_eq!(ed.tool.state(), SelectState::Dragging);
        assert!(ed.board.is_selected(p1));
        ed.drag_to(start + Vec2::new(1.0, 0.2));
        ed.drag_to(start + Vec2::new(2.6, 0.1));
        assert!(ed.release(start + Vec2::new(2.6, 0.1)));
        assert!(ed.tool.is_idle());

        let moved = start + Vec2::new(2.54, 0.0);
        assert!(ed.position(p1).distance(moved) < 1e-9);
        let line = ed.board.net_line(f.lines[1]).unwrap();
        assert!(line.end_position().distance(moved) < 1e-9);
        assert_eq!(ed.undo.undo_count(), 1);
        assert_eq!(ed.undo.undo_text(), Some("Drag board elements"));

        ed.undo.undo(&mut ed.board).unwrap();
        assert_eq!(ed.position(p1), start);
        assert_eq!(ed.board.net_line(f.lines[1]).unwrap().end_position(), start);
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let (mut ed, _, _) = overlapping_holes();
        ed.click(HIT, Modifiers::NONE);
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_right_click_rotates_running_drag() {
        let mut board = Board::new("test");
        let device = board
            .add_item(Device::new("U1", Point::ZERO, Size::new(2.0, 2.0)))
            .unwrap();
        let mut ed = Editor::new(board);
        ed.press(Point::ZERO, Modifiers::NONE);
        assert!(ed.run(|t, c| t.right_released(c, Point::ZERO, Point::ZERO)));
        // Moving between right press and release does not rotate.
        assert!(!ed.run(|t, c| t.right_released(c, Point::ZERO, Point::new(1.0, 0.0))));
        ed.release(Point::ZERO);

        assert_eq!(ed.board.device(device).unwrap().rotation.to_deg(), 90.0);
        assert_eq!(ed.undo.undo_count(), 1);
    }

    #[test]
    fn test_rubber_band_selection() {
        let (mut ed, lower, upper) = overlapping_holes();
        let far = ed.board.add_item(Hole::new(Point::new(30.0, 30.0), 1.0)).unwrap();
        assert!(ed.press(Point::new(-5.0, -5.0), Modifiers::NONE));
        assert!(ed.tool.is_idle());
        assert!(ed.drag_to(Point::new(5.0, 5.0)));
        assert!(ed.board.selection_rect().is_some());
        assert!(ed.board.is_selected(lower) && ed.board.is_selected(upper));
        assert!(!ed.board.is_selected(far));

        assert!(ed.release(Point::new(5.0, 5.0)));
        assert_eq!(ed.board.selection_rect(), None);
        assert!(ed.board.is_selected(lower));
    }

    #[test]
    fn test_polygon_vertex_edit() {
        let mut board = Board::new("test");
        let polygon = square_polygon(&mut board);
        board.set_selected(polygon, true);
        let mut ed = Editor::new(board);

        assert!(ed.press(Point::new(10.0, 0.1), Modifiers::NONE));
        assert_eq!(ed.tool.state(), SelectState::EditingPolygonVertex);
        assert_eq!(ed.tool.vertex_indices(), &[1]);
        ed.drag_to(Point::new(12.6, -0.2));
        let live = ed.board.polygon(polygon).unwrap().path.vertices()[1].pos;
        assert!(live.distance(Point::new(12.7, 0.0)) < 1e-9);
        ed.release(Point::new(12.6, -0.2));

        assert!(ed.tool.is_idle());
        assert!(ed.tool.vertex_indices().is_empty());
        assert_eq!(ed.undo.undo_text(), Some("Edit polygon"));
        ed.undo.undo(&mut ed.board).unwrap();
        let restored = ed.board.polygon(polygon).unwrap().path.vertices()[1].pos;
        assert_eq!(restored, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_plane_corner_moves_as_one() {
        let mut board = Board::new("test");
        let plane = board
            .add_item(Plane::new("GND", "top_copper", Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))))
            .unwrap();
        board.set_selected(plane, true);
        let mut ed = Editor::new(board);

        ed.press(Point::ZERO, Modifiers::NONE);
        assert_eq!(ed.tool.state(), SelectState::EditingPlaneVertex);
        assert_eq!(ed.tool.vertex_indices(), &[0, 4]);
        ed.drag_to(Point::new(-2.54, -2.54));
        ed.release(Point::new(-2.54, -2.54));

        let outline = &ed.board.plane(plane).unwrap().outline;
        assert!(outline.is_closed());
        assert_eq!(outline.vertices()[0].pos, Point::new(-2.54, -2.54));
    }

    #[test]
    fn test_paste_follows_pointer_until_click() {
        let mut f = TraceFixture::new();
        f.select(&[f.device]);
        let count = f.board.len();
        let mut ed = Editor::new(f.board);

        ed.hover(Point::ZERO);
        assert!(ed.run(|t, c| t.copy(c)));
        ed.hover(Point::new(50.8, 0.0));
        assert!(ed.run(|t, c| t.paste(c)));
        assert_eq!(ed.tool.state(), SelectState::PlacingPaste);
        assert!(ed.undo.is_group_active());
        assert_eq!(ed.board.len(), count + 2);

        ed.hover(Point::new(50.8, 25.4));
        assert!(ed.press(Point::new(50.8, 25.4), Modifiers::NONE));
        assert!(ed.tool.is_idle());
        assert!(!ed.undo.is_group_active());
        assert_eq!(ed.undo.undo_count(), 1);
        assert_eq!(ed.undo.undo_text(), Some("Paste board elements"));

        let pasted = ed.board.selection_query().devices()[0].position;
        assert!(pasted.distance(Point::new(50.8, 25.4)) < 1e-9);

        ed.undo.undo(&mut ed.board).unwrap();
        assert_eq!(ed.board.len(), count);
    }

    #[test]
    fn test_empty_import_aborts_group() {
        let mut ed = Editor::new(Board::new("test"));
        let data = ClipboardData::new(Point::ZERO);
        assert!(!ed.run(|t, c| t.import(c, data, None)));
        assert!(!ed.undo.is_group_active());
        assert!(ed.tool.is_idle());
        assert!(!ed.undo.can_undo());
        assert!(ed.tool.take_error().is_none());
    }

    #[test]
    fn test_import_at_fixed_position_commits() {
        let mut ed = Editor::new(Board::new("test"));
        let mut data = ClipboardData::new(Point::ZERO);
        data.items.push(Hole::new(Point::new(1.0, 1.0), 3.0).into());
        assert!(ed.run(|t, c| t.import(c, data, Some(Point::new(10.0, 0.0)))));
        assert!(ed.tool.is_idle());
        assert_eq!(ed.undo.undo_count(), 1);
        let hole = ed.board.selected_ids()[0];
        assert_eq!(ed.position(hole), Point::new(11.0, 1.0));
    }

    #[test]
    fn test_malformed_clipboard_is_reported() {
        let mut ed = Editor::new(Board::new("test"));
        ed.clipboard.set_payload("{ not json");
        assert!(!ed.run(|t, c| t.paste(c)));
        assert!(matches!(ed.tool.take_error(), Some(EditorError::Clipboard(_))));
        assert!(ed.tool.is_idle());
        assert!(!ed.undo.is_group_active());
    }

    #[test]
    fn test_abort_restores_drag() {
        let (mut ed, _, upper) = overlapping_holes();
        let start = ed.position(upper);
        ed.press(HIT, Modifiers::NONE);
        ed.drag_to(HIT + Vec2::new(5.08, 0.0));
        assert_ne!(ed.position(upper), start);

        assert!(ed.run(|t, c| t.abort(c)));
        assert!(ed.tool.is_idle());
        assert_eq!(ed.position(upper), start);
        assert!(ed.board.selected_ids().is_empty());
        assert!(!ed.undo.can_undo());
        // Aborting again is harmless.
        assert!(ed.run(|t, c| t.abort(c)));
    }

    #[test]
    fn test_abort_drops_pending_paste() {
        let (mut ed, lower, _) = overlapping_holes();
        ed.board.set_selected(lower, true);
        ed.run(|t, c| t.copy(c));
        ed.run(|t, c| t.paste(c));
        assert_eq!(ed.board.len(), 3);

        assert!(ed.run(|t, c| t.exit(c)));
        assert_eq!(ed.board.len(), 2);
        assert!(!ed.undo.is_group_active());
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_abort_restores_vertex_edit() {
        let mut board = Board::new("test");
        let polygon = square_polygon(&mut board);
        board.set_selected(polygon, true);
        let original = board.polygon(polygon).unwrap().path.clone();
        let mut ed = Editor::new(board);

        ed.press(Point::new(10.0, 10.0), Modifiers::NONE);
        ed.drag_to(Point::new(15.0, 15.0));
        ed.run(|t, c| t.abort(c));
        assert_eq!(ed.board.polygon(polygon).unwrap().path, original);
        assert!(ed.tool.vertex_indices().is_empty());
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_commands_need_idle_tool() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.press(HIT, Modifiers::NONE);
        assert!(!ed.run(|t, c| t.select_all(c)));
        assert!(!ed.run(|t, c| t.remove(c)));
        assert!(!ed.run(|t, c| t.flip(c, Orientation::Horizontal)));
        assert!(!ed.tool.switch_board(1));
        ed.release(HIT);

        assert!(ed.tool.switch_board(1));
        assert!(ed.run(|t, c| t.select_all(c)));
        assert!(ed.board.is_selected(lower) && ed.board.is_selected(upper));
        assert!(ed.run(|t, c| t.remove(c)));
        assert!(ed.board.is_empty());
    }

    #[test]
    fn test_move_and_rotate_selected() {
        let mut board = Board::new("test");
        let device = board
            .add_item(Device::new("U1", Point::ZERO, Size::new(2.0, 2.0)))
            .unwrap();
        board.set_selected(device, true);
        let mut ed = Editor::new(board);

        assert!(ed.run(|t, c| t.move_selected(c, Vec2::new(2.54, 0.0))));
        assert!(ed.position(device).distance(Point::new(2.54, 0.0)) < 1e-9);
        assert!(ed.run(|t, c| t.rotate(c, Angle::deg90())));
        assert_eq!(ed.board.device(device).unwrap().rotation.to_deg(), 90.0);
        assert!(ed.run(|t, c| t.flip(c, Orientation::Horizontal)));
        assert!(ed.board.device(device).unwrap().mirrored);
        assert_eq!(ed.undo.undo_count(), 3);

        ed.board.clear_selection();
        assert!(!ed.run(|t, c| t.move_selected(c, Vec2::new(2.54, 0.0))));
    }

    #[test]
    fn test_double_click_opens_properties() {
        let (mut ed, _, upper) = overlapping_holes();
        ed.click(HIT, Modifiers::NONE);
        assert!(ed.run(|t, c| t.left_double_clicked(c, HIT, Modifiers::NONE)));
        assert_eq!(ed.presenter.opened, vec![upper]);
    }

    #[test]
    fn test_modified_double_click_acts_as_press() {
        let (mut ed, lower, _) = overlapping_holes();
        ed.click(HIT, Modifiers::NONE);
        assert!(ed.run(|t, c| t.left_double_clicked(c, HIT, Modifiers::SHIFT)));
        assert_eq!(ed.tool.state(), SelectState::Dragging);
        ed.release(HIT);
        assert_eq!(ed.board.selected_ids(), vec![lower]);

        assert!(ed.run(|t, c| t.left_double_clicked(c, HIT, Modifiers::CTRL)));
        ed.release(HIT);
        assert!(ed.board.selected_ids().is_empty());
        assert!(ed.presenter.opened.is_empty());
    }

    #[test]
    fn test_double_click_tries_selected_hits_in_turn() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.presenter.declined.push(upper);
        ed.board.set_selected(lower, true);
        ed.board.set_selected(upper, true);
        assert!(ed.run(|t, c| t.left_double_clicked(c, HIT, Modifiers::NONE)));
        assert_eq!(ed.presenter.opened, vec![lower]);

        // Unselected hits are not offered.
        ed.board.clear_selection();
        assert!(!ed.run(|t, c| t.left_double_clicked(c, HIT, Modifiers::NONE)));
        assert_eq!(ed.presenter.opened, vec![lower]);
    }

    #[test]
    fn test_edit_properties_skips_traces() {
        let mut f = TraceFixture::new();
        let hole = f.board.add_item(Hole::new(Point::new(40.0, 40.0), 1.0)).unwrap();
        f.select(&[f.lines[0], hole]);
        let mut ed = Editor::new(f.board);

        assert!(ed.run(|t, c| t.edit_properties(c)));
        assert_eq!(ed.presenter.opened, vec![hole]);

        // Devices come before holes.
        ed.board.set_selected(f.device, true);
        assert!(ed.run(|t, c| t.edit_properties(c)));
        assert_eq!(ed.presenter.opened, vec![hole, f.device]);

        ed.board.clear_selection();
        ed.board.set_selected(f.lines[0], true);
        ed.board.set_selected(f.points[0], true);
        assert!(!ed.run(|t, c| t.edit_properties(c)));
        assert_eq!(ed.presenter.opened.len(), 2);
    }

    #[test]
    fn test_presenter_failure_is_caught() {
        let (mut ed, _, upper) = overlapping_holes();
        ed.board.set_selected(upper, true);
        ed.presenter.fail = true;
        assert!(!ed.run(|t, c| t.edit_properties(c)));
        assert!(matches!(ed.tool.take_error(), Some(EditorError::Presenter(_))));
        assert!(ed.tool.take_error().is_none());
        assert!(ed.tool.is_idle());
    }

    #[test]
    fn test_context_menu_selects_topmost() {
        let (mut ed, lower, upper) = overlapping_holes();
        ed.board.set_selected(lower, true);
        assert!(ed.run(|t, c| t.right_released(c, HIT, HIT)));
        let menu = ed.tool.context_menu().unwrap();
        assert_eq!(menu.item, lower);
        assert!(ed.board.is_selected(lower));

        ed.board.clear_selection();
        ed.run(|t, c| t.right_released(c, HIT, HIT));
        assert_eq!(ed.tool.context_menu().unwrap().item, upper);
        assert_eq!(ed.board.selected_ids(), vec![upper]);

        let far = Point::new(40.0, 40.0);
        assert!(!ed.run(|t, c| t.right_released(c, far, far)));
        assert!(ed.tool.context_menu().is_none());
    }

    #[test]
    fn test_measure_from_context_menu() {
        let mut f = TraceFixture::new();
        let lines = f.lines.clone();
        f.select(&lines);
        let mut ed = Editor::new(f.board);

        assert!(ed.run(|t, c| t.right_released(c, Point::new(10.0, 5.0), Point::new(10.0, 5.0))));
        assert_eq!(ed.tool.context_menu().unwrap().item, lines[1]);
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::MeasureLength)));
        let m = ed.tool.last_measurement().unwrap();
        assert!((m.total_length - 30.0).abs() < 1e-9);
        assert!(m.is_connected());
        // The menu is consumed by the trigger.
        assert!(!ed.run(|t, c| t.trigger(c, ContextAction::MeasureLength)));
    }

    #[test]
    fn test_measure_from_net_point_menu_selects_seed() {
        let f = TraceFixture::new();
        let mut ed = Editor::new(f.board);
        let at = Point::new(10.0, 10.0);

        assert!(ed.run(|t, c| t.right_released(c, at, at)));
        assert_eq!(ed.tool.context_menu().unwrap().item, f.points[1]);
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::MeasureLength)));
        assert!(ed.tool.take_error().is_none());

        let m = ed.tool.last_measurement().unwrap();
        assert!((m.total_length - 10.0).abs() < 1e-9);
        assert!(m.is_connected());
        let seed = m.visited[0];
        assert!(seed == f.lines[1] || seed == f.lines[2]);
        assert!(ed.board.is_selected(seed));
    }

    #[test]
    fn test_branching_measurement_fails() {
        let mut f = TraceFixture::new();
        let extra = f
            .board
            .add_item(NetPoint::new(f.segment, Point::new(10.0, -10.0)))
            .unwrap();
        let spur = f
            .board
            .add_item(NetLine::new(f.segment, f.points[0], extra, 0.25))
            .unwrap();
        let mut selected = f.lines.clone();
        selected.push(spur);
        f.select(&selected);
        let seed = f.lines[1];
        let mut ed = Editor::new(f.board);

        assert!(!ed.run(|t, c| t.measure_selected_trace(c, seed)));
        assert!(matches!(
            ed.tool.take_error(),
            Some(EditorError::Measure(MeasureError::Branch))
        ));
        assert!(ed.tool.last_measurement().is_none());
        assert!(ed.tool.is_idle());
    }

    #[test]
    fn test_remove_whole_trace_from_context_menu() {
        let f = TraceFixture::new();
        let mut ed = Editor::new(f.board);
        ed.run(|t, c| t.right_released(c, Point::new(15.0, 10.0), Point::new(15.0, 10.0)));
        assert_eq!(ed.tool.context_menu().unwrap().item, f.lines[2]);
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::RemoveWholeTrace)));
        for id in f.lines.iter().chain(&f.points).chain([&f.via]) {
            assert!(!ed.board.contains(*id));
        }
        assert!(ed.board.contains(f.pad_a));
        ed.undo.undo(&mut ed.board).unwrap();
        assert!(ed.board.contains(f.via));
        assert!(ed.board.anchor(f.pad_a).unwrap().is_used());
    }

    #[test]
    fn test_add_and_remove_vertex_from_context_menu() {
        let mut board = Board::new("test");
        let polygon = square_polygon(&mut board);
        let mut ed = Editor::new(board);

        ed.run(|t, c| t.right_released(c, Point::new(5.0, 0.1), Point::new(5.0, 0.1)));
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::AddVertex)));
        assert!(ed.release(Point::new(5.0, 0.1)));
        let path = ed.board.polygon(polygon).unwrap().path.clone();
        assert_eq!(path.len(), 6);
        assert!(path.vertices()[1].pos.distance(Point::new(5.08, 0.0)) < 1e-9);
        assert_eq!(ed.undo.undo_text(), Some("Add vertex"));

        ed.run(|t, c| t.right_released(c, Point::new(10.0, 10.0), Point::new(10.0, 10.0)));
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::RemoveVertices)));
        assert_eq!(ed.board.polygon(polygon).unwrap().path.len(), 5);
    }

    #[test]
    fn test_added_vertex_follows_pointer_until_release() {
        let mut board = Board::new("test");
        let polygon = square_polygon(&mut board);
        let original = board.polygon(polygon).unwrap().path.clone();
        let mut ed = Editor::new(board);

        let at = Point::new(5.0, 0.1);
        ed.run(|t, c| t.right_released(c, at, at));
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::AddVertex)));
        assert_eq!(ed.tool.state(), SelectState::EditingPolygonVertex);
        assert_eq!(ed.tool.vertex_indices(), &[1]);
        assert_eq!(ed.board.polygon(polygon).unwrap().path.len(), 6);
        assert!(!ed.undo.can_undo());

        ed.drag_to(Point::new(5.0, -5.0));
        let live = ed.board.polygon(polygon).unwrap().path.vertices()[1].pos;
        assert!(live.distance(Point::new(5.08, -5.08)) < 1e-9);
        assert!(ed.release(Point::new(5.0, -5.0)));
        assert!(ed.tool.is_idle());
        assert_eq!(ed.undo.undo_count(), 1);
        assert_eq!(ed.undo.undo_text(), Some("Add vertex"));

        ed.undo.undo(&mut ed.board).unwrap();
        assert_eq!(ed.board.polygon(polygon).unwrap().path, original);
    }

    #[test]
    fn test_abort_drops_added_vertex() {
        let mut board = Board::new("test");
        let plane = board
            .add_item(Plane::new("GND", "top_copper", Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))))
            .unwrap();
        let original = board.plane(plane).unwrap().outline.clone();
        let mut ed = Editor::new(board);

        let at = Point::new(10.0, 5.0);
        ed.run(|t, c| t.right_released(c, at, at));
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::AddVertex)));
        assert_eq!(ed.tool.state(), SelectState::EditingPlaneVertex);
        assert!(ed.run(|t, c| t.abort(c)));
        assert_eq!(ed.board.plane(plane).unwrap().outline, original);
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_toggle_plane_visibility_is_not_undoable() {
        let mut board = Board::new("test");
        let plane = board
            .add_item(Plane::new("GND", "top_copper", Path::rect(Rect::new(0.0, 0.0, 10.0, 10.0))))
            .unwrap();
        let mut ed = Editor::new(board);
        ed.run(|t, c| t.right_released(c, Point::new(5.0, 5.0), Point::new(5.0, 5.0)));
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::TogglePlaneVisibility)));
        assert!(!ed.board.plane(plane).unwrap().visible);
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_select_whole_trace_extends_selection() {
        let mut f = TraceFixture::new();
        let hole = f.board.add_item(Hole::new(Point::new(40.0, 40.0), 1.0)).unwrap();
        f.select(&[hole, f.lines[2]]);
        let mut ed = Editor::new(f.board);
        let at = Point::new(15.0, 10.0);

        assert!(ed.run(|t, c| t.right_released(c, at, at)));
        assert_eq!(ed.tool.context_menu().unwrap().item, f.lines[2]);
        assert!(ed.run(|t, c| t.trigger(c, ContextAction::SelectWholeTrace)));
        assert!(ed.board.is_selected(hole));
        for id in f.lines.iter().chain(&f.points).chain([&f.via]) {
            assert!(ed.board.is_selected(*id));
        }
        assert!(!ed.board.is_selected(f.pad_a));
        assert!(!ed.undo.can_undo());
    }

    #[test]
    fn test_snap_to_grid_records_one_entry() {
        let mut board = Board::new("test");
        let hole = board.add_item(Hole::new(Point::new(2.8, -0.2), 1.0)).unwrap();
        board.set_selected(hole, true);
        let mut ed = Editor::new(board);

        assert!(ed.run(|t, c| t.snap_to_grid(c)));
        assert!(ed.position(hole).distance(Point::new(2.54, 0.0)) < 1e-9);
        assert_eq!(ed.undo.undo_text(), Some("Drag board elements"));
        // Already on the grid.
        assert!(!ed.run(|t, c| t.snap_to_grid(c)));
        assert_eq!(ed.undo.undo_count(), 1);
    }

    #[test]
    fn test_reset_all_texts_of_selected_device() {
        let mut board = Board::new("test");
        let device = Device::new("U1", Point::ZERO, Size::new(2.0, 2.0));
        let mut text = StrokeText::for_device("U1", &device, Vec2::new(0.0, 2.0));
        text.position = Point::new(40.0, 40.0);
        let device = board.add_item(device).unwrap();
        let text = board.add_item(text).unwrap();
        board.set_selected(device, true);
        let mut ed = Editor::new(board);

        assert!(ed.run(|t, c| t.reset_all_texts(c)));
        assert_eq!(ed.position(text), Point::new(0.0, 2.0));
        assert_eq!(ed.undo.undo_count(), 1);
        ed.undo.undo(&mut ed.board).unwrap();
        assert_eq!(ed.position(text), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_cut_removes_and_fills_clipboard() {
        let (mut ed, lower, _) = overlapping_holes();
        ed.board.set_selected(lower, true);
        assert!(ed.run(|t, c| t.cut(c)));
        assert!(!ed.board.contains(lower));
        assert!(ed.clipboard.payload().is_some());
        assert_eq!(ed.undo.undo_text(), Some("Remove board elements"));
    }

    #[test]
    fn test_pad_click_selects_device() {
        let f = TraceFixture::new();
        let mut ed = Editor::new(f.board);
        // Off the trace, inside the pad.
        ed.click(Point::new(-0.4, 0.4), Modifiers::NONE);
        assert_eq!(ed.board.selected_ids(), vec![f.device]);
        assert!(!ed.board.is_selected(f.pad_a));
    }

    #[test]
    fn test_handle_pointer_dispatch() {
        let (mut ed, _, upper) = overlapping_holes();
        let press = PointerEvent::Pressed {
            position: HIT,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        };
        assert!(ed.run(|t, c| t.handle_pointer(c, press)));
        assert!(ed.board.is_selected(upper));
        let release = PointerEvent::Released {
            position: HIT,
            button: MouseButton::Left,
        };
        assert!(ed.run(|t, c| t.handle_pointer(c, release)));
        assert!(ed.tool.is_idle());
    }
}
