//! Right-click menus of board items.

use crate::board::Board;
use crate::command_set::{CommandId, CommandSet};
use crate::config::EditorConfig;
use crate::items::{BoardItem, ItemId};
use crate::outline::{
    OutlineTarget, line_index_at, remove_vertices, vertex_indices_at,
};
use kurbo::Point;

/// Action behind a context menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextAction {
    Properties,
    Cut,
    Copy,
    Remove,
    RotateCcw,
    RotateCw,
    FlipHorizontal,
    FlipVertical,
    SnapToGrid,
    ResetAllTexts,
    RemoveWholeTrace,
    SelectWholeTrace,
    MeasureLength,
    RemoveVertices,
    AddVertex,
    TogglePlaneVisibility,
}

impl ContextAction {
    pub fn command(self) -> CommandId {
        match self {
            ContextAction::Properties => CommandId::Properties,
            ContextAction::Cut => CommandId::Cut,
            ContextAction::Copy => CommandId::Copy,
            ContextAction::Remove => CommandId::Remove,
            ContextAction::RotateCcw => CommandId::RotateCcw,
            ContextAction::RotateCw => CommandId::RotateCw,
            ContextAction::FlipHorizontal => CommandId::FlipHorizontal,
            ContextAction::FlipVertical => CommandId::FlipVertical,
            ContextAction::SnapToGrid => CommandId::SnapToGrid,
            ContextAction::ResetAllTexts => CommandId::ResetAllTexts,
            ContextAction::RemoveWholeTrace => CommandId::RemoveWholeTrace,
            ContextAction::SelectWholeTrace => CommandId::SelectWholeTrace,
            ContextAction::MeasureLength => CommandId::MeasureLength,
            ContextAction::RemoveVertices => CommandId::RemoveVertex,
            ContextAction::AddVertex => CommandId::AddVertex,
            ContextAction::TogglePlaneVisibility => CommandId::TogglePlaneVisibility,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuEntry {
    pub action: ContextAction,
    pub text: String,
    pub enabled: bool,
    /// Check state of toggle entries.
    pub checked: Option<bool>,
}

/// Menu for the item under the cursor, with the hit details its actions need.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub item: ItemId,
    pub position: Point,
    pub entries: Vec<ContextMenuEntry>,
    /// Outline vertices under the cursor.
    pub(crate) vertex_indices: Vec<usize>,
    /// Outline segment under the cursor, as index of its end vertex.
    pub(crate) line_index: Option<usize>,
}

impl ContextMenu {
    /// Build the menu of `item`, right-clicked at `position`.
    pub fn for_item(
        board: &Board,
        item: &BoardItem,
        position: Point,
        commands: &CommandSet,
        config: &EditorConfig,
    ) -> Self {
        use ContextAction::*;

        let mut menu = Self {
            item: item.id(),
            position,
            entries: Vec::new(),
            vertex_indices: Vec::new(),
            line_index: None,
        };
        let off_grid = !item.is_on_grid(config.grid_interval);

        match item {
            BoardItem::Device(_) => {
                menu.add_all(
                    commands,
                    &[
                        Properties,
                        RotateCcw,
                        RotateCw,
                        FlipHorizontal,
                        FlipVertical,
                        Remove,
                    ],
                );
                menu.add(commands, SnapToGrid, off_grid);
                menu.add(commands, ResetAllTexts, true);
            }
            BoardItem::NetLine(_) => {
                menu.add_all(
                    commands,
                    &[
                        Remove,
                        RemoveWholeTrace,
                        SelectWholeTrace,
                        MeasureLength,
                    ],
                );
            }
            BoardItem::NetPoint(point) => {
                menu.add_all(commands, &[RemoveWholeTrace, SelectWholeTrace]);
                menu.add(commands, SnapToGrid, off_grid);
                menu.add(commands, MeasureLength, point.anchor().is_used());
            }
            BoardItem::Via(_) => {
                menu.add_all(
                    commands,
                    &[
                        Properties,
                        Cut,
                        Copy,
                        Remove,
                        RemoveWholeTrace,
                        SelectWholeTrace,
                    ],
                );
                menu.add(commands, SnapToGrid, off_grid);
            }
            BoardItem::Plane(_) | BoardItem::Polygon(_) => {
                if let Some(path) = OutlineTarget::for_item(item).and_then(|t| board.outline(t)) {
                    menu.vertex_indices =
                        vertex_indices_at(path, position, config.vertex_handle_radius);
                    menu.line_index = line_index_at(path, position, config.hit_tolerance);
                    menu.add(commands, Properties, true);
                    if !menu.vertex_indices.is_empty() {
                        let removable = remove_vertices(path, &menu.vertex_indices).is_some();
                        menu.add(commands, RemoveVertices, removable);
                    }
                    if menu.line_index.is_some() {
                        menu.add(commands, AddVertex, true);
                    }
                }
                menu.add_all(
                    commands,
                    &[
                        Cut,
                        Copy,
                        Remove,
                        RotateCcw,
                        RotateCw,
                        FlipHorizontal,
                        FlipVertical,
                    ],
                );
                if let BoardItem::Plane(plane) = item {
                    menu.add(commands, TogglePlaneVisibility, true);
                    if let Some(entry) = menu.entries.last_mut() {
                        entry.checked = Some(plane.visible);
                    }
                }
            }
            BoardItem::StrokeText(_) => {
                menu.add_all(
                    commands,
                    &[
                        Properties,
                        Cut,
                        Copy,
                        Remove,
                        RotateCcw,
                        RotateCw,
                        FlipHorizontal,
                        FlipVertical,
                    ],
                );
                menu.add(commands, SnapToGrid, off_grid);
            }
            BoardItem::Hole(_) => {
                menu.add_all(commands, &[Properties, Cut, Copy, Remove]);
                menu.add(commands, SnapToGrid, off_grid);
            }
            BoardItem::FootprintPad(_) => {}
        }
        menu
    }

    fn add(&mut self, commands: &CommandSet, action: ContextAction, enabled: bool) {
        let text = commands
            .get(action.command())
            .map(|c| c.label())
            .unwrap_or_default();
        self.entries.push(ContextMenuEntry {
            action,
            text,
            enabled,
            checked: None,
        });
    }

    fn add_all(&mut self, commands: &CommandSet, actions: &[ContextAction]) {
        for &action in actions {
            self.add(commands, action, true);
        }
    }

    pub fn entry(&self, action: ContextAction) -> Option<&ContextMenuEntry> {
        self.entries.iter().find(|e| e.action == action)
    }

    pub fn is_enabled(&self, action: ContextAction) -> bool {
        self.entry(action).is_some_and(|e| e.enabled)
    }

    pub fn actions(&self) -> Vec<ContextAction> {
        self.entries.iter().map(|e| e.action).collect()
    }
}
