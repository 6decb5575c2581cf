//! Table of editor commands with their labels and keyboard shortcuts.

use std::collections::HashMap;

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool) -> Self {
        Self { key, ctrl, shift }
    }

    /// Format the shortcut for display (e.g., "Ctrl+X").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Identifies an editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Properties,
    SelectAll,
    Cut,
    Copy,
    Paste,
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
    AddVertex,
    RemoveVertex,
    TogglePlaneVisibility,
    Abort,
    Undo,
    Redo,
}

/// A command as shown in menus.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorCommand {
    pub id: CommandId,
    pub text: &'static str,
    pub shortcut: Option<Shortcut>,
}

impl EditorCommand {
    const fn new(id: CommandId, text: &'static str, shortcut: Option<Shortcut>) -> Self {
        Self { id, text, shortcut }
    }

    /// Menu label with the shortcut appended, e.g. "Cut\tCtrl+X".
    pub fn label(&self) -> String {
        match &self.shortcut {
            Some(shortcut) => format!("{}\t{}", self.text, shortcut.format()),
            None => self.text.to_string(),
        }
    }
}

/// All editor commands, built once and passed to the tool by reference.
#[derive(Debug, Clone)]
pub struct CommandSet {
    commands: Vec<EditorCommand>,
    index: HashMap<CommandId, usize>,
}

impl CommandSet {
    pub fn new() -> Self {
        use CommandId::*;
        let key = |k, ctrl, shift| Some(Shortcut::new(k, ctrl, shift));
        let commands = vec![
            EditorCommand::new(Properties, "Properties", key("E", false, false)),
            EditorCommand::new(SelectAll, "Select All", key("A", true, false)),
            EditorCommand::new(Cut, "Cut", key("X", true, false)),
            EditorCommand::new(Copy, "Copy", key("C", true, false)),
            EditorCommand::new(Paste, "Paste", key("V", true, false)),
            EditorCommand::new(Remove, "Remove", key("Delete", false, false)),
            EditorCommand::new(RotateCcw, "Rotate Counterclockwise", key("R", false, false)),
            EditorCommand::new(RotateCw, "Rotate Clockwise", key("R", false, true)),
            EditorCommand::new(FlipHorizontal, "Flip Horizontal", key("F", false, false)),
            EditorCommand::new(FlipVertical, "Flip Vertical", key("F", false, true)),
            EditorCommand::new(SnapToGrid, "Snap To Grid", key("S", false, false)),
            EditorCommand::new(ResetAllTexts, "Reset All Texts", None),
            EditorCommand::new(RemoveWholeTrace, "Remove Whole Trace", None),
            EditorCommand::new(SelectWholeTrace, "Select Whole Trace", None),
            EditorCommand::new(MeasureLength, "Measure Selected Segments Length", None),
            EditorCommand::new(AddVertex, "Add Vertex", None),
            EditorCommand::new(RemoveVertex, "Remove Vertex", None),
            EditorCommand::new(TogglePlaneVisibility, "Visible", None),
            EditorCommand::new(Abort, "Abort Command", key("Escape", false, false)),
            EditorCommand::new(Undo, "Undo", key("Z", true, false)),
            EditorCommand::new(Redo, "Redo", key("Z", true, true)),
        ];
        let index = commands.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        Self { commands, index }
    }

    pub fn get(&self, id: CommandId) -> Option<&EditorCommand> {
        self.index.get(&id).map(|&i| &self.commands[i])
    }

    pub fn all(&self) -> &[EditorCommand] {
        &self.commands
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new()
    }
}
