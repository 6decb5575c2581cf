//! Pointer and keyboard modifier input.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// How a click with these modifiers changes the selection.
    pub fn selection_modifier(&self) -> SelectionModifier {
        if self.ctrl {
            SelectionModifier::Toggle
        } else if self.shift {
            SelectionModifier::Cycle
        } else {
            SelectionModifier::Replace
        }
    }
}

/// Selection behavior of a click, derived from the held modifier keys.
///
/// Control takes precedence over Shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionModifier {
    /// Select the topmost item unless one of the hit items is already selected.
    Replace,
    /// Toggle the selection of one hit item.
    Toggle,
    /// Step through overlapping items under the cursor.
    Cycle,
}

/// Pointer event in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Released {
        position: Point,
        button: MouseButton,
    },
    Moved {
        position: Point,
        left_button_down: bool,
    },
    DoubleClicked {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Pressed { position, .. }
            | PointerEvent::Released { position, .. }
            | PointerEvent::Moved { position, .. }
            | PointerEvent::DoubleClicked { position, .. } => *position,
        }
    }
}
