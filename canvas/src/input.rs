//! Input model: modifier keys, mouse buttons, serialisable input events and
//! the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying what is needed to compute deltas and emit the final
//! mutation on release. `InputEvent` is the host-agnostic form of one raw
//! event, used to replay recorded sessions.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{ChecklistDraft, ChecklistId, NodeRef};
use crate::hit::HitPart;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, by the name the host reports (`"Escape"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape" || self.0 == "Esc"
    }
}

/// Wheel / trackpad scroll delta in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down.
    pub dy: f64,
}

/// One raw input event in screen coordinates, as recorded from a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Viewport {
        width: f64,
        height: f64,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
    },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The content editor was accepted.
    Submit {
        draft: ChecklistDraft,
    },
    /// The content editor was dismissed.
    CancelEditor,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging on empty background.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
        /// 1:1 view center before the pan, restored if the gesture is cancelled.
        start_center: Point,
        /// Zoomed-out view center before the pan.
        start_fit: Point,
    },
    /// Moving a checklist node.
    DraggingNode {
        id: ChecklistId,
        /// Top-left before the drag, restored if the gesture is cancelled.
        orig: Point,
    },
    /// Dragging out a child from a creator handle.
    Creating { owner: NodeRef },
    /// Pressed a node head button; it fires if released over the same button.
    PressingButton { id: ChecklistId, part: HitPart },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
