//! Raw input types forwarded by the rendering adapter.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Nudge distance in natural pixels with no modifier.
pub const NUDGE_STEP: f64 = 1.0;
/// Nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;
/// Nudge distance with Ctrl/Cmd held.
pub const NUDGE_STEP_FINE: f64 = 0.1;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Nudge step in natural pixels for these modifiers.
    ///
    /// Shift takes precedence over Ctrl/Cmd.
    pub fn nudge_step(&self) -> f64 {
        if self.shift {
            NUDGE_STEP_LARGE
        } else if self.command() {
            NUDGE_STEP_FINE
        } else {
            NUDGE_STEP
        }
    }
}

/// A pointer event as seen by the adapter, in screen pixels relative to the
/// displayed image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub position: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn new(position: Point, modifiers: Modifiers) -> Self {
        Self { position, modifiers }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), Modifiers::NONE)
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Delete,
    Backspace,
    Other(String),
}

impl Key {
    /// Parse a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            "Delete" | "Del" => Key::Delete,
            "Backspace" => Key::Backspace,
            other => Key::Other(other.to_string()),
        }
    }

    /// Unit direction for arrow keys, y pointing down.
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self {
            Key::ArrowUp => Some((0.0, -1.0)),
            Key::ArrowDown => Some((0.0, 1.0)),
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }
}
