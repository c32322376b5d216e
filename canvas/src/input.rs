//! Input model: modifier keys, mouse buttons, UI state, and the gesture state machine.
//!
//! `Modifiers`, `Button` and `Key` describe a host event. `UiState` is the
//! selection, inline-edit and guide state visible to the renderer.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying everything needed to compute the next frame from the
//! pointer delta and to decide on release whether a commit is due.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::DRAG_DEAD_ZONE_PX;
use crate::doc::ElementId;
use crate::geom::{Point, Rect};
use crate::hit::ResizeAnchor;
use crate::snap::AlignmentGuide;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as named by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// An open inline text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub id: ElementId,
    /// Text as currently typed; applied on commit.
    pub draft: String,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub selected_id: Option<ElementId>,
    pub editing: Option<TextEdit>,
    /// Guides for the current move frame; empty outside a move.
    pub guides: Vec<AlignmentGuide>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an element.
    MovingElement {
        id: ElementId,
        /// Pointer position at pointer-down.
        start: Point,
        /// Element box at pointer-down.
        orig: Rect,
        /// Set once the pointer leaves the dead zone; never cleared.
        moved: bool,
    },
    /// The user is resizing an element by one of its eight handles.
    ResizingElement {
        id: ElementId,
        anchor: ResizeAnchor,
        start: Point,
        orig: Rect,
        moved: bool,
    },
}

impl InputState {
    /// Whether a move or resize is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Element targeted by the current gesture.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Idle => None,
            Self::MovingElement { id, .. } | Self::ResizingElement { id, .. } => Some(*id),
        }
    }
}

/// Whether a pointer delta is still inside the drag dead zone.
#[must_use]
pub fn within_dead_zone(dx: f64, dy: f64) -> bool {
    dx.abs() <= DRAG_DEAD_ZONE_PX && dy.abs() <= DRAG_DEAD_ZONE_PX
}
