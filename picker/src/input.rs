//! Input model: interaction modes, mouse buttons, keys, and the gesture state.
//!
//! `Mode` decides which layer receives pointer input. `InputState` is the
//! gesture tracked between pointer-down and pointer-up; the per-entity drag
//! offset lives on the overlay itself, so the controller only needs to know
//! which overlay, if any, is being dragged.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::overlay::OverlayId;

/// Which entity type is interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Clicks on the background record points (default).
    #[default]
    CoordinatePicking,
    /// Overlays can be pressed and dragged; points are read-only.
    OverlayEditing,
}

impl Mode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::CoordinatePicking => Self::OverlayEditing,
            Self::OverlayEditing => Self::CoordinatePicking,
        }
    }

    /// Whether points may be added, edited or removed in this mode.
    #[must_use]
    pub fn allows_point_mutation(self) -> bool {
        self == Self::CoordinatePicking
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoordinatePicking => f.write_str("坐标获取"),
            Self::OverlayEditing => f.write_str("叠加图片"),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key, named as the host toolkit reports it (e.g. `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key deletes the current selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// Gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The primary button went down on an unlocked overlay and is still held.
    DraggingOverlay {
        /// Overlay receiving the drag.
        id: OverlayId,
    },
}
