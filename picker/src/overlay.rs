//! Overlay entities: draggable, lockable images anchored in background space.
//!
//! An overlay's background-space top-left corner is its only stored position.
//! Its display rectangle is re-derived from the current [`Viewport`] every time
//! it is needed. Overlays hold no reference back to the scene; the viewport is
//! passed into each method and position changes are returned to the caller,
//! which is responsible for refreshing anything that displays them.
//!
//! Drag state machine:
//!
//! ```text
//!   Idle ──press (unlocked)──▶ Dragging{offset} ──release──▶ Idle
//!                               │  ▲
//!                               └──┘ drag_to (unlocked): position updated
//! ```

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use image::RgbaImage;
use uuid::Uuid;

use crate::background::resample;
use crate::viewport::{BgPoint, DisplayPoint, Viewport};

/// Unique identifier for an overlay. Never reused or renumbered.
pub type OverlayId = Uuid;

/// Drag state of a single overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is held on the overlay.
    Dragging {
        /// Pointer position minus the overlay's display origin at press time.
        offset: DisplayPoint,
    },
}

/// An axis-aligned rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub origin: DisplayPoint,
    pub width: u32,
    pub height: u32,
}

impl DisplayRect {
    /// Whether `p` lies inside the rectangle (right and bottom edges exclusive).
    #[must_use]
    pub fn contains(&self, p: DisplayPoint) -> bool {
        let dx = i64::from(p.x) - i64::from(self.origin.x);
        let dy = i64::from(p.y) - i64::from(self.origin.y);
        (0..i64::from(self.width)).contains(&dx) && (0..i64::from(self.height)).contains(&dy)
    }
}

/// A secondary image positioned relative to the background.
pub struct OverlayEntity {
    id: OverlayId,
    /// Display name; not required to be unique.
    pub name: String,
    source: RgbaImage,
    display: Option<RgbaImage>,
    position: BgPoint,
    locked: bool,
    selected: bool,
    drag: DragState,
}

impl std::fmt::Debug for OverlayEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEntity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.source.dimensions())
            .field("position", &self.position)
            .field("locked", &self.locked)
            .field("selected", &self.selected)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl OverlayEntity {
    /// Create an unlocked, unselected, idle overlay at `position`.
    #[must_use]
    pub fn new(name: impl Into<String>, source: RgbaImage, position: BgPoint) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source,
            display: None,
            position,
            locked: false,
            selected: false,
            drag: DragState::Idle,
        }
    }

    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Natural size of the source image.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Top-left corner in background space.
    #[must_use]
    pub fn position(&self) -> BgPoint {
        self.position
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    #[must_use]
    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// The resample produced by the last [`OverlayEntity::rescale`], if any.
    #[must_use]
    pub fn display_image(&self) -> Option<&RgbaImage> {
        self.display.as_ref()
    }

    /// Display rectangle under the given viewport.
    #[must_use]
    pub fn display_rect(&self, viewport: &Viewport) -> DisplayRect {
        let (w, h) = self.size();
        let (width, height) = viewport.scaled_extent(w, h);
        DisplayRect { origin: viewport.to_display(self.position), width, height }
    }

    /// Begin a drag. Returns `false` and changes nothing when locked.
    pub fn press(&mut self, pointer: DisplayPoint, viewport: &Viewport) -> bool {
        if self.locked {
            return false;
        }
        let origin = viewport.to_display(self.position);
        self.drag = DragState::Dragging { offset: pointer - origin };
        true
    }

    /// Follow the pointer while dragging.
    ///
    /// Returns the new background position, or `None` when idle or locked.
    /// The position is not clamped to the background.
    pub fn drag_to(&mut self, pointer: DisplayPoint, viewport: &Viewport) -> Option<BgPoint> {
        if self.locked {
            return None;
        }
        let DragState::Dragging { offset } = self.drag else {
            return None;
        };
        self.position = viewport.to_background(pointer - offset);
        tracing::trace!(id = %self.id, x = self.position.x, y = self.position.y, "overlay dragged");
        Some(self.position)
    }

    /// End a drag. The position is left where the last move put it.
    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Set the position directly, bypassing the drag state and the lock.
    pub fn set_position(&mut self, position: BgPoint) -> BgPoint {
        self.position = position;
        position
    }

    /// Lock or unlock. The drag state is left untouched.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Selection is owned by the scene, which keeps it exclusive.
    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Resample the source image for the viewport's scale.
    pub fn rescale(&mut self, viewport: &Viewport) {
        let (w, h) = self.size();
        let (dw, dh) = viewport.scaled_extent(w, h);
        self.display = Some(resample(&self.source, dw, dh));
    }
}
