#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::input::Mode;
use crate::overlay::OverlayId;
use crate::scene::Scene;
use crate::viewport::{BgPoint, DisplayPoint};

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Background,
    Overlay(OverlayId),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: HitTarget,
    /// Pointer position in background space, unclamped.
    pub at: BgPoint,
}

/// Find what is under `pointer`.
///
/// Only the background answers while picking coordinates. While editing
/// overlays only overlays answer, topmost first; a locked overlay still
/// absorbs the hit.
#[must_use]
pub fn hit_test(scene: &Scene, pointer: DisplayPoint) -> Option<Hit> {
    if !scene.has_background() {
        return None;
    }
    let viewport = scene.viewport();
    let at = viewport.to_background(pointer);
    let target = match scene.mode() {
        Mode::CoordinatePicking => viewport.contains_display(pointer).then_some(HitTarget::Background)?,
        Mode::OverlayEditing => scene
            .stacked_overlays()
            .rev()
            .find(|o| o.display_rect(viewport).contains(pointer))
            .map(|o| HitTarget::Overlay(o.id()))?,
    };
    Some(Hit { target, at })
}
