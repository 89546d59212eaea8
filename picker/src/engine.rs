use crate::background::{Background, PixelColor};
use crate::hit::{HitTarget, hit_test};
use crate::input::{Button, InputState, Key, Mode};
use crate::overlay::OverlayId;
use crate::scene::Scene;
use crate::viewport::{BgPoint, DisplayPoint};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Coordinate and color under the pointer. Shown, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelReadout {
    pub point: BgPoint,
    pub color: Option<PixelColor>,
}

impl std::fmt::Display for PixelReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.color {
            Some(color) => write!(f, "坐标: {}, RGB: {color}", self.point),
            None => write!(f, "坐标: {}", self.point),
        }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RenderNeeded,
    Readout(PixelReadout),
    ReadoutCleared,
    ModeChanged(Mode),
    OverlaySelected { id: OverlayId },
    OverlayMoved { id: OverlayId, position: BgPoint },
    OverlayRemoved { id: OverlayId },
    PointAdded { index: usize, point: BgPoint },
}

/// Core engine state: the scene plus the gesture in progress.
///
/// Holds no reference to any display surface, so every handler can be driven
/// directly from tests or a script.
#[derive(Default)]
pub struct EngineCore {
    pub scene: Scene,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new(box_w: u32, box_h: u32) -> Self {
        Self { scene: Scene::new(box_w, box_h), input: InputState::Idle }
    }

    // --- Data inputs ---

    /// Replace the background and reset the session.
    pub fn load_background(&mut self, background: Background) -> Vec<Action> {
        self.input = InputState::Idle;
        self.scene.set_background(background);
        vec![Action::ModeChanged(self.scene.mode()), Action::ReadoutCleared, Action::RenderNeeded]
    }

    /// Switch modes, abandoning any gesture in progress.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        if mode == self.scene.mode() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        self.scene.set_mode(mode);
        vec![Action::ModeChanged(mode), Action::ReadoutCleared, Action::RenderNeeded]
    }

    // --- Viewport ---

    /// The display box was resized by the host. A drag in progress ends,
    /// since its grab offset was measured at the old scale.
    pub fn set_viewport(&mut self, box_w: u32, box_h: u32) -> Vec<Action> {
        if let InputState::DraggingOverlay { id } = self.input {
            self.scene.release_overlay(id);
            self.input = InputState::Idle;
        }
        self.scene.resize(box_w, box_h);
        tracing::debug!(box_w, box_h, "viewport resized");
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pointer: DisplayPoint, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input != InputState::Idle {
            return Vec::new();
        }
        let Some(hit) = hit_test(&self.scene, pointer) else {
            return Vec::new();
        };
        match hit.target {
            HitTarget::Background => self.record_click(pointer),
            HitTarget::Overlay(id) => self.press_overlay(id, pointer),
        }
    }

    pub fn on_pointer_move(&mut self, pointer: DisplayPoint) -> Vec<Action> {
        match self.input {
            InputState::DraggingOverlay { id } => match self.scene.drag_overlay(id, pointer) {
                Some(position) => vec![Action::OverlayMoved { id, position }, Action::RenderNeeded],
                None => Vec::new(),
            },
            InputState::Idle => self.hover(pointer),
        }
    }

    pub fn on_pointer_up(&mut self, _pointer: DisplayPoint, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if let InputState::DraggingOverlay { id } = self.input {
            self.scene.release_overlay(id);
        }
        self.input = InputState::Idle;
        Vec::new()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !key.is_delete() || self.scene.mode() != Mode::OverlayEditing {
            return Vec::new();
        }
        let Some(id) = self.scene.selected_id() else {
            return Vec::new();
        };
        if self.scene.remove_overlay(id).is_err() {
            return Vec::new();
        }
        if self.input == (InputState::DraggingOverlay { id }) {
            self.input = InputState::Idle;
        }
        vec![Action::OverlayRemoved { id }, Action::RenderNeeded]
    }

    // --- Queries ---

    /// The currently selected overlay, if any.
    #[must_use]
    pub fn selection(&self) -> Option<OverlayId> {
        self.scene.selected_id()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.scene.mode()
    }

    /// Readout for a background point, clamped to the image.
    #[must_use]
    pub fn readout(&self, at: BgPoint) -> Option<PixelReadout> {
        let background = self.scene.background()?;
        let point = self.scene.viewport().clamp_to_image(at);
        Some(PixelReadout { point, color: background.pixel(point) })
    }

    // --- Internal ---

    fn record_click(&mut self, pointer: DisplayPoint) -> Vec<Action> {
        let Ok(point) = self.scene.add_point_from_click(pointer) else {
            return Vec::new();
        };
        let index = self.scene.points().len() - 1;
        let mut actions = vec![Action::PointAdded { index, point }];
        actions.extend(self.readout(point).map(Action::Readout));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn press_overlay(&mut self, id: OverlayId, pointer: DisplayPoint) -> Vec<Action> {
        match self.scene.press_overlay(id, pointer) {
            Ok(true) => {
                self.input = InputState::DraggingOverlay { id };
                vec![Action::OverlaySelected { id }, Action::RenderNeeded]
            }
            Ok(false) => Vec::new(),
            Err(err) => {
                tracing::warn!(%id, error = %err, "press on missing overlay");
                Vec::new()
            }
        }
    }

    fn hover(&self, pointer: DisplayPoint) -> Vec<Action> {
        if self.scene.mode() != Mode::CoordinatePicking || !self.scene.has_background() {
            return Vec::new();
        }
        match hit_test(&self.scene, pointer).and_then(|hit| self.readout(hit.at)) {
            Some(readout) => vec![Action::Readout(readout)],
            None => vec![Action::ReadoutCleared],
        }
    }
}
