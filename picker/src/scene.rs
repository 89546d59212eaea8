//! The scene: background, overlays, points, mode and stacking order.
//!
//! `Scene` is the single owned aggregate behind the picker. It keeps two
//! orders for overlays: the list order (creation order, used by the overlay
//! list widget and the export report) and the render stack (bottom to top,
//! changed by selection and re-stacking). The background is always the bottom
//! render layer and point markers are always drawn above every overlay.
//!
//! The point list shown to the user depends on the mode. In
//! [`Mode::CoordinatePicking`] it is the independently recorded
//! [`PointList`]; in [`Mode::OverlayEditing`] it is a read-only projection of
//! overlay positions. Switching modes never touches either source.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use image::RgbaImage;

use crate::background::Background;
use crate::consts::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH};
use crate::error::PickerError;
use crate::input::Mode;
use crate::overlay::{OverlayEntity, OverlayId};
use crate::points::PointList;
use crate::viewport::{BgPoint, DisplayPoint, Viewport};

/// One row of the overlay list widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub id: OverlayId,
    pub name: String,
    pub position: BgPoint,
    pub locked: bool,
    pub selected: bool,
}

impl std::fmt::Display for OverlayEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.position)
    }
}

/// Default top-left corner that centers a `size` footprint on a `natural` background.
#[must_use]
pub fn centered_position(natural: (u32, u32), size: (u32, u32)) -> BgPoint {
    let half = |v: u32| (v / 2) as i32;
    BgPoint::new(half(natural.0) - half(size.0), half(natural.1) - half(size.1))
}

/// Owned state of one picking session.
pub struct Scene {
    background: Option<Background>,
    box_size: (u32, u32),
    viewport: Viewport,
    overlays: Vec<OverlayEntity>,
    stack: Vec<OverlayId>,
    points: PointList,
    mode: Mode,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_WIDTH, DEFAULT_BOX_HEIGHT)
    }
}

impl Scene {
    /// An empty scene for a display box of `box_w` × `box_h`.
    #[must_use]
    pub fn new(box_w: u32, box_h: u32) -> Self {
        Self {
            background: None,
            box_size: (box_w, box_h),
            viewport: Viewport::default(),
            overlays: Vec::new(),
            stack: Vec::new(),
            points: PointList::new(),
            mode: Mode::default(),
        }
    }

    // --- Background and viewport ---

    /// Replace the background, discarding every overlay and point.
    ///
    /// The new scene is built completely before it replaces the old one.
    pub fn set_background(&mut self, background: Background) {
        let (w, h) = background.size();
        let mut fresh = Self::new(self.box_size.0, self.box_size.1);
        fresh.background = Some(background);
        fresh.recompute();
        *self = fresh;
        tracing::info!(width = w, height = h, "background loaded; scene reset");
    }

    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Natural size of the background, if one is loaded.
    #[must_use]
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.background.as_ref().map(Background::size)
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn box_size(&self) -> (u32, u32) {
        self.box_size
    }

    /// Change the display box and re-derive everything shown in it.
    ///
    /// Stored background positions are untouched. In overlay editing mode the
    /// overlays are re-stacked above the background afterwards.
    pub fn resize(&mut self, box_w: u32, box_h: u32) {
        self.box_size = (box_w, box_h);
        self.recompute();
        if self.mode == Mode::OverlayEditing {
            self.reorder_all_overlays_above_background();
        }
    }

    /// Refit the viewport and resample the background and every overlay.
    fn recompute(&mut self) {
        let Some(background) = self.background.as_mut() else {
            return;
        };
        let (w, h) = background.size();
        self.viewport = Viewport::fit(w, h, self.box_size.0, self.box_size.1);
        background.rescale(&self.viewport);
        for overlay in &mut self.overlays {
            overlay.rescale(&self.viewport);
        }
        tracing::debug!(overlays = self.overlays.len(), "scene rescaled");
    }

    // --- Overlays ---

    /// Add an overlay, centered on the background unless `position` is given.
    ///
    /// The overlay goes to the end of the list and the top of the render stack.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::NoBackground`] if no background is loaded.
    pub fn add_overlay(
        &mut self,
        image: RgbaImage,
        name: impl Into<String>,
        position: Option<BgPoint>,
    ) -> Result<OverlayId, PickerError> {
        let natural = self.natural_size().ok_or(PickerError::NoBackground)?;
        let position = position.unwrap_or_else(|| centered_position(natural, image.dimensions()));
        let mut overlay = OverlayEntity::new(name, image, position);
        overlay.rescale(&self.viewport);
        let id = overlay.id();
        tracing::info!(%id, name = %overlay.name, x = position.x, y = position.y, "overlay added");
        self.overlays.push(overlay);
        self.stack.push(id);
        Ok(id)
    }

    /// Remove an overlay. Other overlays keep their ids and state.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn remove_overlay(&mut self, id: OverlayId) -> Result<OverlayEntity, PickerError> {
        let index = self.index_of(id).ok_or(PickerError::UnknownOverlay(id))?;
        self.stack.retain(|s| *s != id);
        let removed = self.overlays.remove(index);
        tracing::info!(%id, name = %removed.name, "overlay removed");
        Ok(removed)
    }

    /// Overlays in list order.
    #[must_use]
    pub fn overlays(&self) -> &[OverlayEntity] {
        &self.overlays
    }

    #[must_use]
    pub fn overlay(&self, id: OverlayId) -> Option<&OverlayEntity> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut OverlayEntity> {
        self.overlays.iter_mut().find(|o| o.id() == id)
    }

    /// List index of an overlay.
    #[must_use]
    pub fn index_of(&self, id: OverlayId) -> Option<usize> {
        self.overlays.iter().position(|o| o.id() == id)
    }

    /// Render stack, bottom first.
    #[must_use]
    pub fn stack(&self) -> &[OverlayId] {
        &self.stack
    }

    /// Overlays in render order, bottom first.
    pub fn stacked_overlays(&self) -> impl DoubleEndedIterator<Item = &OverlayEntity> + '_ {
        self.stack.iter().filter_map(|id| self.overlay(*id))
    }

    /// Rows for the overlay list widget, in list order.
    #[must_use]
    pub fn overlay_entries(&self) -> Vec<OverlayEntry> {
        self.overlays
            .iter()
            .map(|o| OverlayEntry {
                id: o.id(),
                name: o.name.clone(),
                position: o.position(),
                locked: o.is_locked(),
                selected: o.is_selected(),
            })
            .collect()
    }

    // --- Selection and stacking ---

    #[must_use]
    pub fn selected_id(&self) -> Option<OverlayId> {
        self.overlays.iter().find(|o| o.is_selected()).map(OverlayEntity::id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&OverlayEntity> {
        self.overlays.iter().find(|o| o.is_selected())
    }

    /// Select `id` and deselect every other overlay, then raise `id` to the top.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn select_exclusive(&mut self, id: OverlayId) -> Result<(), PickerError> {
        if self.index_of(id).is_none() {
            return Err(PickerError::UnknownOverlay(id));
        }
        for overlay in &mut self.overlays {
            overlay.set_selected(overlay.id() == id);
        }
        self.raise(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for overlay in &mut self.overlays {
            overlay.set_selected(false);
        }
    }

    /// Move `id` to the top of the render stack.
    fn raise(&mut self, id: OverlayId) {
        if let Some(pos) = self.stack.iter().position(|s| *s == id) {
            let top = self.stack.remove(pos);
            self.stack.push(top);
        }
    }

    /// Re-stack every overlay above the background in list order.
    pub fn reorder_all_overlays_above_background(&mut self) {
        self.stack = self.overlays.iter().map(OverlayEntity::id).collect();
    }

    // --- Overlay edits ---

    /// Begin dragging `id` at `pointer`. A locked overlay is left alone.
    ///
    /// Returns whether the drag started. A started drag selects the overlay
    /// exclusively and raises it.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn press_overlay(&mut self, id: OverlayId, pointer: DisplayPoint) -> Result<bool, PickerError> {
        let viewport = self.viewport;
        let overlay = self.overlay_mut(id).ok_or(PickerError::UnknownOverlay(id))?;
        if !overlay.press(pointer, &viewport) {
            return Ok(false);
        }
        self.select_exclusive(id)?;
        Ok(true)
    }

    /// Continue dragging `id`; returns the new position if it moved.
    pub fn drag_overlay(&mut self, id: OverlayId, pointer: DisplayPoint) -> Option<BgPoint> {
        let viewport = self.viewport;
        self.overlay_mut(id)?.drag_to(pointer, &viewport)
    }

    /// End any drag on `id`.
    pub fn release_overlay(&mut self, id: OverlayId) {
        if let Some(overlay) = self.overlay_mut(id) {
            overlay.release();
        }
    }

    /// Release every overlay that is mid-drag.
    pub fn release_all(&mut self) {
        for overlay in &mut self.overlays {
            overlay.release();
        }
    }

    /// Set an overlay's position directly.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn set_overlay_position(&mut self, id: OverlayId, position: BgPoint) -> Result<BgPoint, PickerError> {
        let overlay = self.overlay_mut(id).ok_or(PickerError::UnknownOverlay(id))?;
        Ok(overlay.set_position(position))
    }

    /// Lock or unlock an overlay.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn set_overlay_locked(&mut self, id: OverlayId, locked: bool) -> Result<(), PickerError> {
        let overlay = self.overlay_mut(id).ok_or(PickerError::UnknownOverlay(id))?;
        overlay.set_locked(locked);
        tracing::debug!(%id, locked, "overlay lock changed");
        Ok(())
    }

    /// Rename an overlay.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::UnknownOverlay`] if `id` is not in the scene.
    pub fn rename_overlay(&mut self, id: OverlayId, name: impl Into<String>) -> Result<(), PickerError> {
        let overlay = self.overlay_mut(id).ok_or(PickerError::UnknownOverlay(id))?;
        overlay.name = name.into();
        Ok(())
    }

    // --- Mode ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes. Positions and recorded points are never changed.
    pub fn set_mode(&mut self, mode: Mode) {
        self.release_all();
        self.mode = mode;
        if mode == Mode::OverlayEditing {
            self.reorder_all_overlays_above_background();
        }
        tracing::info!(%mode, "mode switched");
    }

    // --- Points ---

    /// The independently recorded points, regardless of mode.
    #[must_use]
    pub fn points(&self) -> &PointList {
        &self.points
    }

    /// Mutable access to the recorded points.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::PointsReadOnly`] outside coordinate picking mode.
    pub fn points_mut(&mut self) -> Result<&mut PointList, PickerError> {
        if !self.mode.allows_point_mutation() {
            return Err(PickerError::PointsReadOnly(self.mode));
        }
        Ok(&mut self.points)
    }

    /// Record a click at `pointer`, clamped to the image.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::NoBackground`] without a background and
    /// [`PickerError::PointsReadOnly`] outside coordinate picking mode.
    pub fn add_point_from_click(&mut self, pointer: DisplayPoint) -> Result<BgPoint, PickerError> {
        if !self.has_background() {
            return Err(PickerError::NoBackground);
        }
        let viewport = self.viewport;
        Ok(self.points_mut()?.add_from_click(pointer, &viewport))
    }

    /// The point list as currently shown: recorded points while picking,
    /// overlay positions (in list order) while editing overlays.
    #[must_use]
    pub fn point_entries(&self) -> Vec<BgPoint> {
        match self.mode {
            Mode::CoordinatePicking => self.points.as_slice().to_vec(),
            Mode::OverlayEditing => self.overlays.iter().map(OverlayEntity::position).collect(),
        }
    }
}
