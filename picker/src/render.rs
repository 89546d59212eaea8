//! Rendering: projects the scene into display space and composites previews.
//!
//! [`plan`] is what a UI shell draws from: the background rectangle, every
//! overlay rectangle in render-stack order and the point marker glyphs, all in
//! display pixels. [`compose`] flattens the same layers into one RGBA image.
//! Neither mutates the scene.
//!
//! Layering is fixed: background at the bottom, overlays in stack order above
//! it, markers on top of everything.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::consts::{CANVAS_COLOR, MARKER_COLOR, MARKER_LABEL_OFFSET_PX};
use crate::error::PickerError;
use crate::overlay::{DisplayRect, OverlayId};
use crate::scene::Scene;
use crate::viewport::DisplayPoint;

/// One overlay as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayer {
    pub id: OverlayId,
    pub rect: DisplayRect,
    pub selected: bool,
    pub locked: bool,
}

/// A point marker: a filled dot and its coordinate label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGlyph {
    pub center: DisplayPoint,
    pub radius: u32,
    pub label: String,
    /// Top-left anchor of the label text.
    pub label_at: DisplayPoint,
}

/// Everything visible in the display box, bottom layer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub box_size: (u32, u32),
    pub background: Option<DisplayRect>,
    pub overlays: Vec<OverlayLayer>,
    pub markers: Vec<MarkerGlyph>,
}

/// Project the scene into display space.
///
/// Markers are the recorded points and stay visible in both modes.
#[must_use]
pub fn plan(scene: &Scene, marker_radius: u32) -> Frame {
    let viewport = scene.viewport();
    let background = scene.has_background().then(|| DisplayRect {
        origin: viewport.offset,
        width: viewport.display.0,
        height: viewport.display.1,
    });
    let overlays = scene
        .stacked_overlays()
        .map(|o| OverlayLayer {
            id: o.id(),
            rect: o.display_rect(viewport),
            selected: o.is_selected(),
            locked: o.is_locked(),
        })
        .collect();
    let (lx, ly) = MARKER_LABEL_OFFSET_PX;
    let markers = scene
        .points()
        .as_slice()
        .iter()
        .map(|p| {
            let center = viewport.to_display(*p);
            MarkerGlyph {
                center,
                radius: marker_radius,
                label: p.to_string(),
                label_at: DisplayPoint::new(center.x.saturating_add(lx), center.y.saturating_add(ly)),
            }
        })
        .collect();
    Frame { box_size: scene.box_size(), background, overlays, markers }
}

/// Composite the scene into a box-sized image on a white canvas.
///
/// Labels are not rasterized; only marker dots are drawn.
#[must_use]
pub fn compose(scene: &Scene, marker_radius: u32) -> RgbaImage {
    let (w, h) = scene.box_size();
    let mut canvas = RgbaImage::from_pixel(w.max(1), h.max(1), Rgba(CANVAS_COLOR));

    // Layer 1: background.
    if let Some(image) = scene.background().and_then(|b| b.display_image()) {
        let offset = scene.viewport().offset;
        image::imageops::overlay(&mut canvas, image, i64::from(offset.x), i64::from(offset.y));
    }

    // Layer 2: overlays, bottom of the stack first.
    for overlay in scene.stacked_overlays() {
        if let Some(image) = overlay.display_image() {
            let origin = overlay.display_rect(scene.viewport()).origin;
            image::imageops::overlay(&mut canvas, image, i64::from(origin.x), i64::from(origin.y));
        }
    }

    // Layer 3: markers.
    for marker in plan(scene, marker_radius).markers {
        fill_disc(&mut canvas, marker.center, marker.radius, Rgba(MARKER_COLOR));
    }
    canvas
}

/// Composite the scene and write it as an image file.
///
/// # Errors
///
/// Returns [`PickerError::NoBackground`] without a background and
/// [`PickerError::Encode`] if the image cannot be written.
pub fn write_preview(scene: &Scene, marker_radius: u32, path: &Path) -> Result<(), PickerError> {
    if !scene.has_background() {
        return Err(PickerError::NoBackground);
    }
    compose(scene, marker_radius).save(path)?;
    tracing::info!(path = %path.display(), "preview written");
    Ok(())
}

/// Fill the disc of `radius` around `center`, clipped to the canvas.
fn fill_disc(canvas: &mut RgbaImage, center: DisplayPoint, radius: u32, color: Rgba<u8>) {
    let r = i64::from(radius);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (Ok(x), Ok(y)) = (u32::try_from(i64::from(center.x) + dx), u32::try_from(i64::from(center.y) + dy)) else {
                continue;
            };
            if x < canvas.width() && y < canvas.height() {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}
