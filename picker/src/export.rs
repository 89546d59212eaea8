//! Session export: the plain-text report and its JSON twin.
//!
//! The text report is the file written by "save". Its point block lists the
//! point projection for the current mode, so while editing overlays it repeats
//! the overlay positions.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{REPORT_OVERLAYS_HEADING, REPORT_POINTS_HEADING, REPORT_SIZE_HEADING};
use crate::error::PickerError;
use crate::input::Mode;
use crate::scene::Scene;
use crate::viewport::BgPoint;

/// Render the text report, or `None` without a background.
#[must_use]
pub fn report(scene: &Scene) -> Option<String> {
    let (w, h) = scene.natural_size()?;
    let mut lines = vec![format!("{REPORT_SIZE_HEADING}: {w} x {h}"), String::new(), REPORT_POINTS_HEADING.to_owned()];
    lines.extend(scene.point_entries().iter().map(ToString::to_string));
    lines.push(String::new());
    lines.push(REPORT_OVERLAYS_HEADING.to_owned());
    lines.extend(scene.overlays().iter().map(|o| format!("{}: {}", o.name, o.position())));

    let mut text = lines.join("\n");
    text.push('\n');
    Some(text)
}

/// Write the text report to `path` as UTF-8.
///
/// # Errors
///
/// Returns [`PickerError::NoBackground`] without a background and
/// [`PickerError::Io`] if the file cannot be written.
pub fn save(path: &Path, scene: &Scene) -> Result<(), PickerError> {
    let text = report(scene).ok_or(PickerError::NoBackground)?;
    std::fs::write(path, text).map_err(|source| PickerError::Io { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), overlays = scene.overlays().len(), "report saved");
    Ok(())
}

/// Background dimensions in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub width: u32,
    pub height: u32,
}

/// One overlay in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub name: String,
    pub position: BgPoint,
    pub locked: bool,
}

/// Machine-readable form of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub background: SizeEntry,
    pub mode: Mode,
    pub points: Vec<BgPoint>,
    pub overlays: Vec<OverlaySnapshot>,
}

impl Snapshot {
    /// Capture the scene, or `None` without a background.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Option<Self> {
        let (width, height) = scene.natural_size()?;
        Some(Self {
            background: SizeEntry { width, height },
            mode: scene.mode(),
            points: scene.point_entries(),
            overlays: scene
                .overlays()
                .iter()
                .map(|o| OverlaySnapshot { name: o.name.clone(), position: o.position(), locked: o.is_locked() })
                .collect(),
        })
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PickerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
