//! Dialog-driven user commands.
//!
//! Each command is what a toolbar button does: it asks the [`Host`] for
//! whatever input it needs, applies the change to the engine, refreshes the
//! list widgets and returns the [`Action`]s the host should process. Failures
//! become host notices; nothing here returns an error to the caller. A command
//! that fails leaves the scene untouched.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::path::Path;

use crate::background::{Background, open_image};
use crate::consts::DEFAULT_OVERLAY_NAME;
use crate::engine::{Action, EngineCore};
use crate::error::PickerError;
use crate::export;
use crate::host::{FileFilter, Host, NoticeKind};
use crate::input::Mode;
use crate::overlay::{OverlayEntity, OverlayId};
use crate::points::{PointList, parse_import};
use crate::viewport::BgPoint;

pub const INVALID_INTEGER_MESSAGE: &str = "请输入有效的整数坐标";
pub const NOTHING_TO_SAVE_MESSAGE: &str = "没有数据可保存";

// =============================================================================
// HELPERS
// =============================================================================

/// Turn a command result into actions, reporting a failure to the host.
fn finish(host: &mut dyn Host, result: Result<Vec<Action>, PickerError>) -> Vec<Action> {
    result.unwrap_or_else(|err| {
        let kind = match err {
            PickerError::NoBackground
            | PickerError::NoOverlaySelected
            | PickerError::NoPointSelected
            | PickerError::PointsReadOnly(_)
            | PickerError::WrongMode(_) => NoticeKind::Warning,
            _ => NoticeKind::Error,
        };
        tracing::debug!(error = %err, ?kind, "command failed");
        host.notify(kind, &err.to_string());
        Vec::new()
    })
}

/// Push fresh rows to both list widgets.
fn refresh_lists(core: &EngineCore, host: &mut dyn Host) {
    host.show_overlay_list(&core.scene.overlay_entries());
    host.show_point_list(&core.scene.point_entries());
}

/// Prompt until the answer parses as an integer or the user cancels.
fn ask_integer(host: &mut dyn Host, label: &str, initial: i32) -> Option<i32> {
    loop {
        let text = host.prompt_integer(label, initial)?;
        match text.trim().parse() {
            Ok(value) => return Some(value),
            Err(_) => host.notify(NoticeKind::Error, INVALID_INTEGER_MESSAGE),
        }
    }
}

/// Ask for an X then a Y coordinate.
fn ask_point(host: &mut dyn Host, initial: BgPoint) -> Option<BgPoint> {
    let x = ask_integer(host, "X坐标:", initial.x)?;
    let y = ask_integer(host, "Y坐标:", initial.y)?;
    Some(BgPoint::new(x, y))
}

/// Overlay name for an image file: its stem, or a generic name.
#[must_use]
pub fn overlay_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map_or_else(|| DEFAULT_OVERLAY_NAME.to_owned(), ToOwned::to_owned)
}

fn require_background(core: &EngineCore) -> Result<(), PickerError> {
    if core.scene.has_background() { Ok(()) } else { Err(PickerError::NoBackground) }
}

fn require_selected(core: &EngineCore) -> Result<OverlayId, PickerError> {
    core.selection().ok_or(PickerError::NoOverlaySelected)
}

fn require_picking(core: &EngineCore) -> Result<(), PickerError> {
    match core.mode() {
        Mode::CoordinatePicking => Ok(()),
        Mode::OverlayEditing => Err(PickerError::PointsReadOnly(Mode::OverlayEditing)),
    }
}

// =============================================================================
// BACKGROUND AND OVERLAYS
// =============================================================================

/// Choose and load a new background, resetting the session.
pub fn load_background(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let Some(path) = host.pick_open_file("选择背景图片", &[FileFilter::IMAGES]) else {
        return Vec::new();
    };
    let result = Background::open(&path).map(|background| {
        let actions = core.load_background(background);
        refresh_lists(core, host);
        actions
    });
    finish(host, result)
}

/// Load one image file as an overlay, centered on the background.
///
/// # Errors
///
/// Returns [`PickerError::NoBackground`] without a background and
/// [`PickerError::ImageLoad`] if the file cannot be decoded.
pub fn load_overlay(core: &mut EngineCore, path: &Path) -> Result<OverlayId, PickerError> {
    require_background(core)?;
    let image = open_image(path)?.to_rgba8();
    core.scene.add_overlay(image, overlay_name(path), None)
}

/// Choose one image and add it as an overlay.
pub fn add_overlay(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let result = require_background(core).and_then(|()| {
        let Some(path) = host.pick_open_file("选择叠加图片", &[FileFilter::IMAGES]) else {
            return Ok(Vec::new());
        };
        load_overlay(core, &path)?;
        refresh_lists(core, host);
        Ok(vec![Action::RenderNeeded])
    });
    finish(host, result)
}

/// Choose several images and add each as an overlay.
///
/// A file that fails to load is reported on its own; the rest still load.
pub fn batch_add_overlays(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    if let Err(err) = require_background(core) {
        return finish(host, Err(err));
    }
    let paths = host.pick_open_files("选择要添加的图片", &[FileFilter::IMAGES]);
    if paths.is_empty() {
        return Vec::new();
    }
    let mut added = 0usize;
    for path in &paths {
        match load_overlay(core, path) {
            Ok(_) => added += 1,
            Err(err) => host.notify(NoticeKind::Error, &err.to_string()),
        }
    }
    tracing::info!(requested = paths.len(), added, "batch overlay add");
    refresh_lists(core, host);
    if added == 0 { Vec::new() } else { vec![Action::RenderNeeded] }
}

/// Select an overlay by its row in the overlay list.
pub fn select_overlay_from_list(core: &mut EngineCore, host: &mut dyn Host, index: usize) -> Vec<Action> {
    let Some(id) = core.scene.overlays().get(index).map(OverlayEntity::id) else {
        return Vec::new();
    };
    let result = core.scene.select_exclusive(id).map(|()| vec![Action::OverlaySelected { id }, Action::RenderNeeded]);
    finish(host, result)
}

/// Prompt for a new background position for the selected overlay.
///
/// Invalid integers are reported and asked for again until the user cancels.
pub fn set_overlay_position(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let result = require_selected(core).and_then(|id| {
        let current = core.scene.overlay(id).ok_or(PickerError::UnknownOverlay(id))?.position();
        let Some(position) = ask_point(host, current) else {
            return Ok(Vec::new());
        };
        let position = core.scene.set_overlay_position(id, position)?;
        refresh_lists(core, host);
        Ok(vec![Action::OverlayMoved { id, position }, Action::RenderNeeded])
    });
    finish(host, result)
}

/// Flip the lock on the selected overlay.
pub fn toggle_overlay_lock(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let result = require_selected(core).and_then(|id| {
        let locked = core.scene.overlay(id).is_some_and(OverlayEntity::is_locked);
        core.scene.set_overlay_locked(id, !locked)?;
        let label = if locked { "已解锁" } else { "已锁定" };
        host.show_status(label);
        refresh_lists(core, host);
        Ok(vec![Action::RenderNeeded])
    });
    finish(host, result)
}

/// Remove the selected overlay. Does nothing when none is selected.
pub fn remove_selected_overlay(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let Some(id) = core.selection() else {
        return Vec::new();
    };
    let result = core.scene.remove_overlay(id).map(|_| {
        refresh_lists(core, host);
        vec![Action::OverlayRemoved { id }, Action::RenderNeeded]
    });
    finish(host, result)
}

/// Prompt for a new name for the selected overlay. An empty answer keeps the old one.
pub fn rename_selected_overlay(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let Some(id) = core.selection() else {
        return Vec::new();
    };
    let current = core.scene.overlay(id).map(|o| o.name.clone()).unwrap_or_default();
    let Some(name) = host.prompt_string("请输入新名称:", &current).filter(|n| !n.is_empty()) else {
        return Vec::new();
    };
    let result = core.scene.rename_overlay(id, name).map(|()| {
        refresh_lists(core, host);
        Vec::new()
    });
    finish(host, result)
}

/// Re-stack every overlay above the background in list order.
pub fn bring_overlays_to_top(core: &mut EngineCore) -> Vec<Action> {
    if !core.scene.has_background() {
        return Vec::new();
    }
    core.scene.reorder_all_overlays_above_background();
    vec![Action::RenderNeeded]
}

// =============================================================================
// MODE
// =============================================================================

/// Switch to the other mode and refresh the point list projection.
pub fn toggle_mode(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let mode = core.mode().toggled();
    let actions = core.set_mode(mode);
    host.show_status(&format!("模式: {mode}"));
    refresh_lists(core, host);
    actions
}

// =============================================================================
// POINTS
// =============================================================================

/// Read a coordinate file and append every parseable line as a point.
///
/// Needs a background and is only available while picking coordinates.
/// Nothing is added if the file cannot be read.
pub fn import_coordinates(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    if let Err(err) = require_background(core) {
        return finish(host, Err(err));
    }
    if core.mode() != Mode::CoordinatePicking {
        return finish(host, Err(PickerError::WrongMode(Mode::CoordinatePicking)));
    }
    let Some(path) = host.pick_open_file("选择坐标文件", &[FileFilter::TEXT]) else {
        return Vec::new();
    };
    let result = std::fs::read_to_string(&path)
        .map_err(|source| PickerError::Io { path: path.clone(), source })
        .and_then(|text| {
            let report = parse_import(&text);
            let count = report.points.len();
            core.scene.points_mut()?.extend(report.points);
            tracing::info!(path = %path.display(), count, skipped = report.skipped, "coordinates imported");
            host.notify(NoticeKind::Info, &format!("成功导入 {count} 个坐标点"));
            refresh_lists(core, host);
            Ok(vec![Action::RenderNeeded])
        });
    finish(host, result)
}

/// Prompt for a point and append it as entered.
pub fn add_point(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let result = require_background(core).and_then(|()| require_picking(core)).and_then(|()| {
        let Some(point) = ask_point(host, BgPoint::default()) else {
            return Ok(Vec::new());
        };
        let points = core.scene.points_mut()?;
        points.add_explicit(point);
        let index = points.len() - 1;
        refresh_lists(core, host);
        Ok(vec![Action::PointAdded { index, point }, Action::RenderNeeded])
    });
    finish(host, result)
}

/// Prompt for new coordinates for the point selected in the list.
pub fn edit_point(core: &mut EngineCore, host: &mut dyn Host, index: Option<usize>) -> Vec<Action> {
    let result = require_background(core).and_then(|()| require_picking(core)).and_then(|()| {
        let index = index.ok_or(PickerError::NoPointSelected)?;
        let Some(current) = core.scene.points().get(index) else {
            return Ok(Vec::new());
        };
        let Some(point) = ask_point(host, current) else {
            return Ok(Vec::new());
        };
        core.scene.points_mut()?.edit(index, point)?;
        refresh_lists(core, host);
        Ok(vec![Action::RenderNeeded])
    });
    finish(host, result)
}

/// Remove the point selected in the list. Does nothing when none is selected.
pub fn remove_point(core: &mut EngineCore, host: &mut dyn Host, index: Option<usize>) -> Vec<Action> {
    let Some(index) = index else {
        return Vec::new();
    };
    let result = require_background(core)
        .and_then(|()| require_picking(core))
        .and_then(|()| core.scene.points_mut()?.remove(index))
        .map(|_| {
            refresh_lists(core, host);
            vec![Action::RenderNeeded]
        });
    finish(host, result)
}

/// Remove every recorded point.
pub fn clear_points(core: &mut EngineCore, host: &mut dyn Host) -> Vec<Action> {
    let result = require_background(core).and_then(|()| core.scene.points_mut()).map(PointList::clear).map(|()| {
        refresh_lists(core, host);
        vec![Action::RenderNeeded]
    });
    finish(host, result)
}

/// Show the coordinate of a row in the point list.
pub fn select_point(core: &EngineCore, host: &mut dyn Host, index: usize) {
    if let Some(point) = core.scene.point_entries().get(index) {
        host.show_status(&format!("选中坐标: {point}"));
    }
}

// =============================================================================
// SAVE
// =============================================================================

/// Choose a destination and write the text report there.
pub fn save_data(core: &EngineCore, host: &mut dyn Host) {
    if !core.scene.has_background() {
        host.notify(NoticeKind::Info, NOTHING_TO_SAVE_MESSAGE);
        return;
    }
    let Some(path) = host.pick_save_file("保存数据", ".txt") else {
        return;
    };
    match export::save(&path, &core.scene) {
        Ok(()) => host.notify(NoticeKind::Info, &format!("数据已保存到: {}", path.display())),
        Err(err) => host.notify(NoticeKind::Error, &err.to_string()),
    }
}
