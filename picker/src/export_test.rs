use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use super::*;
use crate::background::Background;

fn scene_1920() -> Scene {
    let mut scene = Scene::default();
    scene.set_background(Background::new(DynamicImage::ImageRgb8(RgbImage::new(1920, 1080))));
    scene
}

fn square(side: u32) -> RgbaImage {
    RgbaImage::from_pixel(side, side, Rgba([1, 2, 3, 255]))
}

fn populated() -> Scene {
    let mut scene = scene_1920();
    scene.points_mut().unwrap().extend([BgPoint::new(-100, 100), BgPoint::new(200, 400)]);
    scene.add_overlay(square(10), "n1", Some(BgPoint::new(768, 239))).unwrap();
    scene.add_overlay(square(10), "n2", Some(BgPoint::new(-5, 0))).unwrap();
    scene
}

// =============================================================
// report
// =============================================================

#[test]
fn report_requires_background() {
    assert_eq!(report(&Scene::default()), None);
}

#[test]
fn report_empty_scene() {
    assert_eq!(
        report(&scene_1920()).unwrap(),
        "背景图片尺寸: 1920 x 1080\n\n坐标点(包含叠加图片位置):\n\n叠加图片位置(左上角基准点):\n"
    );
}

#[test]
fn report_lists_points_and_overlays_while_picking() {
    let expected = "背景图片尺寸: 1920 x 1080\n\
                    \n\
                    坐标点(包含叠加图片位置):\n\
                    (-100, 100)\n\
                    (200, 400)\n\
                    \n\
                    叠加图片位置(左上角基准点):\n\
                    n1: (768, 239)\n\
                    n2: (-5, 0)\n";
    assert_eq!(report(&populated()).unwrap(), expected);
}

#[test]
fn report_points_block_follows_mode() {
    let mut scene = populated();
    scene.set_mode(Mode::OverlayEditing);
    let text = report(&scene).unwrap();
    let points_block: Vec<_> = text
        .lines()
        .skip_while(|l| *l != REPORT_POINTS_HEADING)
        .skip(1)
        .take_while(|l| !l.is_empty())
        .collect();
    assert_eq!(points_block, ["(768, 239)", "(-5, 0)"]);
}

#[test]
fn report_uses_list_order_not_stack_order() {
    let mut scene = populated();
    let first = scene.overlays()[0].id();
    let second = scene.overlays()[1].id();
    scene.select_exclusive(first).unwrap();
    scene.select_exclusive(second).unwrap();
    scene.select_exclusive(first).unwrap();
    let text = report(&scene).unwrap();
    let n1 = text.find("n1:").unwrap();
    let n2 = text.find("n2:").unwrap();
    assert!(n1 < n2);
}

// =============================================================
// save
// =============================================================

#[test]
fn save_writes_report_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let scene = populated();
    save(&path, &scene).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), report(&scene).unwrap());
}

#[test]
fn save_without_background_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    assert!(matches!(save(&path, &Scene::default()), Err(PickerError::NoBackground)));
    assert!(!path.exists());
}

#[test]
fn save_to_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.txt");
    assert!(matches!(save(&path, &populated()), Err(PickerError::Io { .. })));
}

// =============================================================
// Snapshot
// =============================================================

#[test]
fn snapshot_captures_scene() {
    let snap = Snapshot::from_scene(&populated()).unwrap();
    assert_eq!(snap.background, SizeEntry { width: 1920, height: 1080 });
    assert_eq!(snap.mode, Mode::CoordinatePicking);
    assert_eq!(snap.points, vec![BgPoint::new(-100, 100), BgPoint::new(200, 400)]);
    assert_eq!(snap.overlays[0], OverlaySnapshot { name: "n1".into(), position: BgPoint::new(768, 239), locked: false });
}

#[test]
fn snapshot_json_shape() {
    let json = Snapshot::from_scene(&populated()).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["background"]["width"], 1920);
    assert_eq!(value["mode"], "coordinate_picking");
    assert_eq!(value["points"][0]["x"], -100);
    assert_eq!(value["overlays"][1]["name"], "n2");
    assert_eq!(value["overlays"][1]["locked"], false);
}

#[test]
fn snapshot_requires_background() {
    assert!(Snapshot::from_scene(&Scene::default()).is_none());
}
