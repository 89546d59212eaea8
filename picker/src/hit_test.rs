use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use super::*;
use crate::background::Background;

// =============================================================
// Helpers
// =============================================================

fn scene(natural: (u32, u32), box_size: (u32, u32)) -> Scene {
    let mut scene = Scene::new(box_size.0, box_size.1);
    scene.set_background(Background::new(DynamicImage::ImageRgb8(RgbImage::new(natural.0, natural.1))));
    scene
}

fn square(side: u32) -> RgbaImage {
    RgbaImage::from_pixel(side, side, Rgba([9, 9, 9, 255]))
}

fn dp(x: i32, y: i32) -> DisplayPoint {
    DisplayPoint::new(x, y)
}

fn target(scene: &Scene, x: i32, y: i32) -> Option<HitTarget> {
    hit_test(scene, dp(x, y)).map(|h| h.target)
}

// =============================================================
// Coordinate picking
// =============================================================

#[test]
fn empty_scene_hits_nothing() {
    let scene = Scene::default();
    assert_eq!(hit_test(&scene, dp(10, 10)), None);
}

#[test]
fn picking_hits_background_inside_image() {
    let scene = scene((1920, 1080), (600, 500));
    let hit = hit_test(&scene, dp(100, 100)).unwrap();
    assert_eq!(hit.target, HitTarget::Background);
    assert_eq!(hit.at, BgPoint::new(320, 61));
}

#[test]
fn picking_ignores_letterbox_bars() {
    let scene = scene((1920, 1080), (600, 500));
    assert_eq!(target(&scene, 100, 50), None);
    assert_eq!(target(&scene, 100, 81 + 337), None);
    assert_eq!(target(&scene, 100, 81), Some(HitTarget::Background));
}

#[test]
fn picking_ignores_overlays() {
    let mut scene = scene((800, 600), (800, 600));
    scene.add_overlay(square(100), "A", Some(BgPoint::new(0, 0))).unwrap();
    assert_eq!(target(&scene, 10, 10), Some(HitTarget::Background));
}

// =============================================================
// Overlay editing
// =============================================================

#[test]
fn editing_picks_topmost_overlay() {
    let mut scene = scene((800, 600), (800, 600));
    let a = scene.add_overlay(square(100), "A", Some(BgPoint::new(0, 0))).unwrap();
    let b = scene.add_overlay(square(100), "B", Some(BgPoint::new(50, 50))).unwrap();
    scene.set_mode(Mode::OverlayEditing);

    assert_eq!(target(&scene, 60, 60), Some(HitTarget::Overlay(b)));
    assert_eq!(target(&scene, 10, 10), Some(HitTarget::Overlay(a)));

    scene.select_exclusive(a).unwrap();
    assert_eq!(target(&scene, 60, 60), Some(HitTarget::Overlay(a)));
}

#[test]
fn editing_ignores_background() {
    let mut scene = scene((800, 600), (800, 600));
    scene.add_overlay(square(100), "A", Some(BgPoint::new(0, 0))).unwrap();
    scene.set_mode(Mode::OverlayEditing);
    assert_eq!(target(&scene, 500, 500), None);
}

#[test]
fn locked_overlay_still_absorbs_hit() {
    let mut scene = scene((800, 600), (800, 600));
    scene.add_overlay(square(100), "A", Some(BgPoint::new(0, 0))).unwrap();
    let b = scene.add_overlay(square(100), "B", Some(BgPoint::new(0, 0))).unwrap();
    scene.set_overlay_locked(b, true).unwrap();
    scene.set_mode(Mode::OverlayEditing);
    assert_eq!(target(&scene, 5, 5), Some(HitTarget::Overlay(b)));
}

#[test]
fn overlay_outside_background_is_still_hittable() {
    let mut scene = scene((800, 600), (1000, 600));
    let a = scene.add_overlay(square(50), "A", Some(BgPoint::new(-80, 10))).unwrap();
    scene.set_mode(Mode::OverlayEditing);
    // Offset is (100, 0), so the overlay spans display x 20..70.
    let hit = hit_test(&scene, dp(30, 20)).unwrap();
    assert_eq!(hit.target, HitTarget::Overlay(a));
    assert_eq!(hit.at, BgPoint::new(-70, 20));
}
