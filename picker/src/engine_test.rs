use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use super::*;

// =============================================================
// Helpers
// =============================================================

fn background(w: u32, h: u32) -> Background {
    Background::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30]))))
}

/// 1920×1080 background in the default 600×500 box.
fn hd_engine() -> EngineCore {
    let mut core = EngineCore::new(600, 500);
    core.load_background(background(1920, 1080));
    core
}

/// 800×600 background shown at 1:1.
fn identity_engine() -> EngineCore {
    let mut core = EngineCore::new(800, 600);
    core.load_background(background(800, 600));
    core
}

fn square(side: u32) -> RgbaImage {
    RgbaImage::from_pixel(side, side, Rgba([200, 0, 0, 255]))
}

fn pt(x: i32, y: i32) -> DisplayPoint {
    DisplayPoint::new(x, y)
}

fn bg(x: i32, y: i32) -> BgPoint {
    BgPoint::new(x, y)
}

fn has_action(actions: &[Action], pred: impl Fn(&Action) -> bool) -> bool {
    actions.iter().any(pred)
}

fn has_render(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn gray() -> Option<PixelColor> {
    Some(PixelColor { rgba: [10, 20, 30, 255], has_alpha: false })
}

// =============================================================
// Construction and loading
// =============================================================

#[test]
fn default_engine_is_idle_without_background() {
    let core = EngineCore::default();
    assert_eq!(core.input, InputState::Idle);
    assert!(!core.scene.has_background());
    assert_eq!(core.mode(), Mode::CoordinatePicking);
    assert!(core.selection().is_none());
}

#[test]
fn load_background_resets_and_renders() {
    let mut core = hd_engine();
    core.on_pointer_down(pt(100, 100), Button::Primary);
    core.set_mode(Mode::OverlayEditing);

    let actions = core.load_background(background(50, 50));
    assert!(has_render(&actions));
    assert!(has_action(&actions, |a| matches!(a, Action::ModeChanged(Mode::CoordinatePicking))));
    assert!(core.scene.points().is_empty());
    assert_eq!(core.mode(), Mode::CoordinatePicking);
}

#[test]
fn pointer_events_without_background_do_nothing() {
    let mut core = EngineCore::default();
    assert!(core.on_pointer_down(pt(100, 100), Button::Primary).is_empty());
    assert!(core.on_pointer_move(pt(100, 100)).is_empty());
    assert!(core.on_pointer_up(pt(100, 100), Button::Primary).is_empty());
    assert!(core.scene.points().is_empty());
}

// =============================================================
// Coordinate picking: clicks
// =============================================================

#[test]
fn click_adds_point_with_readout() {
    let mut core = hd_engine();
    let actions = core.on_pointer_down(pt(100, 100), Button::Primary);
    assert_eq!(
        actions,
        vec![
            Action::PointAdded { index: 0, point: bg(320, 61) },
            Action::Readout(PixelReadout { point: bg(320, 61), color: gray() }),
            Action::RenderNeeded,
        ]
    );
    assert_eq!(core.scene.points().as_slice(), &[bg(320, 61)]);
}

#[test]
fn click_indices_follow_list_order() {
    let mut core = hd_engine();
    core.on_pointer_down(pt(100, 100), Button::Primary);
    core.on_pointer_up(pt(100, 100), Button::Primary);
    let actions = core.on_pointer_down(pt(200, 200), Button::Primary);
    assert!(has_action(&actions, |a| matches!(a, Action::PointAdded { index: 1, .. })));
}

#[test]
fn click_on_letterbox_bar_is_ignored() {
    let mut core = hd_engine();
    assert!(core.on_pointer_down(pt(100, 40), Button::Primary).is_empty());
    assert!(core.scene.points().is_empty());
}

#[test]
fn click_on_last_display_row_is_clamped() {
    let mut core = hd_engine();
    core.on_pointer_down(pt(599, 417), Button::Primary);
    let p = core.scene.points().get(0).unwrap();
    assert!(p.x <= 1919 && p.y <= 1079);
    assert!(p.x >= 0 && p.y >= 0);
}

#[test]
fn non_primary_buttons_are_ignored() {
    let mut core = hd_engine();
    assert!(core.on_pointer_down(pt(100, 100), Button::Secondary).is_empty());
    assert!(core.on_pointer_down(pt(100, 100), Button::Middle).is_empty());
    assert!(core.scene.points().is_empty());
}

#[test]
fn click_ignores_overlays_while_picking() {
    let mut core = identity_engine();
    core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    let actions = core.on_pointer_down(pt(10, 10), Button::Primary);
    assert!(has_action(&actions, |a| matches!(a, Action::PointAdded { .. })));
    assert!(core.selection().is_none());
    assert_eq!(core.input, InputState::Idle);
}

// =============================================================
// Coordinate picking: hover
// =============================================================

#[test]
fn hover_inside_image_reports_readout() {
    let core_actions = hd_engine().on_pointer_move(pt(100, 100));
    assert_eq!(core_actions, vec![Action::Readout(PixelReadout { point: bg(320, 61), color: gray() })]);
}

#[test]
fn hover_outside_image_clears_readout() {
    let mut core = hd_engine();
    assert_eq!(core.on_pointer_move(pt(100, 20)), vec![Action::ReadoutCleared]);
}

#[test]
fn hover_does_not_store_points() {
    let mut core = hd_engine();
    core.on_pointer_move(pt(100, 100));
    core.on_pointer_move(pt(200, 200));
    assert!(core.scene.points().is_empty());
}

#[test]
fn hover_is_suppressed_while_editing() {
    let mut core = hd_engine();
    core.set_mode(Mode::OverlayEditing);
    assert!(core.on_pointer_move(pt(100, 100)).is_empty());
}

#[test]
fn readout_display_format() {
    let readout = PixelReadout { point: bg(320, 61), color: gray() };
    assert_eq!(readout.to_string(), "坐标: (320, 61), RGB: (10, 20, 30)");
    let bare = PixelReadout { point: bg(1, 2), color: None };
    assert_eq!(bare.to_string(), "坐标: (1, 2)");
}

// =============================================================
// Overlay editing: drag
// =============================================================

#[test]
fn press_selects_and_starts_drag() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(100, 50))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    let actions = core.on_pointer_down(pt(110, 70), Button::Primary);
    assert_eq!(actions, vec![Action::OverlaySelected { id: a }, Action::RenderNeeded]);
    assert_eq!(core.input, InputState::DraggingOverlay { id: a });
    assert_eq!(core.selection(), Some(a));
}

#[test]
fn drag_moves_overlay_by_pointer_delta() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(100, 50))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    core.on_pointer_down(pt(110, 70), Button::Primary);
    let actions = core.on_pointer_move(pt(210, 170));
    assert_eq!(actions, vec![Action::OverlayMoved { id: a, position: bg(200, 150) }, Action::RenderNeeded]);
    core.on_pointer_up(pt(210, 170), Button::Primary);

    assert_eq!(core.input, InputState::Idle);
    assert_eq!(core.scene.overlay(a).unwrap().position(), bg(200, 150));
    assert!(core.on_pointer_move(pt(400, 400)).is_empty());
    assert_eq!(core.scene.overlay(a).unwrap().position(), bg(200, 150));
}

#[test]
fn drag_through_scaled_viewport() {
    let mut core = hd_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(320, 61))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    core.on_pointer_down(pt(100, 100), Button::Primary);
    let actions = core.on_pointer_move(pt(110, 100));
    assert!(has_action(&actions, |act| *act == Action::OverlayMoved { id: a, position: bg(352, 61) }));
}

#[test]
fn press_hits_topmost_overlay() {
    let mut core = identity_engine();
    core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    let b = core.scene.add_overlay(square(100), "B", Some(bg(50, 50))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    core.on_pointer_down(pt(60, 60), Button::Primary);
    assert_eq!(core.selection(), Some(b));
}

#[test]
fn press_on_background_while_editing_does_nothing() {
    let mut core = identity_engine();
    core.scene.add_overlay(square(10), "A", Some(bg(0, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    assert!(core.on_pointer_down(pt(400, 400), Button::Primary).is_empty());
    assert!(core.scene.points().is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn locked_overlay_ignores_full_gesture() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(100, 50))).unwrap();
    core.scene.set_overlay_locked(a, true).unwrap();
    core.set_mode(Mode::OverlayEditing);

    assert!(core.on_pointer_down(pt(110, 70), Button::Primary).is_empty());
    assert!(core.on_pointer_move(pt(300, 300)).is_empty());
    core.on_pointer_up(pt(300, 300), Button::Primary);

    assert_eq!(core.scene.overlay(a).unwrap().position(), bg(100, 50));
    assert!(core.selection().is_none());
}

#[test]
fn locking_mid_drag_freezes_overlay() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    core.on_pointer_down(pt(10, 10), Button::Primary);
    core.on_pointer_move(pt(20, 20));
    core.scene.set_overlay_locked(a, true).unwrap();
    assert!(core.on_pointer_move(pt(90, 90)).is_empty());
    assert_eq!(core.scene.overlay(a).unwrap().position(), bg(10, 10));
}

#[test]
fn second_press_during_drag_is_ignored() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    core.scene.add_overlay(square(100), "B", Some(bg(300, 300))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    core.on_pointer_down(pt(10, 10), Button::Primary);
    assert!(core.on_pointer_down(pt(310, 310), Button::Primary).is_empty());
    assert_eq!(core.input, InputState::DraggingOverlay { id: a });
}

#[test]
fn secondary_release_keeps_drag() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.on_pointer_down(pt(10, 10), Button::Primary);
    core.on_pointer_up(pt(10, 10), Button::Secondary);
    assert_eq!(core.input, InputState::DraggingOverlay { id: a });
}

// =============================================================
// Keys
// =============================================================

#[test]
fn delete_removes_selected_overlay_while_editing() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(10), "A", None).unwrap();
    let b = core.scene.add_overlay(square(10), "B", None).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.scene.select_exclusive(a).unwrap();

    let actions = core.on_key_down(&Key("Delete".into()));
    assert_eq!(actions, vec![Action::OverlayRemoved { id: a }, Action::RenderNeeded]);
    assert_eq!(core.scene.overlays().len(), 1);
    assert!(core.scene.overlay(b).is_some());
}

#[test]
fn backspace_also_deletes() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(10), "A", None).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.scene.select_exclusive(a).unwrap();
    assert!(!core.on_key_down(&Key("Backspace".into())).is_empty());
    assert!(core.scene.overlays().is_empty());
}

#[test]
fn delete_mid_drag_resets_gesture() {
    let mut core = identity_engine();
    core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.on_pointer_down(pt(10, 10), Button::Primary);
    core.on_key_down(&Key("Delete".into()));
    assert_eq!(core.input, InputState::Idle);
    assert!(core.on_pointer_move(pt(50, 50)).is_empty());
}

#[test]
fn delete_is_ignored_while_picking() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(10), "A", None).unwrap();
    core.scene.select_exclusive(a).unwrap();
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert_eq!(core.scene.overlays().len(), 1);
}

#[test]
fn delete_without_selection_does_nothing() {
    let mut core = identity_engine();
    core.scene.add_overlay(square(10), "A", None).unwrap();
    core.set_mode(Mode::OverlayEditing);
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert_eq!(core.scene.overlays().len(), 1);
}

#[test]
fn other_keys_do_nothing() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(10), "A", None).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.scene.select_exclusive(a).unwrap();
    assert!(core.on_key_down(&Key("a".into())).is_empty());
}

// =============================================================
// Mode and viewport
// =============================================================

#[test]
fn set_mode_reports_change_once() {
    let mut core = identity_engine();
    let actions = core.set_mode(Mode::OverlayEditing);
    assert!(has_action(&actions, |a| matches!(a, Action::ModeChanged(Mode::OverlayEditing))));
    assert!(core.set_mode(Mode::OverlayEditing).is_empty());
}

#[test]
fn set_mode_abandons_drag() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(0, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.on_pointer_down(pt(10, 10), Button::Primary);
    core.set_mode(Mode::CoordinatePicking);
    assert_eq!(core.input, InputState::Idle);
    assert!(!core.scene.overlay(a).unwrap().is_dragging());
}

#[test]
fn mode_round_trip_preserves_clicked_points() {
    let mut core = hd_engine();
    core.scene.add_overlay(square(100), "A", Some(bg(320, 61))).unwrap();
    for (x, y) in [(50, 90), (300, 250), (590, 400)] {
        core.on_pointer_down(pt(x, y), Button::Primary);
        core.on_pointer_up(pt(x, y), Button::Primary);
    }
    let before = core.scene.points().clone();

    core.set_mode(Mode::OverlayEditing);
    core.on_pointer_down(pt(100, 100), Button::Primary);
    core.on_pointer_move(pt(150, 150));
    core.on_pointer_up(pt(150, 150), Button::Primary);
    core.set_mode(Mode::CoordinatePicking);

    assert_eq!(core.scene.points(), &before);
}

#[test]
fn resize_keeps_positions_and_requests_render() {
    let mut core = hd_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(320, 61))).unwrap();
    core.on_pointer_down(pt(300, 300), Button::Primary);
    let points = core.scene.points().clone();

    for (w, h) in [(1200, 1000), (300, 200), (5, 5)] {
        assert!(has_render(&core.set_viewport(w, h)));
        assert_eq!(core.scene.overlay(a).unwrap().position(), bg(320, 61));
        assert_eq!(core.scene.points(), &points);
    }
}

#[test]
fn resize_then_click_uses_new_mapping() {
    let mut core = hd_engine();
    core.set_viewport(1920, 1080);
    let actions = core.on_pointer_down(pt(320, 61), Button::Primary);
    assert!(has_action(&actions, |a| *a == Action::PointAdded { index: 0, point: bg(320, 61) }));
}

#[test]
fn resize_mid_drag_ends_the_gesture() {
    let mut core = identity_engine();
    let a = core.scene.add_overlay(square(100), "A", Some(bg(100, 100))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    core.on_pointer_down(pt(150, 150), Button::Primary);

    core.set_viewport(400, 300);
    assert_eq!(core.input, InputState::Idle);
    assert!(!core.scene.overlay(a).unwrap().is_dragging());
    assert!(core.on_pointer_move(pt(10, 10)).is_empty());
    assert_eq!(core.scene.overlay(a).unwrap().position(), bg(100, 100));
}

// =============================================================
// Extreme coordinates
// =============================================================

/// 100×80 background upscaled into a 600×500 box.
fn upscaled_engine() -> EngineCore {
    let mut core = EngineCore::new(600, 500);
    core.load_background(background(100, 80));
    core
}

#[test]
fn far_away_overlay_does_not_break_editing_clicks() {
    let mut core = upscaled_engine();
    core.scene.add_overlay(square(10), "far", Some(bg(0, i32::MAX))).unwrap();
    core.scene.add_overlay(square(10), "near", Some(bg(i32::MIN, i32::MIN))).unwrap();
    core.set_mode(Mode::OverlayEditing);

    assert!(core.on_pointer_down(pt(300, 250), Button::Primary).is_empty());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn far_away_overlay_drag_does_not_overflow() {
    let mut core = upscaled_engine();
    let a = core.scene.add_overlay(square(10), "far", Some(bg(i32::MAX, 0))).unwrap();
    core.set_mode(Mode::OverlayEditing);
    assert!(core.scene.press_overlay(a, pt(-10, 10)).unwrap());
    assert!(core.scene.drag_overlay(a, pt(-10, 10)).is_some());
}
