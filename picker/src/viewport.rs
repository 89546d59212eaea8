//! Mapping between background pixel space and display space.
//!
//! The background is letterboxed into the display box: scaled uniformly to the
//! largest size that fits, then centered. Every display-space number elsewhere
//! in the crate is derived from a background-space integer through this
//! mapping, never stored.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, MIN_BOX_EXTENT};

/// An integer position in background-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BgPoint {
    pub x: i32,
    pub y: i32,
}

impl BgPoint {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for BgPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An integer position on the display surface, in pixels from its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayPoint {
    pub x: i32,
    pub y: i32,
}

impl DisplayPoint {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for DisplayPoint {
    type Output = DisplayPoint;

    fn sub(self, rhs: Self) -> Self::Output {
        DisplayPoint::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Narrow to `i32`, saturating at the bounds.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Round to the nearest integer, ties to even.
#[must_use]
pub fn round_px(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Resolve the box the background is fitted into.
///
/// Extents below [`MIN_BOX_EXTENT`] mean the surface has not been laid out yet
/// and are replaced by the default box on that axis.
#[must_use]
pub fn effective_box(box_w: u32, box_h: u32) -> (u32, u32) {
    let w = if box_w < MIN_BOX_EXTENT { DEFAULT_BOX_WIDTH } else { box_w };
    let h = if box_h < MIN_BOX_EXTENT { DEFAULT_BOX_HEIGHT } else { box_h };
    (w, h)
}

/// Letterbox transform for one background inside one display box.
///
/// `scale_x` / `scale_y` are natural size divided by display size, so
/// multiplying a display distance by them yields background pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Natural background size in pixels.
    pub natural: (u32, u32),
    /// Size of the background as displayed.
    pub display: (u32, u32),
    /// Display-space position of the background's top-left corner.
    pub offset: DisplayPoint,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            natural: (1, 1),
            display: (1, 1),
            offset: DisplayPoint::default(),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Viewport {
    /// Fit a `natural_w` × `natural_h` background into a `box_w` × `box_h` display box.
    #[must_use]
    pub fn fit(natural_w: u32, natural_h: u32, box_w: u32, box_h: u32) -> Self {
        let (box_w, box_h) = effective_box(box_w, box_h);
        let natural_w = natural_w.max(1);
        let natural_h = natural_h.max(1);

        let ratio = (f64::from(box_w) / f64::from(natural_w)).min(f64::from(box_h) / f64::from(natural_h));
        let display_w = ((f64::from(natural_w) * ratio) as u32).max(1);
        let display_h = ((f64::from(natural_h) * ratio) as u32).max(1);

        let offset = DisplayPoint::new(
            ((i64::from(box_w) - i64::from(display_w)) / 2) as i32,
            ((i64::from(box_h) - i64::from(display_h)) / 2) as i32,
        );

        let viewport = Self {
            natural: (natural_w, natural_h),
            display: (display_w, display_h),
            offset,
            scale_x: f64::from(natural_w) / f64::from(display_w),
            scale_y: f64::from(natural_h) / f64::from(display_h),
        };
        tracing::debug!(
            natural_w,
            natural_h,
            box_w,
            box_h,
            display_w,
            display_h,
            offset_x = offset.x,
            offset_y = offset.y,
            "viewport fitted"
        );
        viewport
    }

    /// Convert a background point to display space.
    #[must_use]
    pub fn to_display(&self, bg: BgPoint) -> DisplayPoint {
        DisplayPoint {
            x: saturate(i64::from(self.offset.x) + i64::from(round_px(f64::from(bg.x) / self.scale_x))),
            y: saturate(i64::from(self.offset.y) + i64::from(round_px(f64::from(bg.y) / self.scale_y))),
        }
    }

    /// Convert a display point to background space. The result is not clamped.
    #[must_use]
    pub fn to_background(&self, display: DisplayPoint) -> BgPoint {
        BgPoint {
            x: round_px((f64::from(display.x) - f64::from(self.offset.x)) * self.scale_x),
            y: round_px((f64::from(display.y) - f64::from(self.offset.y)) * self.scale_y),
        }
    }

    /// Whether `display` lies on the displayed background rectangle.
    #[must_use]
    pub fn contains_display(&self, display: DisplayPoint) -> bool {
        let dx = i64::from(display.x) - i64::from(self.offset.x);
        let dy = i64::from(display.y) - i64::from(self.offset.y);
        (0..i64::from(self.display.0)).contains(&dx) && (0..i64::from(self.display.1)).contains(&dy)
    }

    /// Clamp a background point into `[0, W-1] × [0, H-1]`.
    #[must_use]
    pub fn clamp_to_image(&self, bg: BgPoint) -> BgPoint {
        let max_x = i32::try_from(self.natural.0.saturating_sub(1)).unwrap_or(i32::MAX);
        let max_y = i32::try_from(self.natural.1.saturating_sub(1)).unwrap_or(i32::MAX);
        BgPoint::new(bg.x.clamp(0, max_x), bg.y.clamp(0, max_y))
    }

    /// Display size of something `width` × `height` background pixels large.
    #[must_use]
    pub fn scaled_extent(&self, width: u32, height: u32) -> (u32, u32) {
        let w = round_px(f64::from(width) / self.scale_x).max(1);
        let h = round_px(f64::from(height) / self.scale_y).max(1);
        (w as u32, h as u32)
    }
}
