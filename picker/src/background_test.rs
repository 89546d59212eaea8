use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

use super::*;

fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, 7])))
}

// =============================================================
// PixelColor
// =============================================================

#[test]
fn pixel_color_formats_rgb() {
    let c = PixelColor { rgba: [1, 2, 3, 255], has_alpha: false };
    assert_eq!(c.to_string(), "(1, 2, 3)");
}

#[test]
fn pixel_color_formats_rgba() {
    let c = PixelColor { rgba: [1, 2, 3, 4], has_alpha: true };
    assert_eq!(c.to_string(), "(1, 2, 3, 4)");
}

// =============================================================
// Background
// =============================================================

#[test]
fn size_is_natural_size() {
    let bg = Background::new(gradient(40, 30));
    assert_eq!(bg.size(), (40, 30));
}

#[test]
fn pixel_reads_rgb_value() {
    let bg = Background::new(gradient(40, 30));
    let c = bg.pixel(BgPoint::new(12, 9)).unwrap();
    assert_eq!(c.rgba, [12, 9, 7, 255]);
    assert!(!c.has_alpha);
}

#[test]
fn pixel_outside_image_is_none() {
    let bg = Background::new(gradient(40, 30));
    assert!(bg.pixel(BgPoint::new(40, 0)).is_none());
    assert!(bg.pixel(BgPoint::new(0, 30)).is_none());
    assert!(bg.pixel(BgPoint::new(-1, 5)).is_none());
}

#[test]
fn pixel_of_grayscale_replicates_channels() {
    let bg = Background::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([90]))));
    let c = bg.pixel(BgPoint::new(1, 1)).unwrap();
    assert_eq!(c.to_string(), "(90, 90, 90)");
}

#[test]
fn pixel_of_rgba_reports_alpha() {
    let bg = Background::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 40]))));
    let c = bg.pixel(BgPoint::new(3, 3)).unwrap();
    assert!(c.has_alpha);
    assert_eq!(c.to_string(), "(10, 20, 30, 40)");
}

#[test]
fn rescale_matches_viewport_display_size() {
    let mut bg = Background::new(gradient(200, 100));
    assert!(bg.display_image().is_none());
    let vp = Viewport::fit(200, 100, 100, 100);
    bg.rescale(&vp);
    let display = bg.display_image().unwrap();
    assert_eq!(display.dimensions(), (100, 50));
}

#[test]
fn resample_never_produces_empty_image() {
    let src = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
    assert_eq!(resample(&src, 0, 0).dimensions(), (1, 1));
}

// =============================================================
// Loading
// =============================================================

#[test]
fn open_missing_file_is_image_load_error() {
    let err = Background::open(Path::new("/definitely/not/here.png")).err().unwrap();
    assert!(matches!(err, PickerError::ImageLoad { .. }));
}

#[test]
fn open_corrupt_file_is_image_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();
    let err = Background::open(&path).err().unwrap();
    assert!(matches!(err, PickerError::ImageLoad { .. }));
}

#[test]
fn open_png_round_trips_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.png");
    gradient(64, 48).save(&path).unwrap();
    let bg = Background::open(&path).unwrap();
    assert_eq!(bg.size(), (64, 48));
    assert_eq!(bg.pixel(BgPoint::new(5, 6)).unwrap().rgba, [5, 6, 7, 255]);
}
