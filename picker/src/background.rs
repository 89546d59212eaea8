//! Background image: decoding, pixel readout, and the display-sized copy.

#[cfg(test)]
#[path = "background_test.rs"]
mod background_test;

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::error::PickerError;
use crate::viewport::{BgPoint, Viewport};

/// Decode an image file, reporting the path on failure.
///
/// # Errors
///
/// Returns [`PickerError::ImageLoad`] if the file cannot be opened or decoded.
pub fn open_image(path: &Path) -> Result<DynamicImage, PickerError> {
    image::open(path).map_err(|source| {
        tracing::warn!(path = %path.display(), error = %source, "image load failed");
        PickerError::ImageLoad { path: path.to_path_buf(), source }
    })
}

/// Resample `source` to `width` × `height` with a Lanczos3 filter.
#[must_use]
pub fn resample(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(source, width.max(1), height.max(1), FilterType::Lanczos3)
}

/// Color of one background pixel.
///
/// Images without an alpha channel report three components; images with one
/// report four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelColor {
    pub rgba: [u8; 4],
    pub has_alpha: bool,
}

impl std::fmt::Display for PixelColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.rgba;
        if self.has_alpha {
            write!(f, "({r}, {g}, {b}, {a})")
        } else {
            write!(f, "({r}, {g}, {b})")
        }
    }
}

/// The loaded background and its display-sized resample.
pub struct Background {
    image: DynamicImage,
    display: Option<RgbaImage>,
}

impl Background {
    #[must_use]
    pub fn new(image: DynamicImage) -> Self {
        Self { image, display: None }
    }

    /// Decode the background from a file.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::ImageLoad`] if the file cannot be decoded.
    pub fn open(path: &Path) -> Result<Self, PickerError> {
        open_image(path).map(Self::new)
    }

    /// Natural size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[must_use]
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// The resample produced by the last [`Background::rescale`], if any.
    #[must_use]
    pub fn display_image(&self) -> Option<&RgbaImage> {
        self.display.as_ref()
    }

    /// Color at a background coordinate; `None` outside the image.
    #[must_use]
    pub fn pixel(&self, at: BgPoint) -> Option<PixelColor> {
        let x = u32::try_from(at.x).ok()?;
        let y = u32::try_from(at.y).ok()?;
        if !self.image.in_bounds(x, y) {
            return None;
        }
        Some(PixelColor {
            rgba: self.image.get_pixel(x, y).0,
            has_alpha: self.image.color().has_alpha(),
        })
    }

    /// Resample the background to the viewport's display size.
    pub fn rescale(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.display;
        self.display = Some(resample(&self.image.to_rgba8(), w, h));
    }
}
