//! Recorded points and the coordinate import format.
//!
//! Points are plain background-space coordinates identified only by their
//! index. Points added by clicking are clamped to the image; points entered in
//! a dialog or imported from a file are stored as given.

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;

use crate::error::PickerError;
use crate::viewport::{BgPoint, DisplayPoint, Viewport};

/// Full-width comma accepted as a separator in import files.
const FULLWIDTH_COMMA: char = '，';

/// Parse one import line into a point.
///
/// A full-width comma takes precedence, then an ASCII comma, then whitespace.
/// The first two fields must be integers; extra fields are ignored.
#[must_use]
pub fn parse_line(line: &str) -> Option<BgPoint> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let fields: Vec<&str> = if line.contains(FULLWIDTH_COMMA) {
        line.split(FULLWIDTH_COMMA).collect()
    } else if line.contains(',') {
        line.split(',').collect()
    } else {
        line.split_whitespace().collect()
    };
    let [x, y, ..] = fields.as_slice() else {
        return None;
    };
    Some(BgPoint::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Outcome of parsing an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Points parsed, in file order.
    pub points: Vec<BgPoint>,
    /// Non-blank lines that were skipped.
    pub skipped: usize,
}

/// Parse a whole import file. Blank lines are ignored; bad lines are counted.
#[must_use]
pub fn parse_import(text: &str) -> ImportReport {
    let mut report = ImportReport::default();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(p) => report.points.push(p),
            None => {
                tracing::warn!(line = lineno + 1, content = line, "skipping unparseable coordinate line");
                report.skipped += 1;
            }
        }
    }
    report
}

/// Ordered sequence of recorded points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointList {
    points: Vec<BgPoint>,
}

impl PointList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a click to background space, clamp it to the image, and append it.
    pub fn add_from_click(&mut self, pointer: DisplayPoint, viewport: &Viewport) -> BgPoint {
        let p = viewport.clamp_to_image(viewport.to_background(pointer));
        self.points.push(p);
        p
    }

    /// Append a point as given, without clamping.
    pub fn add_explicit(&mut self, p: BgPoint) {
        self.points.push(p);
    }

    /// Append several points at once.
    pub fn extend(&mut self, points: impl IntoIterator<Item = BgPoint>) {
        self.points.extend(points);
    }

    /// Replace the point at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::PointIndex`] if `index` is out of range.
    pub fn edit(&mut self, index: usize, p: BgPoint) -> Result<(), PickerError> {
        let len = self.points.len();
        let slot = self.points.get_mut(index).ok_or(PickerError::PointIndex { index, len })?;
        *slot = p;
        Ok(())
    }

    /// Remove and return the point at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PickerError::PointIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<BgPoint, PickerError> {
        if index >= self.points.len() {
            return Err(PickerError::PointIndex { index, len: self.points.len() });
        }
        Ok(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<BgPoint> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[BgPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
