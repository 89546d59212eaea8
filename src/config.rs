//! Runtime configuration loaded from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use picker::consts::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, MARKER_RADIUS_PX};

/// Display and marker settings, loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PickerConfig {
    /// Display box width in pixels.
    pub(crate) box_width: u32,
    /// Display box height in pixels.
    pub(crate) box_height: u32,
    /// Radius of rendered point markers in display pixels.
    pub(crate) marker_radius: u32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self { box_width: DEFAULT_BOX_WIDTH, box_height: DEFAULT_BOX_HEIGHT, marker_radius: MARKER_RADIUS_PX }
    }
}

impl PickerConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            box_width: env_parse("COORDPICK_BOX_WIDTH", DEFAULT_BOX_WIDTH),
            box_height: env_parse("COORDPICK_BOX_HEIGHT", DEFAULT_BOX_HEIGHT),
            marker_radius: env_parse("COORDPICK_MARKER_RADIUS", MARKER_RADIUS_PX),
        }
    }

    /// Apply command-line flags on top of the environment values.
    pub(crate) fn with_overrides(self, box_size: Option<(u32, u32)>, marker_radius: Option<u32>) -> Self {
        let (box_width, box_height) = box_size.unwrap_or((self.box_width, self.box_height));
        Self { box_width, box_height, marker_radius: marker_radius.unwrap_or(self.marker_radius) }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
