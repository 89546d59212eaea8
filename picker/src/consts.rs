//! Shared numeric constants for the picker crate.

// ── Display box ─────────────────────────────────────────────────

/// Display box width used before the host surface reports a real size.
pub const DEFAULT_BOX_WIDTH: u32 = 600;

/// Display box height used before the host surface reports a real size.
pub const DEFAULT_BOX_HEIGHT: u32 = 500;

/// Box extents below this are treated as an unrealized surface.
pub const MIN_BOX_EXTENT: u32 = 10;

// ── Markers ─────────────────────────────────────────────────────

/// Radius of the dot drawn for each point, in display pixels.
pub const MARKER_RADIUS_PX: u32 = 3;

/// Offset of a marker's coordinate label from its dot, in display pixels.
pub const MARKER_LABEL_OFFSET_PX: (i32, i32) = (10, -10);

/// Marker dot color.
pub const MARKER_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Canvas fill behind the background image.
pub const CANVAS_COLOR: [u8; 4] = [255, 255, 255, 255];

// ── Files ───────────────────────────────────────────────────────

/// Extensions accepted for background and overlay images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Extensions accepted for coordinate import and export files.
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Name given to an overlay whose file has no usable stem.
pub const DEFAULT_OVERLAY_NAME: &str = "叠加图片";

// ── Export report headings ──────────────────────────────────────

pub const REPORT_SIZE_HEADING: &str = "背景图片尺寸";
pub const REPORT_POINTS_HEADING: &str = "坐标点(包含叠加图片位置):";
pub const REPORT_OVERLAYS_HEADING: &str = "叠加图片位置(左上角基准点):";
