//! Error type for picker operations.
//!
//! Pointer handlers never fail: guards there are silent no-ops. Errors come
//! from file loading and from user commands issued in a state that does not
//! allow them. The command layer turns each variant into a host notice.

use std::path::PathBuf;

use crate::input::Mode;

/// Error returned by scene, point and command operations.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// An operation needed a background image and none is loaded.
    #[error("请先加载背景图片")]
    NoBackground,
    /// An overlay command ran with no overlay selected.
    #[error("请先选择一个叠加图片")]
    NoOverlaySelected,
    /// A point command ran with no point selected.
    #[error("请先选择一个坐标点")]
    NoPointSelected,
    /// A point index was past the end of the point list.
    #[error("point index {index} out of range (len {len})")]
    PointIndex { index: usize, len: usize },
    /// No overlay with this id exists in the scene.
    #[error("unknown overlay: {0}")]
    UnknownOverlay(uuid::Uuid),
    /// Point mutation attempted while points are a read-only projection.
    #[error("坐标点在{0}模式下只读")]
    PointsReadOnly(Mode),
    /// The operation is only available in another mode.
    #[error("请在{0}模式下使用此功能")]
    WrongMode(Mode),
    /// An image file could not be opened or decoded.
    #[error("无法加载图片 {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A text file could not be read or written.
    #[error("文件读写失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A rendered preview could not be encoded.
    #[error("无法编码图片: {0}")]
    Encode(#[from] image::ImageError),
    /// A snapshot could not be serialized.
    #[error("无法序列化快照: {0}")]
    Serialize(#[from] serde_json::Error),
}
