//! Collaborator trait implemented by the UI layer.
//!
//! The core never opens windows or dialogs itself. Every file choice, message
//! box, text prompt and list refresh goes through [`Host`], so the same command
//! code runs under a desktop shell, a scripted session or a test double.

use std::path::PathBuf;

use crate::consts::{IMAGE_EXTENSIONS, TEXT_EXTENSIONS};
use crate::scene::OverlayEntry;
use crate::viewport::BgPoint;

/// Severity of a host notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A named group of file extensions for a file dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub label: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const IMAGES: Self = Self { label: "图片文件", extensions: IMAGE_EXTENSIONS };
    pub const TEXT: Self = Self { label: "文本文件", extensions: TEXT_EXTENSIONS };

    /// Whether `path` has one of this filter's extensions (case-insensitive).
    #[must_use]
    pub fn matches(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
    }
}

/// Services the UI provides to the picker.
///
/// Dialog methods return `None` (or an empty list) when the user cancels.
pub trait Host {
    /// Ask for one existing file.
    fn pick_open_file(&mut self, title: &str, filters: &[FileFilter]) -> Option<PathBuf>;

    /// Ask for any number of existing files.
    fn pick_open_files(&mut self, title: &str, filters: &[FileFilter]) -> Vec<PathBuf>;

    /// Ask for a destination file. `default_ext` is appended when the user gives none.
    fn pick_save_file(&mut self, title: &str, default_ext: &str) -> Option<PathBuf>;

    /// Show a message box.
    fn notify(&mut self, kind: NoticeKind, message: &str);

    /// Ask for an integer. Returns the raw text; the caller validates it.
    fn prompt_integer(&mut self, label: &str, initial: i32) -> Option<String>;

    /// Ask for a line of text.
    fn prompt_string(&mut self, label: &str, initial: &str) -> Option<String>;

    /// Replace the contents of the overlay list widget.
    fn show_overlay_list(&mut self, entries: &[OverlayEntry]);

    /// Replace the contents of the point list widget.
    fn show_point_list(&mut self, entries: &[BgPoint]);

    /// Update the status line under the canvas.
    fn show_status(&mut self, _text: &str) {}
}
