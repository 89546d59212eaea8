//! Scripted sessions: replay pointer events and toolbar commands without a UI.
//!
//! A script is one step per line; blank lines and lines starting with `#` are
//! skipped. Relative paths resolve against the script's directory. Dialog
//! answers are given inline and fed to the command through [`ScriptHost`]; a
//! command that asks for more answers than the step supplies sees a cancelled
//! dialog.
//!
//! ```text
//! background bg.png
//! resize 800 600
//! click 100 100
//! add-overlay logo.png
//! mode editing
//! down 400 300
//! move 420 310
//! up 420 310
//! set-position 12 -7
//! save out.txt
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use picker::commands;
use picker::engine::{Action, EngineCore};
use picker::host::{FileFilter, Host, NoticeKind};
use picker::input::{Button, Key, Mode};
use picker::scene::OverlayEntry;
use picker::viewport::{BgPoint, DisplayPoint};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown step `{step}`")]
    UnknownStep { line: usize, step: String },
    #[error("line {line}: {message}")]
    BadArguments { line: usize, message: String },
}

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Background(PathBuf),
    Resize(u32, u32),
    Mode(Mode),
    Click(DisplayPoint),
    Down(DisplayPoint),
    Move(DisplayPoint),
    Up(DisplayPoint),
    Key(String),
    AddOverlay(PathBuf),
    BatchAdd(Vec<PathBuf>),
    SelectOverlay(usize),
    SetPosition(Vec<String>),
    Lock,
    RemoveOverlay,
    Rename(String),
    BringToTop,
    Import(PathBuf),
    AddPoint(Vec<String>),
    EditPoint(usize, Vec<String>),
    RemovePoint(usize),
    ClearPoints,
    SelectPoint(usize),
    Save(PathBuf),
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a whole script. Relative paths are joined onto `base`.
///
/// # Errors
///
/// Returns [`ScriptError`] naming the first line that cannot be parsed.
pub(crate) fn parse_script(text: &str, base: &Path) -> Result<Vec<Step>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| parse_step(line, content, base))
        .collect()
}

fn parse_step(line: usize, content: &str, base: &Path) -> Result<Step, ScriptError> {
    let (word, rest) = content.split_once(char::is_whitespace).unwrap_or((content, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();
    let bad = |message: &str| ScriptError::BadArguments { line, message: format!("{word}: {message}") };
    let path = || if rest.is_empty() { Err(bad("expected a path")) } else { Ok(base.join(rest)) };
    let point = || match args.as_slice() {
        [x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => Ok(DisplayPoint::new(x, y)),
            _ => Err(bad("coordinates must be integers")),
        },
        _ => Err(bad("expected X Y")),
    };
    let index = || match args.as_slice() {
        [i, ..] => i.parse::<usize>().map_err(|_| bad("index must be a non-negative integer")),
        [] => Err(bad("expected an index")),
    };
    let answers = |skip: usize| args.iter().skip(skip).map(|s| (*s).to_owned()).collect::<Vec<_>>();

    let step = match word {
        "background" => Step::Background(path()?),
        "resize" => match args.as_slice() {
            [w, h] => match (w.parse(), h.parse()) {
                (Ok(w), Ok(h)) => Step::Resize(w, h),
                _ => return Err(bad("sizes must be non-negative integers")),
            },
            _ => return Err(bad("expected W H")),
        },
        "mode" => match rest {
            "picking" | "coordinate" => Step::Mode(Mode::CoordinatePicking),
            "editing" | "overlay" => Step::Mode(Mode::OverlayEditing),
            _ => return Err(bad("expected `picking` or `editing`")),
        },
        "click" => Step::Click(point()?),
        "down" => Step::Down(point()?),
        "move" => Step::Move(point()?),
        "up" => Step::Up(point()?),
        "key" if !rest.is_empty() => Step::Key(rest.to_owned()),
        "key" => return Err(bad("expected a key name")),
        "add-overlay" => Step::AddOverlay(path()?),
        "batch-add" => Step::BatchAdd(args.iter().map(|p| base.join(p)).collect()),
        "select-overlay" => Step::SelectOverlay(index()?),
        "set-position" => Step::SetPosition(answers(0)),
        "lock" => Step::Lock,
        "remove-overlay" => Step::RemoveOverlay,
        "rename" => Step::Rename(rest.to_owned()),
        "bring-to-top" => Step::BringToTop,
        "import" => Step::Import(path()?),
        "add-point" => Step::AddPoint(answers(0)),
        "edit-point" => Step::EditPoint(index()?, answers(1)),
        "remove-point" => Step::RemovePoint(index()?),
        "clear-points" => Step::ClearPoints,
        "select-point" => Step::SelectPoint(index()?),
        "save" => Step::Save(path()?),
        _ => return Err(ScriptError::UnknownStep { line, step: word.to_owned() }),
    };
    Ok(step)
}

// =============================================================================
// HOST
// =============================================================================

/// A [`Host`] whose dialogs are answered from queues filled by each step.
#[derive(Debug, Default)]
pub(crate) struct ScriptHost {
    files: VecDeque<PathBuf>,
    batches: VecDeque<Vec<PathBuf>>,
    answers: VecDeque<String>,
    pub(crate) notices: Vec<(NoticeKind, String)>,
    pub(crate) status: Option<String>,
    pub(crate) overlay_rows: Vec<String>,
    pub(crate) point_rows: Vec<String>,
}

impl ScriptHost {
    /// Drop answers a step did not use so they cannot leak into the next one.
    fn clear_answers(&mut self) {
        self.files.clear();
        self.batches.clear();
        self.answers.clear();
    }
}

impl Host for ScriptHost {
    fn pick_open_file(&mut self, title: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        let path = self.files.pop_front()?;
        if !filters.iter().any(|f| f.matches(&path)) {
            tracing::debug!(%title, path = %path.display(), "file does not match dialog filter");
        }
        Some(path)
    }

    fn pick_open_files(&mut self, _title: &str, _filters: &[FileFilter]) -> Vec<PathBuf> {
        self.batches.pop_front().unwrap_or_default()
    }

    fn pick_save_file(&mut self, _title: &str, default_ext: &str) -> Option<PathBuf> {
        let path = self.files.pop_front()?;
        if path.extension().is_some() {
            return Some(path);
        }
        Some(path.with_extension(default_ext.trim_start_matches('.')))
    }

    fn notify(&mut self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Info => tracing::info!(message, "notice"),
            NoticeKind::Warning => tracing::warn!(message, "notice"),
            NoticeKind::Error => tracing::error!(message, "notice"),
        }
        self.notices.push((kind, message.to_owned()));
    }

    fn prompt_integer(&mut self, _label: &str, _initial: i32) -> Option<String> {
        self.answers.pop_front()
    }

    fn prompt_string(&mut self, _label: &str, _initial: &str) -> Option<String> {
        self.answers.pop_front()
    }

    fn show_overlay_list(&mut self, entries: &[OverlayEntry]) {
        self.overlay_rows = entries.iter().map(ToString::to_string).collect();
    }

    fn show_point_list(&mut self, entries: &[BgPoint]) {
        self.point_rows = entries.iter().map(ToString::to_string).collect();
    }

    fn show_status(&mut self, text: &str) {
        self.status = Some(text.to_owned());
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Replay `steps` against the engine, returning every action emitted.
pub(crate) fn run(core: &mut EngineCore, host: &mut ScriptHost, steps: &[Step]) -> Vec<Action> {
    let mut actions = Vec::new();
    for step in steps {
        tracing::debug!(?step, "script step");
        actions.extend(apply(core, host, step));
        host.clear_answers();
    }
    actions
}

fn apply(core: &mut EngineCore, host: &mut ScriptHost, step: &Step) -> Vec<Action> {
    match step {
        Step::Background(path) => {
            host.files.push_back(path.clone());
            commands::load_background(core, host)
        }
        Step::Resize(w, h) => core.set_viewport(*w, *h),
        Step::Mode(mode) if *mode != core.mode() => commands::toggle_mode(core, host),
        Step::Mode(_) => Vec::new(),
        Step::Click(at) => {
            let mut actions = core.on_pointer_down(*at, Button::Primary);
            actions.extend(core.on_pointer_up(*at, Button::Primary));
            actions
        }
        Step::Down(at) => core.on_pointer_down(*at, Button::Primary),
        Step::Move(at) => core.on_pointer_move(*at),
        Step::Up(at) => core.on_pointer_up(*at, Button::Primary),
        Step::Key(name) => core.on_key_down(&Key(name.clone())),
        Step::AddOverlay(path) => {
            host.files.push_back(path.clone());
            commands::add_overlay(core, host)
        }
        Step::BatchAdd(paths) => {
            host.batches.push_back(paths.clone());
            commands::batch_add_overlays(core, host)
        }
        Step::SelectOverlay(index) => commands::select_overlay_from_list(core, host, *index),
        Step::SetPosition(answers) => {
            host.answers.extend(answers.iter().cloned());
            commands::set_overlay_position(core, host)
        }
        Step::Lock => commands::toggle_overlay_lock(core, host),
        Step::RemoveOverlay => commands::remove_selected_overlay(core, host),
        Step::Rename(name) => {
            host.answers.push_back(name.clone());
            commands::rename_selected_overlay(core, host)
        }
        Step::BringToTop => commands::bring_overlays_to_top(core),
        Step::Import(path) => {
            host.files.push_back(path.clone());
            commands::import_coordinates(core, host)
        }
        Step::AddPoint(answers) => {
            host.answers.extend(answers.iter().cloned());
            commands::add_point(core, host)
        }
        Step::EditPoint(index, answers) => {
            host.answers.extend(answers.iter().cloned());
            commands::edit_point(core, host, Some(*index))
        }
        Step::RemovePoint(index) => commands::remove_point(core, host, Some(*index)),
        Step::ClearPoints => commands::clear_points(core, host),
        Step::SelectPoint(index) => {
            commands::select_point(core, host, *index);
            Vec::new()
        }
        Step::Save(path) => {
            host.files.push_back(path.clone());
            commands::save_data(core, host);
            Vec::new()
        }
    }
}
