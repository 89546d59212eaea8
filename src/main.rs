mod config;
mod script;


use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use picker::background::{Background, open_image};
use picker::commands::overlay_name;
use picker::engine::EngineCore;
use picker::error::PickerError;
use picker::export::{self, Snapshot};
use picker::hit::hit_test;
use picker::host::NoticeKind;
use picker::points::{parse_import, parse_line};
use picker::render;
use picker::viewport::{BgPoint, DisplayPoint, Viewport};

use crate::config::PickerConfig;
use crate::script::{ScriptError, ScriptHost};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Picker(#[from] PickerError),
    #[error("script failed: {0}")]
    Script(#[from] ScriptError),
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Parser, Debug)]
#[command(name = "coordpick", about = "Pick background coordinates and place overlay images")]
struct Cli {
    /// Display box size as WxH. Defaults to COORDPICK_BOX_WIDTH x COORDPICK_BOX_HEIGHT.
    #[arg(long = "box", global = true, value_parser = parse_box)]
    box_size: Option<(u32, u32)>,

    /// Radius of point markers in rendered previews. Defaults to COORDPICK_MARKER_RADIUS.
    #[arg(long, global = true)]
    marker_radius: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy)]
struct CliContext {
    box_size: (u32, u32),
    marker_radius: u32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how an image fits the display box.
    Fit {
        #[arg(long)]
        image: PathBuf,
    },
    /// Map a display point to the background and read its pixel.
    Probe {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, value_parser = parse_display_point, help = "Display point as X,Y")]
        at: DisplayPoint,
    },
    /// Write the coordinate report for a background, overlays and points.
    Export(ExportArgs),
    /// Replay a session script.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    background: PathBuf,

    #[arg(long = "overlay", value_parser = parse_overlay_spec, help = "Overlay image as PATH or PATH@X,Y")]
    overlays: Vec<OverlaySpec>,

    #[arg(long, help = "Coordinate file to import")]
    points: Option<PathBuf>,

    #[arg(long, help = "Report destination; stdout when omitted")]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long, help = "Also write a PNG preview")]
    render: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    script: PathBuf,

    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long, help = "Write a PNG preview of the final scene")]
    render: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OverlaySpec {
    path: PathBuf,
    at: Option<BgPoint>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = PickerConfig::from_env().with_overrides(cli.box_size, cli.marker_radius);
    let ctx = CliContext { box_size: (config.box_width, config.box_height), marker_radius: config.marker_radius };
    tracing::debug!(?ctx, "starting");

    match cli.command {
        Command::Fit { image } => run_fit(&ctx, &image),
        Command::Probe { image, at } => run_probe(&ctx, &image, at),
        Command::Export(args) => run_export(&ctx, &args),
        Command::Run(args) => run_script(&ctx, &args),
    }
}

fn run_fit(ctx: &CliContext, image: &Path) -> Result<(), CliError> {
    let background = Background::open(image)?;
    let (w, h) = background.size();
    let viewport = Viewport::fit(w, h, ctx.box_size.0, ctx.box_size.1);
    println!("natural: {w} x {h}");
    println!("display: {} x {}", viewport.display.0, viewport.display.1);
    println!("offset: ({}, {})", viewport.offset.x, viewport.offset.y);
    println!("scale: {:.4} x {:.4}", viewport.scale_x, viewport.scale_y);
    Ok(())
}

fn run_probe(ctx: &CliContext, image: &Path, at: DisplayPoint) -> Result<(), CliError> {
    let mut core = EngineCore::new(ctx.box_size.0, ctx.box_size.1);
    core.load_background(Background::open(image)?);
    let mapped = core.scene.viewport().to_background(at);
    match hit_test(&core.scene, at).and_then(|hit| core.readout(hit.at)) {
        Some(readout) => println!("{readout}"),
        None => println!("{mapped} outside image"),
    }
    Ok(())
}

fn run_export(ctx: &CliContext, args: &ExportArgs) -> Result<(), CliError> {
    let mut core = EngineCore::new(ctx.box_size.0, ctx.box_size.1);
    core.load_background(Background::open(&args.background)?);

    for spec in &args.overlays {
        let image = open_image(&spec.path)?.to_rgba8();
        core.scene.add_overlay(image, overlay_name(&spec.path), spec.at)?;
    }
    if let Some(path) = &args.points {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io { path: path.clone(), source })?;
        let report = parse_import(&text);
        if report.skipped > 0 {
            eprintln!("skipped {} unparseable line(s) in {}", report.skipped, path.display());
        }
        core.scene.points_mut()?.extend(report.points);
    }

    emit(&core, args.json, args.output.as_deref())?;
    if let Some(path) = &args.render {
        render::write_preview(&core.scene, ctx.marker_radius, path)?;
    }
    Ok(())
}

fn run_script(ctx: &CliContext, args: &RunArgs) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.script)
        .map_err(|source| CliError::Io { path: args.script.clone(), source })?;
    let base = args.script.parent().unwrap_or_else(|| Path::new("."));
    let steps = script::parse_script(&text, base)?;

    let mut core = EngineCore::new(ctx.box_size.0, ctx.box_size.1);
    let mut host = ScriptHost::default();
    let actions = script::run(&mut core, &mut host, &steps);
    tracing::info!(steps = steps.len(), actions = actions.len(), "script finished");

    for (kind, message) in &host.notices {
        let tag = match kind {
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        eprintln!("[{tag}] {message}");
    }
    if let Some(status) = &host.status {
        eprintln!("status: {status}");
    }

    if core.scene.has_background() {
        emit(&core, args.json, None)?;
    }
    if let Some(path) = &args.render {
        render::write_preview(&core.scene, ctx.marker_radius, path)?;
    }
    Ok(())
}

/// Print the report, or write it to `output`.
fn emit(core: &EngineCore, json: bool, output: Option<&Path>) -> Result<(), CliError> {
    let text = if json {
        let mut text = Snapshot::from_scene(&core.scene).ok_or(PickerError::NoBackground)?.to_json()?;
        text.push('\n');
        text
    } else {
        export::report(&core.scene).ok_or(PickerError::NoBackground)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, &text).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

// =============================================================================
// ARGUMENT PARSERS
// =============================================================================

fn parse_box(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw.split_once(['x', 'X']).ok_or_else(|| format!("expected WxH, got `{raw}`"))?;
    match (w.trim().parse(), h.trim().parse()) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(format!("box size must be two non-negative integers, got `{raw}`")),
    }
}

fn parse_display_point(raw: &str) -> Result<DisplayPoint, String> {
    parse_line(raw).map(|p| DisplayPoint::new(p.x, p.y)).ok_or_else(|| format!("expected X,Y, got `{raw}`"))
}

fn parse_overlay_spec(raw: &str) -> Result<OverlaySpec, String> {
    if raw.is_empty() {
        return Err("overlay path is empty".to_owned());
    }
    let spec = raw
        .rsplit_once('@')
        .and_then(|(path, at)| Some(OverlaySpec { path: PathBuf::from(path), at: Some(parse_line(at)?) }))
        .unwrap_or_else(|| OverlaySpec { path: PathBuf::from(raw), at: None });
    Ok(spec)
}
