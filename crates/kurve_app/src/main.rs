//! Kurve sandbox CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kurve_app::{
    run_curve, run_sprite, CurveRun, Pacing, SandboxConfig, ScriptedDrag, SpriteRun, CONFIG_FILE,
};
use kurve_core::Point;
use kurve_image::GridPosition;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Eased Bézier curves and sprite animation, run headless
#[derive(Parser, Debug)]
#[command(name = "kurve")]
#[command(about = "Eased Bézier curves and sprite animation, run headless")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate a marker along a curve through randomly placed points
    Curve(CurveArgs),

    /// Play frames cut from a sprite sheet
    Sprite(SpriteArgs),

    /// Write a configuration file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct CurveArgs {
    /// Number of control points, start and end included
    #[arg(short = 'n', long)]
    points: Option<usize>,

    /// Placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Virtual run time in milliseconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Pace virtual time with the wall clock
    #[arg(long)]
    realtime: bool,

    /// Drag a control point during the run: INDEX:X,Y
    #[arg(long, value_parser = parse_drag)]
    drag: Option<ScriptedDrag>,

    /// Write the final frame to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SpriteArgs {
    /// Sprite sheet image
    #[arg(short, long)]
    sheet: Option<PathBuf>,

    /// Row to play, counted from 1
    #[arg(long)]
    row: Option<u32>,

    /// Row to play once after the main row, counted from 1
    #[arg(long)]
    chain_row: Option<u32>,

    /// Still frame to end on: ROW,COLUMN counted from 0
    #[arg(long, value_parser = parse_grid)]
    still: Option<GridPosition>,

    /// Virtual run time in milliseconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Pace virtual time with the wall clock
    #[arg(long)]
    realtime: bool,
}

fn pacing(realtime: bool) -> Pacing {
    if realtime {
        Pacing::Realtime
    } else {
        Pacing::Immediate
    }
}

fn parse_pair<T: std::str::FromStr>(text: &str) -> Result<(T, T), String> {
    let (a, b) = text
        .split_once(',')
        .ok_or_else(|| format!("expected two comma separated values, got {text:?}"))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("invalid number {value:?}"))
    };
    Ok((parse(a)?, parse(b)?))
}

fn parse_drag(text: &str) -> Result<ScriptedDrag, String> {
    let (index, target) = text
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:X,Y, got {text:?}"))?;
    let point = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid point index {index:?}"))?;
    let (x, y) = parse_pair::<f32>(target)?;
    Ok(ScriptedDrag {
        point,
        to: Point::new(x, y),
    })
}

fn parse_grid(text: &str) -> Result<GridPosition, String> {
    let (row, column) = parse_pair::<u32>(text)?;
    Ok(GridPosition::new(row, column))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            SandboxConfig::default().save(&cli.config, force)?;
            tracing::info!(path = %cli.config.display(), "configuration written");
        }
        Commands::Curve(args) => {
            let config = SandboxConfig::load(&cli.config)?;
            let run = CurveRun {
                points: args.points,
                seed: args.seed,
                duration: args.duration.map(Duration::from_millis),
                pacing: pacing(args.realtime),
                drag: args.drag,
                output: args.output,
            };
            let report = run_curve(&config, &run).context("Curve run failed")?;
            tracing::info!(
                seed = report.seed,
                ticks = report.ticks,
                progress = report.progress,
                marker = ?report.marker,
                "curve run complete"
            );
            for (index, point) in report.control_points.iter().enumerate() {
                tracing::info!(index, x = point.x, y = point.y, "control point");
            }
        }
        Commands::Sprite(args) => {
            let config = SandboxConfig::load(&cli.config)?;
            let run = SpriteRun {
                sheet: args.sheet,
                row: args.row,
                chain_row: args.chain_row,
                still: args.still,
                duration: args.duration.map(Duration::from_millis),
                pacing: pacing(args.realtime),
            };
            let report = run_sprite(&config, &run).context("Sprite run failed")?;
            tracing::info!(
                frames = report.frames_shown,
                last = ?report.last_frame,
                queue_finished = report.queue_finished,
                "sprite run complete"
            );
        }
    }

    Ok(())
}
