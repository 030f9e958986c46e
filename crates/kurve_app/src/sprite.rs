//! Headless sprite sandbox
//!
//! Slices a sheet row into a looping sequence, optionally queues a second row
//! and a still frame behind it, and plays everything on virtual time while
//! logging each displayed frame.

use crate::config::SandboxConfig;
use crate::runner::{drive, Pacing};
use anyhow::{Context, Result};
use kurve_animation::{FrameSequence, SpritePlayer};
use kurve_core::VirtualScheduler;
use kurve_image::{FrameSize, GridPosition, RgbaHandle, RgbaSource, SequenceRange, SpriteSheet};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// A sheet frame tagged with where it came from
#[derive(Clone)]
pub struct SpriteFrame {
    pub label: Rc<str>,
    pub index: usize,
    pub image: RgbaHandle,
}

/// Parameters of one sprite run
#[derive(Clone, Debug, Default)]
pub struct SpriteRun {
    pub sheet: Option<PathBuf>,
    pub row: Option<u32>,
    pub chain_row: Option<u32>,
    /// Still frame shown once the queue is through, 0-indexed
    pub still: Option<GridPosition>,
    pub duration: Option<Duration>,
    pub pacing: Pacing,
}

/// What a finished run showed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteReport {
    pub frames_shown: usize,
    /// Label and index of the frame left on display
    pub last_frame: Option<(String, usize)>,
    /// Whether the queue behind the main row was worked through
    pub queue_finished: bool,
}

pub fn run_sprite(config: &SandboxConfig, run: &SpriteRun) -> Result<SpriteReport> {
    let path = run
        .sheet
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.sprite.sheet));
    let sheet = SpriteSheet::load(RgbaSource, &path)
        .with_context(|| format!("Failed to load sprite sheet {}", path.display()))?;
    let (width, height) = sheet.dimensions();
    tracing::info!(path = %path.display(), width, height, "sprite sheet loaded");
    play_sheet(config, run, &sheet)
}

/// Play `sheet` as configured
pub fn play_sheet(
    config: &SandboxConfig,
    run: &SpriteRun,
    sheet: &SpriteSheet<RgbaSource>,
) -> Result<SpriteReport> {
    let settings = &config.sprite;
    let size = FrameSize::new(settings.frame_width, settings.frame_height);
    let row = run.row.unwrap_or(settings.row);
    let duration = run
        .duration
        .unwrap_or(Duration::from_millis(settings.duration_ms));

    let main = row_sequence(sheet, size, row)?
        .with_loop(settings.looping)
        .with_fps(settings.fps);
    let hold = main.frame_interval();

    let scheduler = Rc::new(VirtualScheduler::new());
    let shown = Rc::new(RefCell::new(SpriteReport::default()));
    let log = shown.clone();
    let player = SpritePlayer::new(scheduler.clone(), move |frame: &SpriteFrame| {
        let mut log = log.borrow_mut();
        log.frames_shown += 1;
        log.last_frame = Some((frame.label.to_string(), frame.index));
        tracing::info!(sequence = %frame.label, frame = frame.index, "frame shown");
    });

    let chain_row = run.chain_row.or(settings.chain_row);
    let queued = chain_row.is_some() || run.still.is_some();
    let finished = Rc::new(Cell::new(false));

    if let Some(chain_row) = chain_row {
        player.chain(row_sequence(sheet, size, chain_row)?.with_fps(settings.fps), None);
    }
    if let Some(position) = run.still {
        let image = sheet
            .frame(size, position)
            .with_context(|| format!("Invalid still frame {position:?}"))?;
        let still = SpriteFrame {
            label: Rc::from("still"),
            index: 0,
            image,
        };
        player.chain_image(still, Some(hold));
    }
    if queued {
        let flag = finished.clone();
        player.chain_callback(
            move || {
                flag.set(true);
                tracing::info!("sprite queue finished");
            },
            None,
        );
    }

    if queued && main.looping() {
        player.play_for(main, duration / 2);
    } else {
        player.play(main);
    }
    drive(&scheduler, duration, run.pacing);
    player.stop();

    let mut report = shown.borrow().clone();
    report.queue_finished = finished.get();
    Ok(report)
}

fn row_sequence(
    sheet: &SpriteSheet<RgbaSource>,
    size: FrameSize,
    row: u32,
) -> Result<FrameSequence<SpriteFrame>> {
    let label: Rc<str> = Rc::from(format!("row {row}"));
    let frames = sheet
        .sequence(size, SequenceRange::row(row))
        .with_context(|| format!("Failed to slice row {row}"))?
        .into_iter()
        .enumerate()
        .map(|(index, image)| SpriteFrame {
            label: label.clone(),
            index,
            image,
        })
        .collect();
    FrameSequence::new(frames).with_context(|| format!("Row {row} has no frames"))
}
