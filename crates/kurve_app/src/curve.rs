//! Headless curve sandbox
//!
//! Scatters drag points over the container, runs the animation clock on
//! virtual time, optionally replays a scripted drag, and rasterizes the last
//! frame.

use crate::config::SandboxConfig;
use crate::runner::{drive, Pacing};
use anyhow::{Context, Result};
use kurve_animation::{AnimationClock, ControlPoints};
use kurve_core::events::event_types;
use kurve_core::{Event, FixedPointer, Point, PositionProvider, Scheduler, Size, VirtualScheduler};
use kurve_paint::{Color, RasterRenderer};
use kurve_widgets::{DragLayer, DragPointConfig, WidgetId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Distance kept between random placements and the container edge
const EDGE_MARGIN: f32 = 10.0;
/// Width of the bands the start and end points are placed in
const END_BAND: f32 = 200.0;

/// Pick up one control point and carry it somewhere else
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedDrag {
    /// Index of the control point, 0 is the start point
    pub point: usize,
    pub to: Point,
}

/// Parameters of one curve run
#[derive(Clone, Debug, Default)]
pub struct CurveRun {
    pub points: Option<usize>,
    pub seed: Option<u64>,
    pub duration: Option<Duration>,
    pub pacing: Pacing,
    pub drag: Option<ScriptedDrag>,
    pub output: Option<PathBuf>,
}

/// What a finished run looked like
#[derive(Clone, Debug)]
pub struct CurveReport {
    pub seed: u64,
    pub ticks: u64,
    /// Marker position of the final frame
    pub marker: Option<Point>,
    pub progress: f32,
    /// Control point positions at the end of the run
    pub control_points: Vec<Point>,
}

/// Random control point positions: the first in the left band, the last in
/// the right band, the rest anywhere
pub fn place_points(rng: &mut impl Rng, count: usize, container: Size) -> Vec<Point> {
    let right = container.width - EDGE_MARGIN;
    let bottom = container.height - EDGE_MARGIN;
    let left_band = EDGE_MARGIN..=END_BAND.min(right);
    let right_band = (container.width - END_BAND).max(EDGE_MARGIN)..=right;

    (0..count)
        .map(|index| {
            let x = if index == 0 {
                rng.random_range(left_band.clone())
            } else if index + 1 == count {
                rng.random_range(right_band.clone())
            } else {
                rng.random_range(EDGE_MARGIN..=right)
            };
            Point::new(x, rng.random_range(EDGE_MARGIN..=bottom))
        })
        .collect()
}

pub fn run_curve(config: &SandboxConfig, run: &CurveRun) -> Result<CurveReport> {
    let count = run.points.unwrap_or(config.curve.points);
    if count < 2 {
        anyhow::bail!("A curve needs at least 2 points, got {count}");
    }
    let container = Size::new(config.window.width as f32, config.window.height as f32);
    if container.width < END_BAND + 2.0 * EDGE_MARGIN || container.height < 2.0 * EDGE_MARGIN {
        anyhow::bail!(
            "Window {}x{} is too small for the sandbox",
            config.window.width,
            config.window.height
        );
    }
    let clock_config = config.clock.to_clock_config()?;
    let duration = run
        .duration
        .unwrap_or(Duration::from_millis(config.curve.duration_ms));

    let seed = run
        .seed
        .or(config.curve.seed)
        .unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(points = count, seed, "placing control points");

    let scheduler = Rc::new(VirtualScheduler::new());
    let pointer = Rc::new(FixedPointer::new(container));
    let mut layer = DragLayer::new(pointer.clone(), scheduler.clone());
    let handle = DragPointConfig {
        size: Size::square(config.curve.point_size),
        ..DragPointConfig::default()
    };
    let ids: Vec<WidgetId> = place_points(&mut rng, count, container)
        .into_iter()
        .map(|center| layer.add(center, handle))
        .collect();
    let layer = Rc::new(layer);

    let canvas = Rc::new(RefCell::new(
        RasterRenderer::new(config.window.width, config.window.height)
            .with_marker(Size::square(config.curve.point_size), Color::BLUE),
    ));
    let controls = ControlPoints::new(layer.providers()).context("Invalid control points")?;
    let clock = AnimationClock::new(scheduler.clone(), controls, canvas.clone(), clock_config)
        .context("Invalid clock configuration")?;

    if let Some(drag) = run.drag {
        let id = ids.get(drag.point).copied().with_context(|| {
            format!("Drag point {} does not exist ({count} points)", drag.point)
        })?;
        script_drag(&scheduler, &layer, &pointer, id, drag.to, duration)?;
    }

    clock.start();
    let fired = drive(&scheduler, duration, run.pacing);
    clock.stop();
    tracing::debug!(fired, "curve run finished");

    let report = CurveReport {
        seed,
        ticks: clock.tick_count(),
        marker: clock.last_point(),
        progress: clock.progress().value(),
        control_points: layer.points().map(|point| point.position()).collect(),
    };

    if let Some(path) = &run.output {
        canvas
            .borrow()
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "final frame written");
    }

    Ok(report)
}

/// Press on the point a quarter into the run, carry it to `to` by the half,
/// and release it at three quarters
fn script_drag(
    scheduler: &Rc<VirtualScheduler>,
    layer: &Rc<DragLayer>,
    pointer: &Rc<FixedPointer>,
    id: WidgetId,
    to: Point,
    duration: Duration,
) -> Result<()> {
    let from = layer
        .get(id)
        .map(|point| point.position())
        .context("Drag point vanished")?;
    let target = id.event_target();
    let press_at = duration / 4;
    let arrive_at = duration / 2;
    let release_at = duration * 3 / 4;
    let step = Duration::from_millis(25);

    {
        let layer = layer.clone();
        let pointer = pointer.clone();
        scheduler.schedule_once(
            press_at,
            Box::new(move || {
                pointer.move_to(from);
                layer.dispatch(&mut Event::pointer(
                    event_types::POINTER_DOWN,
                    target,
                    from.x,
                    from.y,
                ));
            }),
        );
    }

    let span = (arrive_at - press_at).as_secs_f32();
    let mut at = press_at + step;
    while at <= arrive_at {
        let t = if span > 0.0 {
            (at - press_at).as_secs_f32() / span
        } else {
            1.0
        };
        let pointer = pointer.clone();
        scheduler.schedule_once(at, Box::new(move || pointer.move_to(Point::lerp(t, from, to))));
        at += step;
    }
    {
        let pointer = pointer.clone();
        scheduler.schedule_once(arrive_at, Box::new(move || pointer.move_to(to)));
    }

    let layer = layer.clone();
    scheduler.schedule_once(
        release_at,
        Box::new(move || {
            layer.dispatch(&mut Event::pointer(event_types::POINTER_UP, target, to.x, to.y));
        }),
    );
    tracing::debug!(?id, from = ?from, to = ?to, "scripted drag queued");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_respects_bands() {
        let container = Size::new(700.0, 500.0);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let points = place_points(&mut rng, 5, container);
            assert_eq!(points.len(), 5);
            assert!((10.0..=200.0).contains(&points[0].x));
            assert!((500.0..=690.0).contains(&points[4].x));
            for point in &points {
                assert!((10.0..=690.0).contains(&point.x));
                assert!((10.0..=490.0).contains(&point.y));
            }
        }
    }

    #[test]
    fn test_placement_is_reproducible() {
        let container = Size::new(700.0, 500.0);
        let a = place_points(&mut StdRng::seed_from_u64(9), 4, container);
        let b = place_points(&mut StdRng::seed_from_u64(9), 4, container);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_point_rejected_before_running() {
        let run = CurveRun {
            points: Some(1),
            ..CurveRun::default()
        };
        assert!(run_curve(&SandboxConfig::default(), &run).is_err());
    }
}
