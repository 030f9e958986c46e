//! Animation clock
//!
//! Drives a marker back and forth along a live Bézier curve. Every tick the
//! clock advances its progress, re-reads the control point positions, and
//! redraws the whole frame through the [`Renderer`].

use crate::bezier::{de_casteljau, sample, ControlPoints};
use crate::easing::Easing;
use crate::error::{AnimationError, CurveError, Result};
use kurve_core::{Point, Scheduler, TimerId};
use kurve_paint::{Anchor, Color, Renderer};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Direction progress is currently moving in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// A progress value bouncing between 0 and 100
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PingPong {
    value: f32,
    direction: Direction,
}

impl PingPong {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self {
            value: value.clamp(Self::MIN, Self::MAX),
            direction: Direction::Forward,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Progress mapped onto 0..1
    pub fn normalized(&self) -> f32 {
        self.value / Self::MAX
    }

    /// Move by `amount` in the current direction, clamping at the bounds and
    /// turning around when one is reached
    pub fn step(&mut self, amount: f32) {
        match self.direction {
            Direction::Forward => self.value += amount,
            Direction::Reverse => self.value -= amount,
        }

        if self.value <= Self::MIN {
            self.value = Self::MIN;
            self.direction = Direction::Forward;
        } else if self.value >= Self::MAX {
            self.value = Self::MAX;
            self.direction = Direction::Reverse;
        }
    }
}

impl Default for PingPong {
    fn default() -> Self {
        Self::new(Self::MIN)
    }
}

/// Clock lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    Running,
}

/// Tuning for an [`AnimationClock`]
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    /// Progress added per tick (progress spans 0..100)
    pub step: f32,
    /// Time between ticks
    pub interval: Duration,
    /// Line segments the curve is drawn with
    pub segments: usize,
    pub easing: Easing,
    pub line_width: f32,
    pub line_color: Color,
    pub marker_anchor: Anchor,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            step: 1.5,
            interval: Duration::from_millis(25),
            segments: 15,
            easing: Easing::EaseInOutQuart,
            line_width: 4.0,
            line_color: Color::from_hex(0xc7c7c7),
            marker_anchor: Anchor::Center,
        }
    }
}

impl ClockConfig {
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(AnimationError::InvalidStep(self.step));
        }
        if self.interval.is_zero() {
            return Err(AnimationError::ZeroInterval);
        }
        if self.segments == 0 {
            return Err(CurveError::ZeroSegments.into());
        }
        Ok(())
    }
}

struct ClockInner {
    state: ClockState,
    progress: PingPong,
    timer: Option<TimerId>,
    ticks: u64,
    last_point: Option<Point>,
}

struct ClockShared {
    scheduler: Rc<dyn Scheduler>,
    points: ControlPoints,
    config: ClockConfig,
    renderer: RefCell<Box<dyn Renderer>>,
    inner: RefCell<ClockInner>,
}

/// Periodic driver of the curve marker.
///
/// Dropping the clock cancels its pending tick.
pub struct AnimationClock {
    shared: Rc<ClockShared>,
}

impl AnimationClock {
    /// Create an idle clock. Configuration errors are reported here, before
    /// any tick can run.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        points: ControlPoints,
        renderer: impl Renderer + 'static,
        config: ClockConfig,
    ) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            points = points.len(),
            step = config.step,
            interval = ?config.interval,
            "animation clock created"
        );

        Ok(Self {
            shared: Rc::new(ClockShared {
                scheduler,
                points,
                config,
                renderer: RefCell::new(Box::new(renderer)),
                inner: RefCell::new(ClockInner {
                    state: ClockState::Idle,
                    progress: PingPong::default(),
                    timer: None,
                    ticks: 0,
                    last_point: None,
                }),
            }),
        })
    }

    /// Start ticking. The first tick runs immediately.
    pub fn start(&self) {
        {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.state == ClockState::Running {
                return;
            }
            inner.state = ClockState::Running;
        }
        tracing::debug!("animation clock started");
        self.shared.tick();
    }

    /// Stop ticking and cancel the pending tick
    pub fn stop(&self) {
        let timer = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.state == ClockState::Idle {
                tracing::trace!("animation clock already idle");
                return;
            }
            inner.state = ClockState::Idle;
            inner.timer.take()
        };
        if let Some(id) = timer {
            self.shared.scheduler.cancel(id);
        }
        tracing::debug!("animation clock stopped");
    }

    pub fn state(&self) -> ClockState {
        self.shared.inner.borrow().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    pub fn progress(&self) -> PingPong {
        self.shared.inner.borrow().progress
    }

    /// Ticks run since creation
    pub fn tick_count(&self) -> u64 {
        self.shared.inner.borrow().ticks
    }

    /// Marker position of the latest tick, before pixel snapping
    pub fn last_point(&self) -> Option<Point> {
        self.shared.inner.borrow().last_point
    }

    /// Whether a tick is waiting on the scheduler
    pub fn has_pending_tick(&self) -> bool {
        self.shared.inner.borrow().timer.is_some()
    }

    pub fn config(&self) -> &ClockConfig {
        &self.shared.config
    }
}

impl ClockShared {
    fn tick(self: &Rc<Self>) {
        let eased = {
            let mut inner = self.inner.borrow_mut();
            if inner.state != ClockState::Running {
                return;
            }
            inner.timer = None;
            inner.progress.step(self.config.step);
            inner.ticks += 1;
            self.config.easing.apply(inner.progress.normalized())
        };

        let positions = self.points.snapshot();
        let point = de_casteljau(&positions, eased);
        let path = sample(&positions, self.config.segments);
        tracing::trace!(t = eased, x = point.x, y = point.y, "clock tick");

        {
            let mut renderer = self.renderer.borrow_mut();
            renderer.clear_all();
            for pair in path.windows(2) {
                renderer.draw_line(
                    pair[0].round(),
                    pair[1].round(),
                    self.config.line_width,
                    self.config.line_color,
                );
            }
            renderer.place_marker(point.round(), self.config.marker_anchor);
        }

        let mut inner = self.inner.borrow_mut();
        inner.last_point = Some(point);
        if inner.state == ClockState::Running {
            inner.timer = Some(self.schedule_tick());
        }
    }

    fn schedule_tick(self: &Rc<Self>) -> TimerId {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule_once(
            self.config.interval,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.tick();
                }
            }),
        )
    }
}

impl Drop for ClockShared {
    fn drop(&mut self) {
        if let Some(id) = self.inner.get_mut().timer.take() {
            self.scheduler.cancel(id);
        }
    }
}
