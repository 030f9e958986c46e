//! Kurve Animation System
//!
//! Eased curve traversal and sprite-sheet frame sequencing.
//!
//! # Features
//!
//! - **Easing**: polynomial in/out curves, quartic in-out by default
//! - **Bézier Curves**: n-point evaluation with de Casteljau's algorithm and
//!   polyline tessellation
//! - **Animation Clock**: ping-pong traversal of a live curve, redrawn every tick
//! - **Sprite Player**: frame sequences with looping, queueing, and timed jumps

pub mod bezier;
pub mod clock;
pub mod easing;
pub mod error;
pub mod sprite;

pub use bezier::{evaluate, tessellate, BezierCurve, ControlPoints};
pub use clock::{AnimationClock, ClockConfig, ClockState, Direction, PingPong};
pub use easing::{ease, Easing};
pub use error::{AnimationError, CurveError, Result};
pub use sprite::{FrameSequence, FrameSink, QueueEntry, QueueItem, SpritePlayer};
