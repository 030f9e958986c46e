//! Kurve sandbox
//!
//! Headless runners behind the `kurve` binary: the eased Bézier curve with
//! draggable control points, and sprite sheet playback.

pub mod config;
pub mod curve;
pub mod runner;
pub mod sprite;

pub use config::{SandboxConfig, CONFIG_FILE};
pub use curve::{run_curve, CurveReport, CurveRun, ScriptedDrag};
pub use runner::{drive, Pacing};
pub use sprite::{play_sheet, run_sprite, SpriteFrame, SpriteReport, SpriteRun};
