//! Kurve Paint
//!
//! The drawing surface the sandbox renders into.
//!
//! # Features
//!
//! - RGBA colors with hex parsing
//! - The [`Renderer`] interface consumed by the animation clock
//! - [`RecordingRenderer`] for headless assertions
//! - [`RasterRenderer`] for software rendering into an RGBA image

pub mod color;
pub mod raster;
pub mod renderer;

pub use color::Color;
pub use raster::RasterRenderer;
pub use renderer::{Anchor, DrawCommand, RecordingRenderer, Renderer};
