//! Kurve Image
//!
//! Image loading and sprite sheet slicing.
//!
//! # Example
//!
//! ```ignore
//! use kurve_image::{FrameSize, RgbaSource, SequenceRange, SpriteSheet};
//!
//! let sheet = SpriteSheet::load(RgbaSource, "assets/walk.png")?;
//! // the whole second row of 100x100 frames
//! let frames = sheet.sequence(FrameSize::square(100), SequenceRange::row(2))?;
//! ```

mod error;
mod sheet;
mod source;

pub use error::{ImageError, Result, SheetError};
pub use sheet::{FrameSize, GridPosition, SequenceRange, SpriteSheet};
pub use source::{ImageSource, PixelRect, RgbaHandle, RgbaSource};
