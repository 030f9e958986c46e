//! Sprite sheet slicing
//!
//! A sheet is a grid of equally sized frames. Single frames are addressed by
//! a 0-indexed grid position; sequences by a 1-indexed row and an inclusive,
//! 1-indexed frame range along it.

use crate::error::{Result, SheetError};
use crate::source::{ImageSource, PixelRect};
use std::path::Path;

/// Size of one frame in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SheetError::ZeroFrameSize {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        Ok(())
    }
}

/// 0-indexed cell in the frame grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridPosition {
    pub row: u32,
    pub column: u32,
}

impl GridPosition {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// Frames `start..=stop` of sheet row `row`, all counted from 1.
///
/// Without `stop` the range runs to the last whole frame of the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceRange {
    pub row: u32,
    pub start: u32,
    pub stop: Option<u32>,
}

impl SequenceRange {
    /// Every whole frame of `row`
    pub const fn row(row: u32) -> Self {
        Self {
            row,
            start: 1,
            stop: None,
        }
    }

    pub const fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub const fn with_stop(mut self, stop: u32) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl Default for SequenceRange {
    fn default() -> Self {
        Self::row(1)
    }
}

/// A loaded sheet image plus the source that slices it
pub struct SpriteSheet<S: ImageSource> {
    source: S,
    image: S::Image,
    width: u32,
    height: u32,
}

impl<S: ImageSource> SpriteSheet<S> {
    pub fn new(source: S, image: S::Image) -> Self {
        let (width, height) = source.dimensions(&image);
        Self {
            source,
            image,
            width,
            height,
        }
    }

    /// Load the sheet image from `path`
    pub fn load(source: S, path: impl AsRef<Path>) -> Result<Self> {
        let image = source.load_image(path.as_ref())?;
        Ok(Self::new(source, image))
    }

    pub fn image(&self) -> &S::Image {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whole frames that fit across one row
    pub fn columns(&self, size: FrameSize) -> u32 {
        self.width.checked_div(size.width).unwrap_or(0)
    }

    /// Cut out the frame at `position`
    pub fn frame(&self, size: FrameSize, position: GridPosition) -> Result<S::Image> {
        size.validate()?;
        let region = PixelRect::new(
            position.column.saturating_mul(size.width),
            position.row.saturating_mul(size.height),
            size.width,
            size.height,
        );
        self.source.crop_region(&self.image, region)
    }

    /// Cut out a run of frames along one row, left to right
    pub fn sequence(&self, size: FrameSize, range: SequenceRange) -> Result<Vec<S::Image>> {
        size.validate()?;
        if range.row == 0 || range.start == 0 {
            return Err(SheetError::ZeroIndex.into());
        }
        let stop = range.stop.unwrap_or_else(|| self.columns(size));
        if range.start > stop {
            return Err(SheetError::EmptyRange {
                start: range.start,
                stop,
            }
            .into());
        }

        let row = range.row - 1;
        let frames = (range.start - 1..stop)
            .map(|column| self.frame(size, GridPosition::new(row, column)))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            row = range.row,
            start = range.start,
            stop,
            frames = frames.len(),
            "sliced sprite sequence"
        );
        Ok(frames)
    }
}
