//! Image error types

use crate::source::PixelRect;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid sprite sheet geometry
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetError {
    #[error("frame size must be non-zero, got {width}x{height}")]
    ZeroFrameSize { width: u32, height: u32 },

    /// Rows and frame numbers in a sequence count from 1
    #[error("sequence rows and frames are numbered from 1")]
    ZeroIndex,

    #[error("frame range {start}..={stop} is empty")]
    EmptyRange { start: u32, stop: u32 },

    #[error("region {region:?} lies outside the {width}x{height} image")]
    OutOfBounds {
        region: PixelRect,
        width: u32,
        height: u32,
    },
}

/// Image loading and slicing errors
#[derive(Error, Debug)]
pub enum ImageError {
    /// Failed to read the file
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode image data
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Result type for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
