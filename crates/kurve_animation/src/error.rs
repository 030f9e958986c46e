//! Animation error types

use thiserror::Error;

/// Curve construction errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// A Bézier curve needs a start and an end point
    #[error("a Bézier curve needs at least 2 control points, got {count}")]
    TooFewPoints { count: usize },

    /// Tessellation into zero segments
    #[error("tessellation needs at least 1 segment")]
    ZeroSegments,
}

/// Animation setup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Frame sequences must contain at least one frame
    #[error("frame sequence is empty")]
    EmptySequence,

    /// A clock that never waits between ticks would spin forever
    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    /// Progress step must be a positive, finite number
    #[error("invalid progress step {0}: must be positive and finite")]
    InvalidStep(f32),
}

/// Result type for animation setup
pub type Result<T> = std::result::Result<T, AnimationError>;
