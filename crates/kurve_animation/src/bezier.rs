//! n-point Bézier curves
//!
//! Evaluation uses de Casteljau's algorithm: the control polygon is reduced by
//! pairwise linear interpolation, one point shorter per pass, until a single
//! segment is left. Everything here is real-valued; snapping to pixels is left
//! to whoever draws the result.

use crate::error::CurveError;
use kurve_core::{Point, PositionProvider};
use smallvec::SmallVec;
use std::rc::Rc;

/// Working buffer for one reduction pass; curves rarely exceed 8 points
type PointBuf = SmallVec<[Point; 8]>;

/// Point on the curve defined by `points` at parameter `t`.
///
/// Fails with [`CurveError::TooFewPoints`] for fewer than 2 points.
pub fn evaluate(points: &[Point], t: f32) -> Result<Point, CurveError> {
    check_len(points.len())?;
    Ok(de_casteljau(points, t))
}

/// Sample the curve at `segments + 1` evenly spaced parameters, both ends
/// included, for drawing as a polyline.
pub fn tessellate(points: &[Point], segments: usize) -> Result<Vec<Point>, CurveError> {
    check_len(points.len())?;
    if segments == 0 {
        return Err(CurveError::ZeroSegments);
    }
    Ok(sample(points, segments))
}

/// Closed form of the three-point curve: `(1-t)²p0 + 2t(1-t)p1 + t²p2`
pub fn quadratic(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * t * u * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * t * u * p1.y + t * t * p2.y,
    )
}

fn check_len(count: usize) -> Result<(), CurveError> {
    if count < 2 {
        return Err(CurveError::TooFewPoints { count });
    }
    Ok(())
}

/// Callers guarantee at least 2 points
pub(crate) fn de_casteljau(points: &[Point], t: f32) -> Point {
    if let [start, end] = points {
        return Point::lerp(t, *start, *end);
    }

    let mut working: PointBuf = points.iter().copied().collect();
    while working.len() > 2 {
        working = working
            .windows(2)
            .map(|pair| Point::lerp(t, pair[0], pair[1]))
            .collect();
    }
    Point::lerp(t, working[0], working[1])
}

/// Callers guarantee at least 2 points and 1 segment
pub(crate) fn sample(points: &[Point], segments: usize) -> Vec<Point> {
    (0..=segments)
        .map(|k| de_casteljau(points, k as f32 / segments as f32))
        .collect()
}

/// An owned, validated Bézier curve
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve {
    points: Vec<Point>,
}

impl BezierCurve {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Result<Self, CurveError> {
        let points: Vec<Point> = points.into_iter().collect();
        check_len(points.len())?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Polynomial degree: one less than the number of control points
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    pub fn point_at(&self, t: f32) -> Point {
        de_casteljau(&self.points, t)
    }

    pub fn tessellate(&self, segments: usize) -> Result<Vec<Point>, CurveError> {
        if segments == 0 {
            return Err(CurveError::ZeroSegments);
        }
        Ok(sample(&self.points, segments))
    }
}

/// Ordered control points whose positions are read live.
///
/// First is the start, last is the end, the rest pull the curve. Holds at
/// least 2 providers.
#[derive(Clone)]
pub struct ControlPoints {
    providers: Vec<Rc<dyn PositionProvider>>,
}

impl ControlPoints {
    pub fn new(providers: Vec<Rc<dyn PositionProvider>>) -> Result<Self, CurveError> {
        check_len(providers.len())?;
        Ok(Self { providers })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Current position of every control point
    pub fn snapshot(&self) -> Vec<Point> {
        self.providers
            .iter()
            .map(|provider| provider.position())
            .collect()
    }

    /// Freeze the current positions into a curve
    pub fn curve(&self) -> BezierCurve {
        BezierCurve {
            points: self.snapshot(),
        }
    }
}

impl std::fmt::Debug for ControlPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlPoints")
            .field("positions", &self.snapshot())
            .finish()
    }
}
