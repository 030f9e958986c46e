//! Geometric value types

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points.
    ///
    /// `t = 0.0` yields `from`, `t = 1.0` yields `to`. Values outside the unit
    /// interval extrapolate along the same line.
    #[inline]
    pub fn lerp(t: f32, from: Point, to: Point) -> Point {
        Point {
            x: (1.0 - t) * from.x + t * to.x,
            y: (1.0 - t) * from.y + t * to.y,
        }
    }

    /// Snap to the integer pixel grid (half away from zero)
    #[inline]
    pub fn round(self) -> Point {
        Point {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    /// Check whether two points are within `epsilon` of each other on both axes
    pub fn approx_eq(self, other: Point, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// A 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// A rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(110.0, -80.0);

        assert_eq!(Point::lerp(0.0, a, b), a);
        assert_eq!(Point::lerp(1.0, a, b), b);
        assert_eq!(Point::lerp(0.5, a, b), Point::new(60.0, -30.0));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(Point::new(1.5, -1.5).round(), Point::new(2.0, -2.0));
        assert_eq!(Point::new(1.49, 7.51).round(), Point::new(1.0, 8.0));
    }

    #[test]
    fn test_rect_from_center() {
        let rect = Rect::from_center(Point::new(50.0, 40.0), Size::new(20.0, 10.0));
        assert_eq!(rect.origin(), Point::new(40.0, 35.0));
        assert_eq!(rect.center(), Point::new(50.0, 40.0));
        assert_eq!(rect.right(), 60.0);
        assert_eq!(rect.bottom(), 45.0);
        assert!(rect.contains(Point::new(45.0, 40.0)));
        assert!(!rect.contains(Point::new(61.0, 40.0)));
    }
}
