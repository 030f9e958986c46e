//! Position and pointer capabilities
//!
//! The curve evaluator and the animation clock only ever see control points
//! through [`PositionProvider`]; draggable widgets read the live pointer
//! through [`PointerInput`]. Neither depends on a concrete windowing toolkit.

use crate::geometry::{Point, Size};
use std::cell::Cell;
use std::rc::Rc;

/// Anything with a readable current position (center of its visual extent)
pub trait PositionProvider {
    fn position(&self) -> Point;
}

impl PositionProvider for Point {
    fn position(&self) -> Point {
        *self
    }
}

impl PositionProvider for Cell<Point> {
    fn position(&self) -> Point {
        self.get()
    }
}

impl<T: PositionProvider + ?Sized> PositionProvider for Rc<T> {
    fn position(&self) -> Point {
        (**self).position()
    }
}

/// Live pointer state as seen by a draggable widget
pub trait PointerInput {
    /// Pointer position relative to the container's origin
    fn pointer_position(&self) -> Point;

    /// Current size of the container the widget is clamped to
    fn container_size(&self) -> Size;
}

/// A pointer whose position is set explicitly.
///
/// Used for headless runs and tests, where a script moves the pointer instead
/// of a real input device.
#[derive(Debug)]
pub struct FixedPointer {
    position: Cell<Point>,
    container: Cell<Size>,
}

impl FixedPointer {
    pub fn new(container: Size) -> Self {
        Self {
            position: Cell::new(Point::ZERO),
            container: Cell::new(container),
        }
    }

    pub fn move_to(&self, position: Point) {
        self.position.set(position);
    }

    pub fn resize(&self, container: Size) {
        self.container.set(container);
    }
}

impl PointerInput for FixedPointer {
    fn pointer_position(&self) -> Point {
        self.position.get()
    }

    fn container_size(&self) -> Size {
        self.container.get()
    }
}
