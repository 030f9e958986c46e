//! Renderer interface
//!
//! The animation clock issues exactly one frame of commands per tick:
//! `clear_all`, the curve polyline as individual line segments, then the
//! marker.

use crate::color::Color;
use kurve_core::Point;
use std::cell::RefCell;
use std::rc::Rc;

/// Which point of the marker is placed at the given position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
}

/// A drawing surface
pub trait Renderer {
    /// Erase everything drawn so far
    fn clear_all(&mut self);

    /// Draw a straight line segment
    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color);

    /// Move the marker to `at`
    fn place_marker(&mut self, at: Point, anchor: Anchor);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn clear_all(&mut self) {
        (**self).clear_all();
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        (**self).draw_line(from, to, width, color);
    }

    fn place_marker(&mut self, at: Point, anchor: Anchor) {
        (**self).place_marker(at, anchor);
    }
}

/// Shared renderer, so the caller can inspect it while a clock draws into it
impl<R: Renderer + ?Sized> Renderer for Rc<RefCell<R>> {
    fn clear_all(&mut self) {
        self.borrow_mut().clear_all();
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.borrow_mut().draw_line(from, to, width, color);
    }

    fn place_marker(&mut self, at: Point, anchor: Anchor) {
        self.borrow_mut().place_marker(at, anchor);
    }
}

/// A recorded renderer call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
    Marker {
        at: Point,
        anchor: Anchor,
    },
}

/// Renderer that records every call instead of drawing
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `clear_all` calls, i.e. frames started
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Commands issued since the most recent `clear_all`
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .map_or(0, |index| index + 1);
        &self.commands[start..]
    }

    /// Marker positions in the order they were placed
    pub fn marker_positions(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Marker { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn clear_all(&mut self) {
        self.frames += 1;
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn place_marker(&mut self, at: Point, anchor: Anchor) {
        self.commands.push(DrawCommand::Marker { at, anchor });
    }
}
