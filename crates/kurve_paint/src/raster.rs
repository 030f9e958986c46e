//! Software renderer into an RGBA image
//!
//! Lines are rasterized with Bresenham's algorithm and thickened by stamping a
//! square brush at every step; the marker is a filled square. Pixels are
//! overwritten, not blended.

use crate::color::Color;
use crate::renderer::{Anchor, Renderer};
use image::{Rgba, RgbaImage};
use kurve_core::{Point, Rect, Size};
use std::path::Path;

/// Renders into an in-memory [`RgbaImage`]
pub struct RasterRenderer {
    canvas: RgbaImage,
    background: Color,
    marker_size: Size,
    marker_color: Color,
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let background = Color::WHITE;
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba(background.to_rgba8())),
            background,
            marker_size: Size::square(15.0),
            marker_color: Color::BLUE,
        }
    }

    pub fn with_marker(mut self, size: Size, color: Color) -> Self {
        self.marker_size = size;
        self.marker_color = color;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Color of the pixel at (x, y), if inside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width() || y >= self.canvas.height() {
            return None;
        }
        Some(self.canvas.get_pixel(x, y).0)
    }

    /// Write the canvas to disk; the format follows the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.canvas.save(path)
    }

    /// Fill an axis-aligned rectangle, clipped to the canvas
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let width = self.canvas.width() as i64;
        let height = self.canvas.height() as i64;
        let x0 = (rect.x.round() as i64).clamp(0, width);
        let y0 = (rect.y.round() as i64).clamp(0, height);
        let x1 = (rect.right().round() as i64).clamp(0, width);
        let y1 = (rect.bottom().round() as i64).clamp(0, height);

        let pixel = Rgba(color.to_rgba8());
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }

    fn stamp(&mut self, x: i64, y: i64, brush: f32, color: Color) {
        let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        self.fill_rect(Rect::from_center(center, Size::square(brush)), color);
    }
}

impl Renderer for RasterRenderer {
    fn clear_all(&mut self) {
        let pixel = Rgba(self.background.to_rgba8());
        for p in self.canvas.pixels_mut() {
            *p = pixel;
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let brush = width.max(1.0);
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x0, y0, brush, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn place_marker(&mut self, at: Point, anchor: Anchor) {
        let rect = match anchor {
            Anchor::Center => Rect::from_center(at, self.marker_size),
            Anchor::TopLeft => Rect::new(
                at.x,
                at.y,
                self.marker_size.width,
                self.marker_size.height,
            ),
        };
        self.fill_rect(rect, self.marker_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn test_horizontal_line_is_drawn() {
        let mut renderer = RasterRenderer::new(50, 20);
        renderer.draw_line(Point::new(5.0, 10.0), Point::new(40.0, 10.0), 1.0, Color::RED);

        assert_eq!(renderer.pixel(5, 10), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(20, 10), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(40, 10), Some([255, 0, 0, 255]));
        assert_eq!(renderer.pixel(41, 10), Some(WHITE));
        assert_eq!(renderer.pixel(20, 12), Some(WHITE));
    }

    #[test]
    fn test_marker_centered_and_clear() {
        let mut renderer = RasterRenderer::new(100, 100).with_marker(Size::square(10.0), Color::BLUE);
        renderer.place_marker(Point::new(50.0, 50.0), Anchor::Center);

        assert_eq!(renderer.pixel(45, 45), Some([0, 0, 255, 255]));
        assert_eq!(renderer.pixel(54, 54), Some([0, 0, 255, 255]));
        assert_eq!(renderer.pixel(55, 55), Some(WHITE));
        assert_eq!(renderer.pixel(44, 50), Some(WHITE));

        renderer.clear_all();
        assert_eq!(renderer.pixel(50, 50), Some(WHITE));
    }

    #[test]
    fn test_drawing_outside_canvas_is_clipped() {
        let mut renderer = RasterRenderer::new(10, 10);
        renderer.draw_line(Point::new(-20.0, -20.0), Point::new(30.0, 30.0), 3.0, Color::BLACK);
        renderer.place_marker(Point::new(100.0, 100.0), Anchor::TopLeft);

        assert_eq!(renderer.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(renderer.pixel(10, 10), None);
    }
}
