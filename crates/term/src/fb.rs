//! Pixel framebuffer and color types.

use std::io;

use serde::{Deserialize, Serialize};

use crate::surface::{DrawSurface, PixelRect, PointF};

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// 2D canvas of RGB pixels.
///
/// Drawing operations clip silently to the canvas; nothing outside
/// `0..width x 0..height` is ever written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the framebuffer.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.pixels.resize(len, Rgb::default());
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.idx(x as i64, y as i64).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let x0 = (rect.x as i64).max(0);
        let y0 = (rect.y as i64).max(0);
        let x1 = (rect.x as i64 + rect.width as i64).min(self.width as i64);
        let y1 = (rect.y as i64 + rect.height as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let w = self.width as usize;
        for y in y0..y1 {
            let row = (y as usize) * w;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Rasterize a one-pixel line between the rounded endpoints (Bresenham).
    ///
    /// The segment is clipped to the canvas first, so the step count is bounded
    /// by the canvas size no matter how far away the endpoints are.
    pub fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb) {
        let Some((from, to)) = self.clip_line(from, to) else {
            return;
        };
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0, color);
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

    /// Liang-Barsky clip against the pixel-center box, half a pixel beyond
    /// each edge. `None` when nothing of the segment is visible.
    fn clip_line(&self, from: PointF, to: PointF) -> Option<(PointF, PointF)> {
        let (x0, y0) = (from.x as f64, from.y as f64);
        let (x1, y1) = (to.x as f64, to.y as f64);
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }

        let (xmin, ymin) = (-0.5, -0.5);
        let xmax = self.width as f64 - 0.5;
        let ymax = self.height as f64 - 0.5;
        let (dx, dy) = (x1 - x0, y1 - y0);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [
            (-dx, x0 - xmin),
            (dx, xmax - x0),
            (-dy, y0 - ymin),
            (dy, ymax - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| PointF::new((x0 + t * dx) as f32, (y0 + t * dy) as f32);
        Some((at(t0), at(t1)))
    }
}

impl DrawSurface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        FrameBuffer::fill_rect(self, rect, color);
    }

    fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb) {
        FrameBuffer::draw_line(self, from, to, color);
    }

    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill_rect(PixelRect::new(-2, 1, 4, 10), RED);

        assert_eq!(fb.get(0, 1), Some(RED));
        assert_eq!(fb.get(1, 2), Some(RED));
        assert_eq!(fb.get(2, 1), Some(Rgb::default()));
        assert_eq!(fb.get(0, 0), Some(Rgb::default()));
    }

    #[test]
    fn fill_rect_fully_outside_is_noop() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(PixelRect::new(10, 10, 5, 5), RED);
        fb.fill_rect(PixelRect::new(-8, 0, 5, 5), RED);
        assert!(fb.pixels().iter().all(|&p| p == Rgb::default()));
    }

    #[test]
    fn horizontal_line_covers_both_endpoints() {
        let mut fb = FrameBuffer::new(10, 3);
        fb.draw_line(PointF::new(1.0, 1.0), PointF::new(6.0, 1.0), RED);
        for x in 1..=6 {
            assert_eq!(fb.get(x, 1), Some(RED), "x={x}");
        }
        assert_eq!(fb.get(0, 1), Some(Rgb::default()));
        assert_eq!(fb.get(7, 1), Some(Rgb::default()));
    }

    #[test]
    fn diagonal_line_steps_one_pixel_per_row() {
        let mut fb = FrameBuffer::new(5, 5);
        fb.draw_line(PointF::new(4.0, 4.0), PointF::new(0.0, 0.0), RED);
        for i in 0..5 {
            assert_eq!(fb.get(i, i), Some(RED));
        }
        let lit = fb.pixels().iter().filter(|&&p| p == RED).count();
        assert_eq!(lit, 5);
    }

    #[test]
    fn line_partially_offscreen_draws_visible_part() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.draw_line(PointF::new(-5.0, 0.0), PointF::new(1.0, 0.0), RED);
        assert_eq!(fb.get(0, 0), Some(RED));
        assert_eq!(fb.get(1, 0), Some(RED));
        assert_eq!(fb.get(2, 0), Some(Rgb::default()));
    }

    #[test]
    fn line_with_far_endpoint_is_clipped() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.draw_line(PointF::new(0.0, 1.0), PointF::new(1.0e30, 1.0), RED);
        for x in 0..4 {
            assert_eq!(fb.get(x, 1), Some(RED), "x={x}");
        }
        let lit = fb.pixels().iter().filter(|&&p| p == RED).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn line_outside_canvas_draws_nothing() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.draw_line(PointF::new(-10.0, -3.0), PointF::new(20.0, -3.0), RED);
        fb.draw_line(PointF::new(f32::NAN, 0.0), PointF::new(2.0, 2.0), RED);
        fb.draw_line(PointF::new(f32::MAX, f32::MAX), PointF::new(f32::MAX, 0.0), RED);
        assert!(fb.pixels().iter().all(|&p| p == Rgb::default()));
    }

    #[test]
    fn resize_keeps_requested_dimensions() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(3, 5);
        assert_eq!(fb.size(), (3, 5));
        assert_eq!(fb.pixels().len(), 15);
    }

    #[test]
    fn rgb_serializes_as_triple() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Rgb = serde_json::from_str("[4,5,6]").unwrap();
        assert_eq!(back, Rgb::new(4, 5, 6));
    }
}
