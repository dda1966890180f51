//! Drawing surface abstraction.
//!
//! A surface accepts primitive draw commands in pixel space and shows them on
//! `present`. `FrameBuffer` draws into memory, `TerminalSurface` pushes the
//! result to a terminal, and [`CommandRecorder`] keeps the raw command stream.

use std::io;

use crate::fb::Rgb;

/// Axis-aligned rectangle in pixel space. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Sub-pixel point, used for line endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub trait DrawSurface {
    /// Drawable area in pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);

    fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb);

    /// Show everything drawn since the last present.
    fn present(&mut self) -> io::Result<()>;
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        (**self).fill_rect(rect, color);
    }

    fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb) {
        (**self).draw_line(from, to, color);
    }

    fn present(&mut self) -> io::Result<()> {
        (**self).present()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: PixelRect, color: Rgb },
    Line { from: PointF, to: PointF, color: Rgb },
    Present,
}

/// Surface that only records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn present_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Present))
            .count()
    }

    /// Color of the last rectangle drawn exactly at `rect`, if any.
    pub fn last_fill_at(&self, rect: PixelRect) -> Option<Rgb> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::FillRect { rect: r, color } if *r == rect => Some(*color),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (PointF, PointF, Rgb)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, color } => Some((from, to, color)),
            _ => None,
        })
    }
}

impl DrawSurface for CommandRecorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn present(&mut self) -> io::Result<()> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_command_order() {
        let mut rec = CommandRecorder::new(10, 10);
        let c = Rgb::new(1, 2, 3);
        rec.fill_rect(PixelRect::new(0, 0, 2, 2), c);
        rec.draw_line(PointF::new(0.5, 0.5), PointF::new(3.5, 0.5), c);
        rec.present().unwrap();

        assert_eq!(rec.commands().len(), 3);
        assert!(matches!(rec.commands()[0], DrawCommand::FillRect { .. }));
        assert!(matches!(rec.commands()[1], DrawCommand::Line { .. }));
        assert_eq!(rec.commands()[2], DrawCommand::Present);
        assert_eq!(rec.present_count(), 1);
    }

    #[test]
    fn last_fill_at_prefers_latest_draw() {
        let mut rec = CommandRecorder::new(10, 10);
        let rect = PixelRect::new(4, 4, 2, 2);
        rec.fill_rect(rect, Rgb::new(1, 1, 1));
        rec.fill_rect(PixelRect::new(0, 0, 2, 2), Rgb::new(9, 9, 9));
        rec.fill_rect(rect, Rgb::new(2, 2, 2));
        assert_eq!(rec.last_fill_at(rect), Some(Rgb::new(2, 2, 2)));
        assert_eq!(rec.last_fill_at(PixelRect::new(8, 8, 2, 2)), None);
    }

    #[test]
    fn mut_ref_forwards_to_surface() {
        fn present_twice<S: DrawSurface>(mut surface: S) -> (u32, u32) {
            surface.present().unwrap();
            surface.present().unwrap();
            surface.size()
        }

        let mut rec = CommandRecorder::new(3, 4);
        assert_eq!(present_twice(&mut rec), (3, 4));
        assert_eq!(rec.present_count(), 2);
    }
}
