//! TerminalRenderer: flushes a pixel framebuffer to a real terminal.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block glyph: foreground is the top pixel, background the bottom one.
//! After the first frame only changed runs of cells are re-emitted.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
    tty::IsTty,
    QueueableCommand,
};
use log::debug;

use crate::error::SetupError;
use crate::fb::{FrameBuffer, Rgb};
use crate::surface::{DrawSurface, PixelRect, PointF};

const HALF_BLOCK: char = '▀';

/// One terminal cell worth of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Glyph {
    top: Rgb,
    bottom: Rgb,
}

fn glyph_at(fb: &FrameBuffer, col: u16, row: u16) -> Glyph {
    let x = col as u32;
    let y = row as u32 * 2;
    Glyph {
        top: fb.get(x, y).unwrap_or_default(),
        bottom: fb.get(x, y + 1).unwrap_or_default(),
    }
}

/// Terminal size `(cols, rows)` needed to show a framebuffer.
pub fn cells_for(fb: &FrameBuffer) -> (u16, u16) {
    let cols = fb.width().min(u16::MAX as u32) as u16;
    let rows = fb.height().div_ceil(2).min(u16::MAX as u32) as u16;
    (cols, rows)
}

/// Pixel canvas size that fills a terminal of `(cols, rows)`.
pub fn pixels_for(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32, rows as u32 * 2)
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, diffing against the previously drawn one.
    pub fn draw(&mut self, fb: &FrameBuffer) -> io::Result<()> {
        self.buf.clear();
        let same_size = self
            .last
            .as_ref()
            .is_some_and(|prev| prev.width() == fb.width() && prev.height() == fb.height());

        if let (true, Some(prev)) = (same_size, self.last.as_mut()) {
            encode_diff_into(prev, fb, &mut self.buf)?;
            // Reuse the previous allocation.
            prev.clone_from(fb);
        } else {
            encode_full_into(fb, &mut self.buf)?;
            self.last = Some(fb.clone());
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let (cols, rows) = cells_for(fb);
    let mut current: Option<Glyph> = None;
    for row in 0..rows {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..cols {
            emit_glyph(out, glyph_at(fb, col, row), &mut current)?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut current: Option<Glyph> = None;

    for_each_changed_run(prev, next, |col, row, len| {
        out.queue(cursor::MoveTo(col, row))?;
        for dc in 0..len {
            emit_glyph(out, glyph_at(next, col + dc, row), &mut current)?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn emit_glyph(out: &mut Vec<u8>, glyph: Glyph, current: &mut Option<Glyph>) -> io::Result<()> {
    let prev = *current;
    if prev.map(|g| g.top) != Some(glyph.top) {
        out.queue(SetForegroundColor(rgb_to_color(glyph.top)))?;
    }
    if prev.map(|g| g.bottom) != Some(glyph.bottom) {
        out.queue(SetBackgroundColor(rgb_to_color(glyph.bottom)))?;
    }
    *current = Some(glyph);
    out.queue(Print(HALF_BLOCK))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> io::Result<()>,
) -> io::Result<()> {
    let (w, h) = cells_for(next);

    if prev.width() != next.width() || prev.height() != next.height() {
        // Size changed: treat everything as dirty in a single pass (row runs).
        for row in 0..h {
            f(0, row, w)?;
        }
        return Ok(());
    }

    for row in 0..h {
        let mut col = 0;
        while col < w {
            if glyph_at(prev, col, row) == glyph_at(next, col, row) {
                col += 1;
                continue;
            }

            let start = col;
            col += 1;
            while col < w && glyph_at(prev, col, row) != glyph_at(next, col, row) {
                col += 1;
            }
            f(start, row, col - start)?;
        }
    }

    Ok(())
}

/// A [`DrawSurface`] backed by the terminal.
///
/// Draw commands land in an in-memory framebuffer; `present` flushes the
/// changes to the terminal.
pub struct TerminalSurface {
    fb: FrameBuffer,
    term: TerminalRenderer,
    active: bool,
}

impl TerminalSurface {
    /// Take over the terminal (raw mode, alternate screen).
    ///
    /// Fails when stdout is not a terminal or its size cannot be read.
    pub fn open() -> Result<Self, SetupError> {
        if !io::stdout().is_tty() {
            return Err(SetupError::NotATerminal);
        }
        let (cols, rows) = terminal::size()?;
        if cols == 0 || rows == 0 {
            let (width, height) = pixels_for(cols, rows);
            return Err(SetupError::EmptySurface { width, height });
        }

        let mut term = TerminalRenderer::new();
        term.enter()?;

        let (width, height) = pixels_for(cols, rows);
        debug!("terminal surface opened: {cols}x{rows} cells, {width}x{height} pixels");
        Ok(Self {
            fb: FrameBuffer::new(width, height),
            term,
            active: true,
        })
    }

    /// Restore the terminal.
    pub fn close(mut self) -> io::Result<()> {
        self.active = false;
        self.term.exit()
    }

    /// Follow a terminal resize. The next present is a full redraw.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = pixels_for(cols, rows);
        self.fb.resize(width, height);
        self.fb.clear(Rgb::default());
        self.term.invalidate();
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.active {
            let _ = self.term.exit();
        }
    }
}

impl DrawSurface for TerminalSurface {
    fn size(&self) -> (u32, u32) {
        (self.fb.width(), self.fb.height())
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.fb.fill_rect(rect, color);
    }

    fn draw_line(&mut self, from: PointF, to: PointF, color: Rgb) {
        self.fb.draw_line(from, to, color);
    }

    fn present(&mut self) -> io::Result<()> {
        self.term.draw(&self.fb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn glyph_pairs_vertical_pixels() {
        let mut fb = FrameBuffer::new(2, 4);
        fb.set(1, 2, RED);
        fb.set(1, 3, BLUE);
        assert_eq!(glyph_at(&fb, 1, 1), Glyph { top: RED, bottom: BLUE });
        assert_eq!(glyph_at(&fb, 0, 0), Glyph::default());
    }

    #[test]
    fn odd_height_pads_last_row() {
        let mut fb = FrameBuffer::new(1, 3);
        fb.set(0, 2, RED);
        assert_eq!(cells_for(&fb), (1, 2));
        assert_eq!(glyph_at(&fb, 0, 1), Glyph { top: RED, bottom: Rgb::default() });
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let a = FrameBuffer::new(5, 2);
        let mut b = FrameBuffer::new(5, 2);

        // Change cells [1..=3] of the only terminal row, alternating halves.
        b.set(1, 0, RED);
        b.set(2, 1, RED);
        b.set(3, 0, BLUE);

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }

    #[test]
    fn changed_runs_split_on_unchanged_gap() {
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        b.set(0, 0, RED);
        b.set(4, 1, RED);
        b.set(5, 1, RED);

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(0, 0, 1), (4, 0, 2)]);
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let fb = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&fb, &fb.clone(), &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(!text.contains(HALF_BLOCK));
    }

    #[test]
    fn full_encode_prints_one_glyph_per_cell() {
        let mut fb = FrameBuffer::new(3, 4);
        fb.clear(RED);
        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }

    #[test]
    fn pixels_for_doubles_rows() {
        assert_eq!(pixels_for(80, 24), (80, 48));
        assert_eq!(cells_for(&FrameBuffer::new(80, 48)), (80, 24));
    }

    #[test]
    fn rgb_converts_to_truecolor() {
        assert_eq!(rgb_to_color(Rgb::new(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
