//! Grid-to-pixel coordinate mapping.
//!
//! Grid rows map to pixel Y and grid columns to pixel X. Rectangles anchor at
//! the cell's top-left corner; line endpoints anchor at the cell center.

use serde::{Deserialize, Serialize};

use snakeview_types::GridPos;

use crate::surface::{PixelRect, PointF};

pub const DEFAULT_CELL_SIZE: u32 = 50;

/// Pixel-space box the game is drawn in.
///
/// Only the origin takes part in mapping. `width`/`height` are carried as
/// configuration and never clip or scale the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(0, 0, 1000, 1000)
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side of one grid cell in pixels. Must be positive.
    pub cell_size: u32,
    pub bbox: BoundingBox,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            bbox: BoundingBox::default(),
        }
    }
}

impl RenderConfig {
    pub fn new(cell_size: u32, bbox: BoundingBox) -> Self {
        Self { cell_size, bbox }
    }

    pub fn mapper(&self) -> CellMapper {
        CellMapper::new(self.cell_size, self.bbox.x, self.bbox.y)
    }
}

/// Maps grid coordinates to pixel positions for a fixed cell size and origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMapper {
    cell_size: u32,
    origin_x: i32,
    origin_y: i32,
}

impl CellMapper {
    pub fn new(cell_size: u32, origin_x: i32, origin_y: i32) -> Self {
        Self {
            cell_size,
            origin_x,
            origin_y,
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    /// Top-left pixel of a cell.
    #[inline]
    pub fn corner(&self, pos: GridPos) -> (i32, i32) {
        let cs = self.cell_size as i64;
        let x = self.origin_x as i64 + pos.col as i64 * cs;
        let y = self.origin_y as i64 + pos.row as i64 * cs;
        (saturate_i32(x), saturate_i32(y))
    }

    /// Pixel midpoint of a cell: `origin + (coord + 0.5) * cell_size`.
    #[inline]
    pub fn center(&self, pos: GridPos) -> PointF {
        let cs = self.cell_size as f32;
        PointF::new(
            self.origin_x as f32 + (pos.col as f32 + 0.5) * cs,
            self.origin_y as f32 + (pos.row as f32 + 0.5) * cs,
        )
    }

    /// The full `cell_size x cell_size` rectangle of a cell.
    #[inline]
    pub fn cell_rect(&self, pos: GridPos) -> PixelRect {
        let (x, y) = self.corner(pos);
        PixelRect::new(x, y, self.cell_size, self.cell_size)
    }

    /// Inverse of [`CellMapper::corner`]: the cell containing pixel `(x, y)`.
    ///
    /// Returns `None` for pixels left of or above the origin, or when the cell
    /// size is zero.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<GridPos> {
        if self.cell_size == 0 {
            return None;
        }
        let dx = x as i64 - self.origin_x as i64;
        let dy = y as i64 - self.origin_y as i64;
        if dx < 0 || dy < 0 {
            return None;
        }
        let cs = self.cell_size as i64;
        Some(GridPos::new((dy / cs) as usize, (dx / cs) as usize))
    }
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
