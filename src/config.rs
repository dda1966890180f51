//! Viewer configuration loaded from JSON.
//!
//! Every field is optional; missing fields fall back to the defaults below.
//!
//! ```json
//! {
//!   "cell_size": 20,
//!   "bbox": [0, 0, 640, 480],
//!   "show_grid": true,
//!   "show_vision": false,
//!   "clear_background": false,
//!   "palette": { "snake_head": [0, 200, 0] }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::term::{BoundingBox, Palette, RenderConfig, RenderOptions, Rgb, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Pixels per cell. `None` fits the grid into the available surface.
    pub cell_size: Option<u32>,
    pub bbox: BoundingBox,
    pub show_grid: bool,
    pub show_vision: bool,
    pub clear_background: bool,
    /// Colors replacing the default palette, keyed by role name.
    pub palette: BTreeMap<Role, Rgb>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            cell_size: None,
            bbox: BoundingBox::default(),
            show_grid: true,
            show_vision: false,
            clear_background: false,
            palette: BTreeMap::new(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn palette(&self) -> Palette {
        Palette::default().with_overrides(&self.palette)
    }

    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            show_grid: self.show_grid,
            show_vision: self.show_vision,
            clear_background: self.clear_background,
        }
    }

    /// Render config for a grid of `grid_shape` on a surface of `surface_size`.
    ///
    /// An explicit `cell_size` wins; otherwise the largest cell size that fits
    /// the grid between the bbox origin and the surface edge is used (at least 1).
    pub fn render_config(&self, grid_shape: (usize, usize), surface_size: (u32, u32)) -> RenderConfig {
        let cell_size = self
            .cell_size
            .unwrap_or_else(|| fit_cell_size(grid_shape, surface_size, &self.bbox));
        RenderConfig::new(cell_size, self.bbox)
    }
}

fn fit_cell_size(grid_shape: (usize, usize), surface_size: (u32, u32), bbox: &BoundingBox) -> u32 {
    let (rows, cols) = grid_shape;
    let avail_w = (surface_size.0 as i64 - bbox.x.max(0) as i64).max(0) as u64;
    let avail_h = (surface_size.1 as i64 - bbox.y.max(0) as i64).max(0) as u64;

    let by_w = avail_w / (cols.max(1) as u64);
    let by_h = avail_h / (rows.max(1) as u64);
    by_w.min(by_h).clamp(1, u32::MAX as u64) as u32
}
