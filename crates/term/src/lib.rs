//! Grid renderer for snake simulations.
//!
//! This crate turns a world snapshot (grid, snakes, vision rays) into
//! primitive draw commands on a [`DrawSurface`]. The drawing itself is
//! backend-agnostic; a pixel [`FrameBuffer`] and a terminal presenter are
//! provided.
//!
//! Goals:
//! - Keep color classification and coordinate mapping pure and testable
//! - One `present` per frame, after every draw command
//! - Reject malformed snapshots before drawing anything

pub mod error;
pub mod fb;
pub mod grid_view;
pub mod mapping;
pub mod palette;
pub mod renderer;
pub mod surface;

pub use snakeview_types as types;

pub use error::{RenderError, SetupError};
pub use fb::{FrameBuffer, Rgb};
pub use grid_view::{
    cell_color, validate_world, vision_fill_color, vision_line_color, GridRenderer, RenderOptions,
};
pub use mapping::{BoundingBox, CellMapper, RenderConfig, DEFAULT_CELL_SIZE};
pub use palette::{Palette, PaletteError, Role};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer, TerminalSurface};
pub use surface::{CommandRecorder, DrawCommand, DrawSurface, PixelRect, PointF};
