//! GridRenderer: draws a snake world snapshot onto a [`DrawSurface`].
//!
//! The color decisions are pure functions and can be unit-tested without a
//! surface. A frame is drawn in two passes (grid + heads, then the optional
//! vision overlay) and presented exactly once.

use log::{debug, trace};

use snakeview_types::{Cell, GridPos, Item, VisionRay, WorldView};

use crate::error::{RenderError, SetupError};
use crate::fb::Rgb;
use crate::mapping::{CellMapper, RenderConfig};
use crate::palette::{Palette, Role};
use crate::surface::{DrawSurface, PixelRect};

/// Per-frame display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Shade odd empty cells with the wall color.
    pub show_grid: bool,
    /// Overlay each snake's vision rays.
    pub show_vision: bool,
    /// Fill the whole surface with the background color first.
    pub clear_background: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_vision: false,
            clear_background: false,
        }
    }
}

impl RenderOptions {
    pub fn new(show_grid: bool, show_vision: bool) -> Self {
        Self {
            show_grid,
            show_vision,
            ..Self::default()
        }
    }
}

/// Base color of a grid cell, or `None` when the cell is not drawn.
pub fn cell_color(palette: &Palette, cell: Cell, pos: GridPos, show_grid: bool) -> Option<Rgb> {
    let role = match cell {
        Cell::Wall => Role::Wall,
        Cell::Empty => {
            if show_grid && (pos.row + pos.col) % 2 == 1 {
                Role::Wall
            } else {
                Role::Empty
            }
        }
        Cell::Snake => Role::Snake,
        Cell::Apple => Role::Apple,
        Cell::Unclassified => return None,
    };
    Some(palette.get(role))
}

/// Fill for the cell a ray currently sees.
pub fn vision_fill_color(palette: &Palette, item: Item) -> Rgb {
    match item {
        Item::Apple => palette.get(Role::VisibleApple),
        Item::Snake => palette.get(Role::VisibleSnake),
        Item::Empty | Item::Wall => palette.get(Role::Empty),
    }
}

/// Color of the ray line itself.
pub fn vision_line_color(palette: &Palette, item: Item) -> Rgb {
    match item {
        Item::Apple => palette.get(Role::VisionApple),
        Item::Snake => palette.get(Role::VisionSnake),
        Item::Empty | Item::Wall => palette.get(Role::Vision),
    }
}

pub struct GridRenderer<S> {
    surface: S,
    config: RenderConfig,
    mapper: CellMapper,
    palette: Palette,
}

impl<S: DrawSurface> GridRenderer<S> {
    pub fn new(surface: S, config: RenderConfig) -> Result<Self, SetupError> {
        Self::with_palette(surface, config, Palette::default())
    }

    pub fn with_palette(
        surface: S,
        config: RenderConfig,
        palette: Palette,
    ) -> Result<Self, SetupError> {
        if config.cell_size == 0 {
            return Err(SetupError::ZeroCellSize);
        }
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(SetupError::EmptySurface { width, height });
        }

        debug!(
            "grid renderer ready: cell_size={} bbox={:?} surface={}x{}",
            config.cell_size, config.bbox, width, height
        );

        Ok(Self {
            surface,
            mapper: config.mapper(),
            config,
            palette,
        })
    }

    /// Swap in a new cell size / bounding box, e.g. after a surface resize.
    pub fn set_config(&mut self, config: RenderConfig) -> Result<(), SetupError> {
        if config.cell_size == 0 {
            return Err(SetupError::ZeroCellSize);
        }
        self.mapper = config.mapper();
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mapper(&self) -> &CellMapper {
        &self.mapper
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Draw one frame of `world` and present it.
    ///
    /// The snapshot is validated first; on error nothing is drawn.
    pub fn render_frame<W>(&mut self, world: &W, opts: RenderOptions) -> Result<(), RenderError>
    where
        W: WorldView + ?Sized,
    {
        validate_world(world, opts.show_vision)?;

        if opts.clear_background {
            let (w, h) = self.surface.size();
            self.surface
                .fill_rect(PixelRect::new(0, 0, w, h), self.palette.get(Role::Background));
        }

        self.draw_game(world, opts.show_grid);
        if opts.show_vision {
            self.draw_vision(world);
        }

        trace!(
            "frame drawn: grid={:?} snakes={} show_grid={} show_vision={}",
            world.grid().shape(),
            world.snakes().len(),
            opts.show_grid,
            opts.show_vision
        );

        self.surface.present()?;
        Ok(())
    }

    fn draw_game<W: WorldView + ?Sized>(&mut self, world: &W, show_grid: bool) {
        for (pos, cell) in world.grid().iter() {
            if let Some(color) = cell_color(&self.palette, cell, pos, show_grid) {
                self.surface.fill_rect(self.mapper.cell_rect(pos), color);
            }
        }

        let head_color = self.palette.get(Role::SnakeHead);
        for head in world.snakes().iter().filter_map(|s| s.head()) {
            self.surface.fill_rect(self.mapper.cell_rect(head), head_color);
        }
    }

    fn draw_vision<W: WorldView + ?Sized>(&mut self, world: &W) {
        for snake in world.snakes() {
            for ray in &snake.full_vision {
                self.draw_ray(ray);
            }
        }
    }

    fn draw_ray(&mut self, ray: &VisionRay) {
        // Presence is checked by `validate_world`.
        let Some(seen) = ray.nearest() else {
            return;
        };

        self.surface.fill_rect(
            self.mapper.cell_rect(seen.coord),
            vision_fill_color(&self.palette, seen.item),
        );

        self.surface.draw_line(
            self.mapper.center(ray.center),
            self.mapper.center(ray.end_point),
            vision_line_color(&self.palette, seen.item),
        );
    }
}

/// Check a snapshot for everything `render_frame` relies on, without drawing.
///
/// Ray endpoints and detections are only checked when `show_vision` is set.
pub fn validate_world<W: WorldView + ?Sized>(
    world: &W,
    show_vision: bool,
) -> Result<(), RenderError> {
    let grid = world.grid();
    for (si, snake) in world.snakes().iter().enumerate() {
        let head = snake.head().ok_or(RenderError::EmptyBody { snake: si })?;
        if !grid.contains(head) {
            return Err(RenderError::HeadOutOfBounds {
                snake: si,
                pos: head,
            });
        }

        if !show_vision {
            continue;
        }
        for (ri, ray) in snake.full_vision.iter().enumerate() {
            for pos in [ray.center, ray.end_point] {
                if !grid.contains(pos) {
                    return Err(RenderError::RayOutOfBounds {
                        snake: si,
                        ray: ri,
                        pos,
                    });
                }
            }
            let seen = ray
                .nearest()
                .ok_or(RenderError::NoDetection { snake: si, ray: ri })?;
            if !grid.contains(seen.coord) {
                return Err(RenderError::DetectionOutOfBounds {
                    snake: si,
                    ray: ri,
                    pos: seen.coord,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col)
    }

    #[test]
    fn wall_ignores_show_grid() {
        let p = Palette::default();
        for show_grid in [false, true] {
            for at in [pos(0, 0), pos(0, 1), pos(3, 4)] {
                assert_eq!(cell_color(&p, Cell::Wall, at, show_grid), Some(p.get(Role::Wall)));
            }
        }
    }

    #[test]
    fn empty_checkerboard_only_with_grid() {
        let p = Palette::default();
        for row in 0..4 {
            for col in 0..4 {
                let at = pos(row, col);
                assert_eq!(cell_color(&p, Cell::Empty, at, false), Some(p.get(Role::Empty)));
                let expected = if (row + col) % 2 == 1 {
                    Role::Wall
                } else {
                    Role::Empty
                };
                assert_eq!(cell_color(&p, Cell::Empty, at, true), Some(p.get(expected)));
            }
        }
    }

    #[test]
    fn snake_apple_and_unclassified_colors() {
        let p = Palette::default();
        assert_eq!(cell_color(&p, Cell::Snake, pos(0, 1), true), Some(p.get(Role::Snake)));
        assert_eq!(cell_color(&p, Cell::Apple, pos(0, 1), true), Some(p.get(Role::Apple)));
        assert_eq!(cell_color(&p, Cell::Unclassified, pos(0, 0), true), None);
    }

    #[test]
    fn neutral_vision_uses_distinct_fill_and_line_roles() {
        let p = Palette::default();
        for item in [Item::Empty, Item::Wall] {
            assert_eq!(vision_fill_color(&p, item), p.get(Role::Empty));
            assert_eq!(vision_line_color(&p, item), p.get(Role::Vision));
        }
        assert_ne!(p.get(Role::Empty), p.get(Role::Vision));
    }

    #[test]
    fn apple_and_snake_vision_colors() {
        let p = Palette::default();
        assert_eq!(vision_fill_color(&p, Item::Apple), p.get(Role::VisibleApple));
        assert_eq!(vision_line_color(&p, Item::Apple), p.get(Role::VisionApple));
        assert_eq!(vision_fill_color(&p, Item::Snake), p.get(Role::VisibleSnake));
        assert_eq!(vision_line_color(&p, Item::Snake), p.get(Role::VisionSnake));
    }

    #[test]
    fn options_default_shows_grid_without_vision() {
        let opts = RenderOptions::default();
        assert!(opts.show_grid);
        assert!(!opts.show_vision);
        assert!(!opts.clear_background);
    }
}
