//! Built-in demo world.
//!
//! Used when the viewer is started without a snapshot file. Vision rays are
//! cast over the static grid so the overlay has something to show; nothing
//! here moves or updates the world.

use crate::types::{
    Cell, DetectedCell, Grid, GridError, GridPos, Item, Snake, VisionRay, WorldSnapshot,
};

/// The eight sensor directions as `(d_row, d_col)`, clockwise from north.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const DEMO_ROWS: [&str; 12] = [
    "################",
    "#..............#",
    "#..a...........#",
    "#..............#",
    "#.......a......#",
    "#.....####.....#",
    "#..............#",
    "#..........a...#",
    "#..............#",
    "#..............#",
    "#..............#",
    "################",
];

/// Walk from `from` in `dir` until a wall or the grid edge.
///
/// Apples and snake cells met on the way are recorded nearest first; the cell
/// that stops the ray is always appended, so the result is never empty.
pub fn cast_ray(grid: &Grid, from: GridPos, dir: (isize, isize)) -> VisionRay {
    let mut nearest_cells = Vec::new();
    let mut at = from;

    loop {
        let next = step(at, dir).filter(|&p| grid.contains(p));
        let Some(next) = next else {
            nearest_cells.push(DetectedCell::new(at, item_for(grid.get(at))));
            break;
        };
        at = next;

        match grid.get(at) {
            Some(Cell::Wall) => {
                nearest_cells.push(DetectedCell::new(at, Item::Wall));
                break;
            }
            Some(Cell::Apple) => nearest_cells.push(DetectedCell::new(at, Item::Apple)),
            Some(Cell::Snake) => nearest_cells.push(DetectedCell::new(at, Item::Snake)),
            _ => {}
        }
    }

    VisionRay::new(from, at, nearest_cells)
}

/// Rays in all eight directions from a snake's head.
pub fn full_vision(grid: &Grid, snake: &Snake) -> Vec<VisionRay> {
    match snake.head() {
        Some(head) => DIRECTIONS.iter().map(|&d| cast_ray(grid, head, d)).collect(),
        None => Vec::new(),
    }
}

/// Stamp snake bodies onto the grid, then attach vision to each snake.
pub fn build_world(mut grid: Grid, bodies: Vec<Vec<GridPos>>) -> WorldSnapshot {
    for &pos in bodies.iter().flatten() {
        grid.set(pos, Cell::Snake);
    }

    let snakes = bodies
        .into_iter()
        .map(|body| {
            let snake = Snake::new(body);
            let vision = full_vision(&grid, &snake);
            snake.with_vision(vision)
        })
        .collect();

    WorldSnapshot::new(grid, snakes)
}

pub fn demo_world() -> Result<WorldSnapshot, GridError> {
    let grid = Grid::from_rows(&DEMO_ROWS)?;

    let p = GridPos::new;
    Ok(build_world(
        grid,
        vec![
            vec![p(8, 2), p(8, 3), p(8, 4), p(7, 4), p(6, 4)],
            vec![p(3, 12), p(3, 11), p(3, 10), p(4, 10)],
        ],
    ))
}

fn step(pos: GridPos, (dr, dc): (isize, isize)) -> Option<GridPos> {
    let row = pos.row.checked_add_signed(dr)?;
    let col = pos.col.checked_add_signed(dc)?;
    Some(GridPos::new(row, col))
}

fn item_for(cell: Option<Cell>) -> Item {
    match cell {
        Some(Cell::Wall) => Item::Wall,
        Some(Cell::Snake) => Item::Snake,
        Some(Cell::Apple) => Item::Apple,
        Some(Cell::Empty) | Some(Cell::Unclassified) | None => Item::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorldView;

    #[test]
    fn demo_rows_parse() {
        assert!(Grid::from_rows(&DEMO_ROWS).is_ok());
    }

    #[test]
    fn ray_stops_at_wall() {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]).unwrap();
        let ray = cast_ray(&grid, GridPos::new(1, 1), (0, 1));
        assert_eq!(ray.end_point, GridPos::new(1, 4));
        assert_eq!(ray.nearest_cells, vec![DetectedCell::new(GridPos::new(1, 4), Item::Wall)]);
    }

    #[test]
    fn ray_lists_items_nearest_first() {
        let grid = Grid::from_rows(&["#######", "#.a.s.#", "#######"]).unwrap();
        let ray = cast_ray(&grid, GridPos::new(1, 1), (0, 1));
        let items: Vec<_> = ray.nearest_cells.iter().map(|d| d.item).collect();
        assert_eq!(items, vec![Item::Apple, Item::Snake, Item::Wall]);
        assert_eq!(ray.nearest().map(|d| d.coord), Some(GridPos::new(1, 2)));
    }

    #[test]
    fn ray_without_walls_ends_at_grid_edge() {
        let grid = Grid::filled(3, 3, Cell::Empty);
        let ray = cast_ray(&grid, GridPos::new(1, 1), (-1, -1));
        assert_eq!(ray.end_point, GridPos::new(0, 0));
        assert_eq!(ray.nearest_cells, vec![DetectedCell::new(GridPos::new(0, 0), Item::Empty)]);
    }

    #[test]
    fn demo_world_has_vision_for_every_snake() {
        let world = demo_world().unwrap();
        assert_eq!(world.snakes().len(), 2);
        for snake in world.snakes() {
            assert_eq!(snake.full_vision.len(), DIRECTIONS.len());
            for ray in &snake.full_vision {
                assert_eq!(Some(ray.center), snake.head());
                assert!(ray.nearest().is_some());
                assert!(world.grid().contains(ray.end_point));
            }
        }
    }

    #[test]
    fn demo_world_passes_render_checks() {
        let world = demo_world().unwrap();
        assert!(crate::term::validate_world(&world, true).is_ok());
    }

    #[test]
    fn demo_world_marks_bodies_on_grid() {
        let world = demo_world().unwrap();
        for snake in world.snakes() {
            for &pos in &snake.body {
                assert_eq!(world.grid().get(pos), Some(Cell::Snake));
            }
        }
    }
}
