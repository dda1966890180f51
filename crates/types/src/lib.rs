//! World snapshot types - shared data structures for the snake viewer
//!
//! This crate defines the read-only world state handed to the renderer by an
//! external snake simulation. All types are plain data with serde support so a
//! simulation can dump a frame as JSON and the viewer can load it back.
//!
//! # Coordinates
//!
//! Every coordinate is a [`GridPos`] of `(row, col)`:
//!
//! - **row**: vertical index, 0 at the top
//! - **col**: horizontal index, 0 at the left
//!
//! Renderers map `col` to pixel X and `row` to pixel Y.
//!
//! # Grid Encoding
//!
//! Grids serialize as ASCII rows:
//!
//! | Char | Cell |
//! |------|------|
//! | `#` | wall |
//! | `.` | empty |
//! | `s` | snake body |
//! | `a` | apple |
//! | `?` | unclassified (never drawn) |
//!
//! # Examples
//!
//! ```
//! use snakeview_types::{Cell, Grid, GridPos, Snake, WorldSnapshot, WorldView};
//!
//! let grid = Grid::from_rows(&["#####", "#.a.#", "#####"]).unwrap();
//! assert_eq!(grid.shape(), (3, 5));
//! assert_eq!(grid.get(GridPos::new(1, 2)), Some(Cell::Apple));
//!
//! let snake = Snake::new(vec![GridPos::new(1, 1)]);
//! let world = WorldSnapshot::new(grid, vec![snake]);
//! assert_eq!(world.snakes()[0].head(), Some(GridPos::new(1, 1)));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `(row, col)` grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<GridPos> for (usize, usize) {
    fn from(pos: GridPos) -> Self {
        (pos.row, pos.col)
    }
}

/// Classification of a single grid cell.
///
/// Exactly one variant applies to every cell. `Unclassified` covers anything
/// the simulation could not tag; renderers skip those cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    Wall,
    #[default]
    Empty,
    Snake,
    Apple,
    Unclassified,
}

impl Cell {
    /// Parse a cell from its ASCII grid character.
    ///
    /// ```
    /// use snakeview_types::Cell;
    ///
    /// assert_eq!(Cell::from_char('#'), Some(Cell::Wall));
    /// assert_eq!(Cell::from_char('a'), Some(Cell::Apple));
    /// assert_eq!(Cell::from_char('x'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Empty),
            's' => Some(Cell::Snake),
            'a' => Some(Cell::Apple),
            '?' => Some(Cell::Unclassified),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Empty => '.',
            Cell::Snake => 's',
            Cell::Apple => 'a',
            Cell::Unclassified => '?',
        }
    }
}

/// Errors raised while building a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid of {height}x{width} needs {expected} cells, got {actual}")]
    ShapeMismatch {
        height: usize,
        width: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown cell character {ch:?} at ({row}, {col})")]
    UnknownCell { ch: char, row: usize, col: usize },
}

/// Row-major `height x width` array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRows", into = "GridRows")]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(height: usize, width: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = height * width;
        if cells.len() != expected {
            return Err(GridError::ShapeMismatch {
                height,
                width,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Grid filled with a single cell kind.
    pub fn filled(height: usize, width: usize, cell: Cell) -> Self {
        Self {
            height,
            width,
            cells: vec![cell; height * width],
        }
    }

    /// Parse a grid from ASCII rows (see the crate docs for the encoding).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(height * width);

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let actual = line.chars().count();
            if actual != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    actual,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(GridError::UnknownCell { ch, row, col })?;
                cells.push(cell);
            }
        }

        Self::new(height, width, cells)
    }

    /// Render the grid back into ASCII rows.
    pub fn to_rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height];
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.as_char()).collect())
            .collect()
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    #[inline(always)]
    fn idx(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.row * self.width + pos.col)
    }

    pub fn get(&self, pos: GridPos) -> Option<Cell> {
        self.idx(pos).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Out-of-range positions are ignored.
    pub fn set(&mut self, pos: GridPos, cell: Cell) {
        if let Some(i) = self.idx(pos) {
            self.cells[i] = cell;
        }
    }

    /// Iterate `(pos, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (GridPos::new(i / width, i % width), cell))
    }
}

#[derive(Serialize, Deserialize)]
struct GridRows {
    rows: Vec<String>,
}

impl TryFrom<GridRows> for Grid {
    type Error = GridError;

    fn try_from(value: GridRows) -> Result<Self, Self::Error> {
        Grid::from_rows(&value.rows)
    }
}

impl From<Grid> for GridRows {
    fn from(grid: Grid) -> Self {
        GridRows {
            rows: grid.to_rows(),
        }
    }
}

/// What a vision ray detected at a cell.
///
/// Only `Apple` and `Snake` are distinguished by renderers; the rest are
/// neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Empty,
    Wall,
    Snake,
    Apple,
}

/// A detection along a vision ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedCell {
    pub coord: GridPos,
    pub item: Item,
}

impl DetectedCell {
    pub fn new(coord: GridPos, item: Item) -> Self {
        Self { coord, item }
    }
}

/// A directional sensor anchored at `center` and ending at `end_point`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionRay {
    pub center: GridPos,
    pub end_point: GridPos,
    /// Detections ordered nearest to farthest.
    pub nearest_cells: Vec<DetectedCell>,
}

impl VisionRay {
    pub fn new(center: GridPos, end_point: GridPos, nearest_cells: Vec<DetectedCell>) -> Self {
        Self {
            center,
            end_point,
            nearest_cells,
        }
    }

    pub fn nearest(&self) -> Option<&DetectedCell> {
        self.nearest_cells.first()
    }
}

/// A snake: body segments in order, with the head last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub body: Vec<GridPos>,
    #[serde(default)]
    pub full_vision: Vec<VisionRay>,
}

impl Snake {
    pub fn new(body: Vec<GridPos>) -> Self {
        Self {
            body,
            full_vision: Vec::new(),
        }
    }

    pub fn with_vision(mut self, full_vision: Vec<VisionRay>) -> Self {
        self.full_vision = full_vision;
        self
    }

    /// The head is the last body segment.
    pub fn head(&self) -> Option<GridPos> {
        self.body.last().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Read-only access to the world a renderer draws.
pub trait WorldView {
    fn grid(&self) -> &Grid;
    fn snakes(&self) -> &[Snake];
}

/// Owned world state for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub grid: Grid,
    #[serde(default)]
    pub snakes: Vec<Snake>,
}

impl WorldSnapshot {
    pub fn new(grid: Grid, snakes: Vec<Snake>) -> Self {
        Self { grid, snakes }
    }
}

impl WorldView for WorldSnapshot {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn snakes(&self) -> &[Snake] {
        &self.snakes
    }
}

impl<W: WorldView + ?Sized> WorldView for &W {
    fn grid(&self) -> &Grid {
        (**self).grid()
    }

    fn snakes(&self) -> &[Snake] {
        (**self).snakes()
    }
}
