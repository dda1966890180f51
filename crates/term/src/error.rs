use std::io;

use thiserror::Error;

use snakeview_types::GridPos;

/// The renderer or its surface could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("drawing surface has no drawable area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },
    #[error("stdout is not a terminal")]
    NotATerminal,
    #[error("terminal backend unavailable: {0}")]
    Backend(#[from] io::Error),
}

/// A frame could not be rendered. Malformed snapshots are rejected before any
/// draw command is issued.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("snake {snake} has an empty body")]
    EmptyBody { snake: usize },
    #[error("head of snake {snake} at {pos:?} lies outside the grid")]
    HeadOutOfBounds { snake: usize, pos: GridPos },
    #[error("vision ray {ray} of snake {snake} has no detections")]
    NoDetection { snake: usize, ray: usize },
    #[error("vision ray {ray} of snake {snake} reaches {pos:?} outside the grid")]
    RayOutOfBounds {
        snake: usize,
        ray: usize,
        pos: GridPos,
    },
    #[error("nearest detection of ray {ray} of snake {snake} at {pos:?} lies outside the grid")]
    DetectionOutOfBounds {
        snake: usize,
        ray: usize,
        pos: GridPos,
    },
    #[error("failed to present frame: {0}")]
    Present(#[from] io::Error),
}
