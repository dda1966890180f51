//! snakeview (workspace facade crate).
//!
//! Re-exports the renderer crates under `snakeview::{types,term,input}` and
//! hosts the viewer's configuration, world loading and demo world.

pub use snakeview_input as input;
pub use snakeview_term as term;
pub use snakeview_types as types;

pub mod config;
pub mod demo;
pub mod world;
