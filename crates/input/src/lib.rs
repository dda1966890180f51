//! Terminal input module for the snake viewer.
//!
//! Maps `crossterm` key events into [`ViewerAction`]s. The viewer never
//! steers snakes; keys only toggle what is drawn.

pub mod map;

pub use map::{handle_key_event, should_quit, ViewerAction};
