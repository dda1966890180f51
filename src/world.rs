//! Loading world snapshots from JSON.
//!
//! Snapshots are checked against the renderer's rules (including the vision
//! rays) as they are loaded, so a bad file is reported here instead of
//! stopping the viewer mid-session.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::demo::demo_world;
use crate::term::validate_world;
use crate::types::{WorldSnapshot, WorldView};

/// Load the snapshot at `path`, or the demo world when no path is given.
pub fn load_world(path: Option<&Path>) -> Result<WorldSnapshot> {
    let Some(path) = path else {
        return Ok(demo_world()?);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read world {}", path.display()))?;
    let world =
        world_from_json(&text).with_context(|| format!("invalid world snapshot {}", path.display()))?;
    info!(
        "loaded world {}: grid {:?}, {} snakes",
        path.display(),
        world.grid().shape(),
        world.snakes().len()
    );
    Ok(world)
}

pub fn world_from_json(text: &str) -> Result<WorldSnapshot> {
    let world: WorldSnapshot = serde_json::from_str(text)?;
    validate_world(&world, true)?;
    Ok(world)
}
