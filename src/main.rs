//! Snake world viewer (default binary).
//!
//! Draws a world snapshot either into the terminal (interactive) or into a
//! PNG file (`--snapshot`). It uses crossterm for input and the framebuffer
//! renderer from `snakeview-term`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use snakeview::config::ViewerConfig;
use snakeview::input::{handle_key_event, should_quit, ViewerAction};
use snakeview::term::{DrawSurface, FrameBuffer, GridRenderer, RenderOptions, TerminalSurface};
use snakeview::types::{WorldSnapshot, WorldView};
use snakeview::world::load_world;

const POLL_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "snakeview")]
#[command(version, about = "Render snake simulation snapshots")]
struct Cli {
    /// Viewer configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// World snapshot to draw (JSON); the built-in demo world is used otherwise
    #[arg(long)]
    world: Option<PathBuf>,

    /// Overlay vision rays
    #[arg(long)]
    vision: bool,

    /// Disable checkerboard shading of empty cells
    #[arg(long)]
    no_grid: bool,

    /// Render a single frame to this PNG file instead of the terminal
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    let mut opts = config.options();
    opts.show_vision |= cli.vision;
    opts.show_grid &= !cli.no_grid;

    let world = load_world(cli.world.as_deref())?;

    match &cli.snapshot {
        Some(out) => write_snapshot(&config, &world, opts, out),
        None => run_terminal(&config, &cli, world, opts),
    }
}

fn write_snapshot(
    config: &ViewerConfig,
    world: &WorldSnapshot,
    opts: RenderOptions,
    out: &Path,
) -> Result<()> {
    let width = config.bbox.x.max(0) as u32 + config.bbox.width.max(0) as u32;
    let height = config.bbox.y.max(0) as u32 + config.bbox.height.max(0) as u32;
    let fb = FrameBuffer::new(width, height);

    let render_config = config.render_config(world.grid().shape(), fb.size());
    let mut renderer = GridRenderer::with_palette(fb, render_config, config.palette())?;
    renderer.render_frame(world, opts)?;

    let fb = renderer.into_surface();
    let img = image::RgbImage::from_fn(fb.width(), fb.height(), |x, y| {
        let c = fb.get(x, y).unwrap_or_default();
        image::Rgb([c.r, c.g, c.b])
    });
    img.save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!("wrote {}x{} snapshot to {}", width, height, out.display());
    Ok(())
}

fn run_terminal(
    config: &ViewerConfig,
    cli: &Cli,
    world: WorldSnapshot,
    opts: RenderOptions,
) -> Result<()> {
    let surface = TerminalSurface::open()?;
    let render_config = config.render_config(world.grid().shape(), surface.size());
    let mut renderer = GridRenderer::with_palette(surface, render_config, config.palette())?;

    let result = run(&mut renderer, config, cli, world, opts);

    // Always try to restore terminal state.
    let _ = renderer.into_surface().close();
    result
}

fn run(
    renderer: &mut GridRenderer<TerminalSurface>,
    config: &ViewerConfig,
    cli: &Cli,
    mut world: WorldSnapshot,
    mut opts: RenderOptions,
) -> Result<()> {
    let mut dirty = true;

    loop {
        if dirty {
            renderer.render_frame(&world, opts)?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(POLL_MS))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                match handle_key_event(key) {
                    Some(ViewerAction::ToggleGrid) => opts.show_grid = !opts.show_grid,
                    Some(ViewerAction::ToggleVision) => opts.show_vision = !opts.show_vision,
                    Some(ViewerAction::ToggleBackground) => {
                        opts.clear_background = !opts.clear_background
                    }
                    Some(ViewerAction::Reload) => match load_world(cli.world.as_deref()) {
                        Ok(fresh) => {
                            let fitted =
                                config.render_config(fresh.grid().shape(), renderer.surface().size());
                            renderer.set_config(fitted)?;
                            world = fresh;
                        }
                        Err(err) => warn!("reload failed, keeping previous world: {err:#}"),
                    },
                    None => continue,
                }
                dirty = true;
            }
            Event::Resize(cols, rows) => {
                renderer.surface_mut().resize(cols, rows);
                let fitted = config.render_config(world.grid().shape(), renderer.surface().size());
                renderer.set_config(fitted)?;
                dirty = true;
            }
            _ => {}
        }
    }
}
