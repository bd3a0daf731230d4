//! Headless chunk streaming demo
//!
//! Walks an observer across the world and logs streaming diagnostics.
//! Run with `RUST_LOG=blockstream=debug` to see chunk admission and eviction.

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;

use blockstream::{ConfigError, World, WorldSettings, load_settings, save_settings};

/// Voxel chunk streaming demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u32>,

    /// Chebyshev radius in chunks to keep loaded
    #[arg(long)]
    load_radius: Option<i32>,

    /// Chebyshev radius in chunks past which chunks are dropped
    #[arg(long)]
    unload_radius: Option<i32>,

    /// Number of background generation threads
    #[arg(long)]
    workers: Option<usize>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Observer speed in blocks per tick along +X
    #[arg(long, default_value_t = 0.5)]
    speed: f32,

    /// Milliseconds to sleep between ticks
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Log diagnostics every N ticks
    #[arg(long, default_value_t = 60)]
    report_every: u32,

    /// Generate flat, treeless terrain
    #[arg(long, default_value_t = false)]
    flat: bool,

    /// Load settings from this bincode file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings to this file before starting
    #[arg(long)]
    save_settings: Option<PathBuf>,
}

fn build_settings(args: &Args) -> Result<WorldSettings, ConfigError> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => WorldSettings::default(),
    };

    if let Some(seed) = args.seed {
        settings.terrain.seed = seed;
    }
    if let Some(radius) = args.load_radius {
        settings.stream.load_radius = radius;
    }
    if let Some(radius) = args.unload_radius {
        settings.stream.unload_radius = radius;
    }
    if let Some(workers) = args.workers {
        settings.stream.worker_count = workers;
    }
    if args.flat {
        settings.terrain.amplitude = 0.0;
        settings.terrain.trees = false;
    }

    settings.validate()?;
    if let Some(path) = &args.save_settings {
        save_settings(path, &settings)?;
        tracing::info!("Saved settings to {}", path.display());
    }
    Ok(settings)
}

fn run(args: Args) -> Result<(), ConfigError> {
    let settings = build_settings(&args)?;
    let mut world = World::new(settings)?;

    let spawn = world.find_spawn_point();
    world.set_observer_position(spawn);
    tracing::info!("Spawn point at ({:.1}, {:.1}, {:.1})", spawn.x, spawn.y, spawn.z);

    let started = Instant::now();
    let step = Vec3::new(args.speed, 0.0, 0.0);
    let report_every = args.report_every.max(1);

    for tick in 1..=args.ticks {
        world.set_observer_position(world.observer_position() + step);
        world.tick();

        if tick % report_every == 0 {
            let stats = world.stats();
            let chunk = world.observer_chunk();
            tracing::info!(
                tick,
                chunk_x = chunk.x,
                chunk_z = chunk.z,
                loaded = stats.loaded_chunks,
                queued = stats.queued,
                generating = stats.generating,
                pending_results = stats.pending_results,
                pending_remesh = stats.pending_remesh,
                "streaming"
            );
        }
        thread::sleep(Duration::from_millis(args.tick_ms));
    }

    let vertices: usize = world.chunks().map(|c| c.mesh().vertex_count()).sum();
    tracing::info!(
        "Finished {} ticks in {:.2?}: {} chunks live, {} vertices",
        args.ticks,
        started.elapsed(),
        world.loaded_chunk_count(),
        vertices
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting chunk streaming demo...");
    if let Err(e) = run(Args::parse()) {
        tracing::error!("Failed to start world: {}", e);
        process::exit(1);
    }
}
