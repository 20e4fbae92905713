//! # TESSERA Chase Demo
//!
//! Headless run of the chase scene:
//!
//! ```text
//! RUST_LOG=tessera=debug tessera --config chase.toml --ticks 1200 --seed 42
//! ```

mod components;
mod config;
mod simulation;
mod systems;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::components::{Health, Name};
use crate::config::DemoConfig;
use crate::simulation::Simulation;

#[derive(Parser)]
#[command(name = "tessera", about = "Headless ECS chase simulation")]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run, overriding the config
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Wander seed, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Entity capacity, overriding the config
    #[arg(long)]
    max_entities: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let ticks = config.simulation.ticks;
    info!(
        ticks,
        seed = config.simulation.seed,
        max_entities = config.world.max_entities,
        "starting chase"
    );

    let mut simulation = Simulation::new(config).context("building the chase scene")?;
    let summary = simulation.run(ticks);

    let player = simulation.player();
    let name = simulation
        .world()
        .try_get_component::<Name>(player)
        .map_or("<gone>", |name| name.0.as_str());
    let health = simulation
        .world()
        .try_get_component::<Health>(player)
        .map_or(0, |health| health.0);
    info!(
        player = %player,
        name,
        health,
        ticks = summary.ticks,
        destroyed = summary.destroyed,
        spawned = summary.spawned,
        rejected = summary.rejected,
        alive = summary.alive,
        enemies = summary.enemies,
        player_x = summary.player_position.x,
        player_y = summary.player_position.y,
        "chase finished"
    );
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DemoConfig> {
    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };

    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(max_entities) = args.max_entities {
        config.world.max_entities = max_entities;
    }
    config.validate()?;
    Ok(config)
}
