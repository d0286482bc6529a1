//! Headless host for the plant and flock engines.
//!
//! CLI commands:
//! - plant: grow the scene's plant and summarise the primitives
//! - flock: run the scene's flock and summarise the trajectories
//!
//! With `--dump` the raw stream is written to stdout as JSON; logs go to
//! stderr either way.

mod logging;
mod scene;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scene::Scene;
use serde::Serialize;
use sim_core::flock::{BehaviorState, FlockSimulator, Keyframe, Trajectory};
use sim_core::presets::grow;
use sim_core::turtle::Primitive;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sim-run")]
#[command(about = "Procedural plants and flocks without a host scene")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a scene YAML; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the plant grammar and walk it with the turtle
    Plant {
        /// Override the scene's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of rewrite generations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Write the primitives to stdout as JSON
        #[arg(long)]
        dump: bool,
    },

    /// Simulate the flock for the configured number of ticks
    Flock {
        /// Override the scene's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of ticks
        #[arg(short, long)]
        ticks: Option<usize>,

        /// Write the trajectories to stdout as JSON
        #[arg(long)]
        dump: bool,

        /// Dump keyframes on the animation timeline instead of raw records
        #[arg(long, requires = "dump")]
        keyframes: bool,
    },
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let scene = match &cli.config {
        Some(path) => {
            tracing::info!("Loading scene from {:?}", path);
            Scene::load(path)?
        }
        None => {
            tracing::info!("No scene given, using defaults");
            Scene::default()
        }
    };

    match cli.command {
        Commands::Plant {
            seed,
            iterations,
            dump,
        } => {
            let mut params = scene.plant.params;
            if let Some(seed) = seed {
                params.seed = seed;
            }
            if let Some(iterations) = iterations {
                params.iterations = iterations;
            }
            let primitives = grow(&scene.plant.grammar, params).context("growing plant")?;
            summarise_plant(&primitives);
            if dump {
                write_json(&primitives)?;
            }
        }

        Commands::Flock {
            seed,
            ticks,
            dump,
            keyframes,
        } => {
            let mut params = scene.flock;
            if let Some(seed) = seed {
                params.seed = seed;
            }
            if let Some(ticks) = ticks {
                params.ticks = ticks;
            }
            let tick_duration = params.tick_duration;
            let length = params.ticks as f32 * tick_duration;

            let trajectories = FlockSimulator::new(params)
                .context("starting flock")?
                .run();
            summarise_flock(&trajectories);

            if dump && keyframes {
                let keys: Vec<Vec<Keyframe>> = trajectories
                    .iter()
                    .map(|t| t.keyframes(tick_duration, length))
                    .collect();
                write_json(&keys)?;
            } else if dump {
                write_json(&trajectories)?;
            }
        }
    }

    Ok(())
}

fn summarise_plant(primitives: &[Primitive]) {
    let mut segments = 0;
    let mut leaves = 0;
    let mut total_length = 0.0;
    for p in primitives {
        match p {
            Primitive::Segment(s) => {
                segments += 1;
                total_length += s.length();
            }
            Primitive::Leaf(_) => leaves += 1,
        }
    }
    tracing::info!(segments, leaves, total_length, "Plant grown");
}

fn summarise_flock(trajectories: &[Trajectory]) {
    let finals: Vec<BehaviorState> = trajectories
        .iter()
        .filter_map(|t| t.last().map(|r| r.state))
        .collect();
    let count = |s: BehaviorState| finals.iter().filter(|&&f| f == s).count();
    let ticks = trajectories.first().map_or(0, |t| t.records.len().saturating_sub(1));

    tracing::info!(
        agents = trajectories.len(),
        ticks,
        flocking = count(BehaviorState::Flocking),
        seeking = count(BehaviorState::Seeking),
        waiting = count(BehaviorState::Waiting),
        "Flock finished"
    );
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, value).context("writing JSON to stdout")?;
    println!();
    Ok(())
}
