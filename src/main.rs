//! Scenario runner
//!
//! Loads a snapshot (plus creep knowledge) from JSON, registers the units in
//! it, runs the decision engine for a number of ticks and prints the intents
//! of each tick.

use std::fs;
use std::path::PathBuf;

use brood_mind::core::{load_thresholds, Result, Thresholds};
use brood_mind::driver::{DecisionEngine, TickDriver};
use brood_mind::intents::Intent;
use brood_mind::services::CreepMap;
use brood_mind::snapshot::Snapshot;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Run the decision engine against a recorded game state
#[derive(Parser, Debug)]
#[command(name = "brood-mind")]
#[command(about = "Run the per-tick decision engine against a scenario file")]
struct Args {
    /// Scenario JSON: a snapshot plus optional creep map
    #[arg(long)]
    scenario: PathBuf,

    /// Threshold preset (TOML); built-in defaults when omitted
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Ticks to run against the scenario
    #[arg(long, default_value_t = 1)]
    ticks: u64,

    /// Random seed for overlord spread
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Deserialize)]
struct Scenario {
    snapshot: Snapshot,
    #[serde(default)]
    creep: CreepMap,
}

#[derive(Serialize)]
struct TickOutput {
    tick: u64,
    game_time_secs: f32,
    intents: Vec<Intent>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brood_mind=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let thresholds = match &args.thresholds {
        Some(path) => load_thresholds(path)?,
        None => Thresholds::default(),
    };

    let scenario: Scenario = serde_json::from_str(&fs::read_to_string(&args.scenario)?)?;
    let mut creep = scenario.creep;
    creep.rebuild_index();
    let mut snapshot = scenario.snapshot;

    tracing::info!(
        scenario = %args.scenario.display(),
        thresholds = %thresholds.name,
        units = snapshot.units.len(),
        enemies = snapshot.enemy_units.len(),
        "scenario loaded"
    );

    let mut driver = TickDriver::with_seed(thresholds, creep, args.seed);
    driver.adopt_units(&snapshot)?;

    let first_tick = snapshot.tick;
    let mut outputs = Vec::new();
    for offset in 0..args.ticks {
        snapshot.tick = first_tick + offset;
        let intents = driver.on_tick(&snapshot);
        outputs.push(TickOutput {
            tick: snapshot.tick,
            game_time_secs: snapshot.game_time_secs,
            intents,
        });
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        for output in &outputs {
            println!(
                "=== tick {} at {:.1}s ({} intents) ===",
                output.tick,
                output.game_time_secs,
                output.intents.len()
            );
            for intent in &output.intents {
                println!("  {}", describe(intent));
            }
        }
    }

    Ok(())
}

fn describe(intent: &Intent) -> String {
    match intent {
        Intent::Command(c) if c.queued => format!("{} then {:?}", c.actor, c.action),
        Intent::Command(c) => format!("{} {:?}", c.actor, c.action),
        Intent::Macro(order) => format!("macro {:?}", order),
    }
}
