//! Rotation Sim - Entry Point
//!
//! Builds a simulation from an optional TOML loadout, runs the cast loop for
//! the requested number of ticks and prints the resulting DPS.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rotation_sim::{Result, Sim, SimConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Discrete-event combat rotation simulator
#[derive(Parser, Debug)]
#[command(name = "rotation-sim")]
#[command(about = "Simulate a spell rotation and report damage per second")]
struct Args {
    /// Loadout and run settings (TOML); defaults to a single test spell
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Ticks (milliseconds) to simulate
    #[arg(long, short = 'd')]
    duration: Option<u64>,

    /// Seed for the simulation RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Print the combat log
    #[arg(long, short = 'l')]
    log: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rotation_sim=info,combat=info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load_from_toml(path)?,
        None => SimConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.duration = duration;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.log |= args.log;

    tracing::debug!(?config, "loaded config");

    let mut sim = Sim::new(&config)?;
    let report = sim.run(config.duration)?;

    match args.format {
        OutputFormat::Text => println!("{}", report.summary()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
