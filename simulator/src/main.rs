//! simulator: run a rule-language simulation and print its narrative
//!
//! Usage:
//!   simulator --config simulation.toml
//!   simulator --rules rules.txt --initial-conditions world.txt --lexicon lexicon.txt
//!   simulator --config simulation.toml --seed 7 --output report.txt -vv

use anyhow::{Context, Result};
use clap::Parser;
use rule_engine::{Monitor, Simulation, SimulationConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "simulator",
    about = "Run a stochastic rule-language simulation over a semantic network",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Simulation config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rules file
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Initial-conditions file
    #[arg(long)]
    initial_conditions: Option<PathBuf>,

    /// Lexical-expressions file
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long)]
    frames: Option<u32>,

    /// Random seed (default: current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the narrative report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also dump the per-tick history as JSON
    #[arg(long)]
    history_json: Option<PathBuf>,

    /// Log more (-v for rule firings, -vv for probability accounting)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let mut simulation = Simulation::from_config(&config).context("failed to prepare simulation")?;
    simulation.run(config.frames).context("simulation aborted")?;

    let report = Monitor::new(simulation.lexicon())
        .render(simulation.universe())
        .context("failed to render report")?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "wrote report");
        }
        None => print!("{}", report),
    }

    if let Some(path) = &cli.history_json {
        let history = serde_json::to_string_pretty(simulation.universe().history())?;
        std::fs::write(path, history)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        info!(path = %path.display(), "wrote history");
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let default = format!("simulator={level},rule_engine={level},world_model={level}");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}

/// The config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(rules) = &cli.rules {
        config.rules = rules.clone();
    }
    if let Some(initial_conditions) = &cli.initial_conditions {
        config.initial_conditions = initial_conditions.clone();
    }
    if let Some(lexicon) = &cli.lexicon {
        config.lexicon = lexicon.clone();
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}
