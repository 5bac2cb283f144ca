#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Clash and Conquer skirmish.

mod scenario;
mod skirmish;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Runs a headless Clash and Conquer skirmish and prints its summary.
#[derive(Debug, Parser)]
#[command(name = "clash-conquer")]
struct Args {
    /// Scenario file in TOML format; the bundled skirmish is used when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for the generated enemy wave.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

/// Entry point for the Clash and Conquer command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::builtin().context("bundled scenario is invalid")?,
    };

    let summary = skirmish::run(&scenario, args.ticks, args.seed);

    if args.json {
        let encoded =
            serde_json::to_string_pretty(&summary).context("failed to encode summary as JSON")?;
        println!("{encoded}");
    } else {
        print!("{summary}");
    }

    Ok(())
}
