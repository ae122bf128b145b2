//! YieldFarm scenario simulator.
//!
//! Replays a JSON scenario against an in-memory ledger and prints a JSON
//! report on stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! SCENARIO_PATH=scenario.json GENESIS_TIMESTAMP=1700000000 cargo run --bin yield-sim
//!
//! # Structured logs
//! LOG_FORMAT=json RUST_LOG=yield_engine=debug cargo run --bin yield-sim
//! ```

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use yield_common::config::{AppConfig, LogFormat};
use yield_simulator::runner;
use yield_simulator::scenario::Scenario;

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("yield_engine=info,yield_simulator=info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    tracing::info!(
        scenario = %config.scenario_path,
        ledger = %config.ledger_address,
        genesis = config.genesis_timestamp,
        "YieldFarm simulator starting..."
    );

    let raw = std::fs::read_to_string(&config.scenario_path)
        .with_context(|| format!("reading scenario {}", config.scenario_path))?;
    let scenario = Scenario::from_json(&raw)
        .with_context(|| format!("parsing scenario {}", config.scenario_path))?;

    let report = runner::run(&config, &scenario)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
