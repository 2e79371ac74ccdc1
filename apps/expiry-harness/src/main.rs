//! Expiry Harness Binary
//!
//! Runs the OTM expiry scenario against the reference engine and exits
//! non-zero on the first failed check.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin expiry-harness
//! ```
//!
//! # Environment Variables
//!
//! - `HARNESS_CONFIG`: Path to the YAML config (default: `config.yaml`; when
//!   the file is absent the built-in SPX scenario is used)
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use expiry_harness::config::{Config, DEFAULT_CONFIG_PATH, load_config};
use expiry_harness::telemetry::init_logging;
use expiry_harness::{OtmExpiryScenario, SimulationRunner};

fn main() -> anyhow::Result<ExitCode> {
    let (config, source) = resolve_config()?;
    init_logging(&config.observability.logging).context("failed to initialize logging")?;

    tracing::info!(
        config = %source,
        underlying = %config.scenario.underlying,
        start = %config.simulation.start_date,
        end = %config.simulation.end_date,
        "Starting expiry harness"
    );

    let mut scenario = OtmExpiryScenario::new(config.scenario.to_params());
    let mut runner = SimulationRunner::new(config.simulation.clone())
        .context("failed to build simulated engine")?;

    match runner.run(&mut scenario) {
        Ok(summary) => {
            tracing::info!(
                selected = ?scenario.selected().map(ToString::to_string),
                ticks = summary.ticks,
                order_events = summary.order_events,
                notices = summary.notices,
                "Scenario passed"
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(reason = err.reason(), error = %err, "Scenario failed");
            eprintln!("scenario failed [{}]: {err}", err.reason());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load `HARNESS_CONFIG`, falling back to built-in defaults when the
/// default path does not exist.
fn resolve_config() -> anyhow::Result<(Config, String)> {
    match std::env::var("HARNESS_CONFIG") {
        Ok(path) if !path.is_empty() => {
            let config = load_config(Some(&path))
                .with_context(|| format!("failed to load config from {path}"))?;
            Ok((config, path))
        }
        _ if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let config = load_config(None).context("failed to load config.yaml")?;
            Ok((config, DEFAULT_CONFIG_PATH.to_string()))
        }
        _ => Ok((Config::default(), "built-in defaults".to_string())),
    }
}
