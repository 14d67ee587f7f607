//! `cloudctl` — command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`config::Config`] from environment variables.
//! 3. Initialise logging (and OTLP span export when configured).
//! 4. Build a [`CloudHelpers`] handle; provider clients are created lazily.
//! 5. Run the command and print its JSON result on stdout.

mod commands;
mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use cloud_helpers::CloudHelpers;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = commands::Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level, cfg.otlp_endpoint())?;
    info!(version = env!("CARGO_PKG_VERSION"), "cloudctl starting");

    // -----------------------------------------------------------------------
    // 4. Helpers
    // -----------------------------------------------------------------------
    let helpers = CloudHelpers::from_env().context("failed to load helper settings")?;

    // -----------------------------------------------------------------------
    // 5. Command
    // -----------------------------------------------------------------------
    let result = commands::run(cli.command, &helpers).await;
    telemetry::shutdown();

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
