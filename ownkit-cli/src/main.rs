//! ## ownkit-cli
//! **Demo driver for the ownkit buffer, heap and timer types**
//!
//! Loads the layered configuration, installs logging, runs one subcommand and
//! prints Prometheus metrics afterwards when `telemetry.metrics` is on.

use std::io::Write;

use clap::Parser;
use ownkit_telemetry::{EventLogger, MetricsRecorder};

mod commands;
mod error;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_ref())?;
    EventLogger::init(&config.telemetry.level)?;
    let metrics = MetricsRecorder::new()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Commands::Buffer(args) => commands::run_buffer(args, &config, &metrics, &mut out)?,
        Commands::Heap(args) => commands::run_heap(args, &config, &metrics, &mut out)?,
        Commands::Timer(args) => commands::run_timer(args, &mut out)?,
        Commands::Config => commands::run_config(&config, &mut out)?,
    }

    if config.telemetry.metrics && !matches!(cli.command, Commands::Config) {
        write!(out, "{}", metrics.gather_metrics()?)?;
    }
    Ok(())
}
