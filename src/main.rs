//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mongo_pipeline` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use mongo_pipeline::config::EXIT_FAILURE;
use mongo_pipeline::initialization::{init_logger_with, init_pipeline_logger};
use mongo_pipeline::{run_command, Cli, CommandOutcome, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit 1; --help and --version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            eprint!("{}", e);
            process::exit(EXIT_FAILURE);
        }
        Err(e) => e.exit(),
    };

    let level: log::LevelFilter = cli.log_level.clone().into();
    let format = cli.log_format.clone();
    init_logger_with(level, format.clone()).context("Failed to initialize logger")?;
    let logger = init_pipeline_logger(level);

    match run_command(cli.command, logger).await {
        Ok(outcome) => {
            print_outcome(&outcome, &format);
            if outcome.is_failure() {
                process::exit(EXIT_FAILURE);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("mongo_pipeline error: {:#}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn print_outcome(outcome: &CommandOutcome, format: &LogFormat) {
    match outcome {
        CommandOutcome::Pipeline(report) if matches!(format, LogFormat::Json) => {
            match serde_json::to_string(report) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", report),
            }
        }
        CommandOutcome::Pipeline(report) => {
            let marker = if report.is_clean() { "✅" } else { "⚠️" };
            println!("{} {}", marker, report);
            for (kind, count) in &report.failures {
                println!("   {}: {}", kind, count);
            }
        }
        CommandOutcome::Ping(true) => println!("✅ Ping was successful"),
        CommandOutcome::Ping(false) => {
            println!("❌ Ping wasn't successful. Check your connection string or network.")
        }
        CommandOutcome::CollectionExists { collection, exists } => {
            println!("Collection {} exists? {}", collection, exists)
        }
    }
}
