//! Command execution.
//!
//! Each command opens at most one `ConnectionHandler`, runs its operation,
//! and disconnects before returning, whether the operation succeeded or not.

mod extract;
mod load;
mod report;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Command, ConnectionArgs, ConnectionSettings};
use crate::error_handling::ConfigError;
use crate::logging::Logger;
use crate::store::{self, ConnectionHandler};

pub use extract::{extract, extract_batch};
pub use load::{load, load_batch};
pub use report::PipelineReport;

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// `extract`, `extract-batch`, `load`, `load-batch`
    Pipeline(PipelineReport),
    /// `ping`: whether the server answered
    Ping(bool),
    /// `collection-exists`
    CollectionExists { collection: String, exists: bool },
}

impl CommandOutcome {
    /// Whether the process should report failure for this outcome.
    pub fn is_failure(&self) -> bool {
        matches!(self, CommandOutcome::Ping(false))
    }
}

/// Runs one parsed CLI command.
///
/// # Errors
///
/// Invalid options, a failed initial connection, and any error a pipeline
/// propagates. Failures swallowed by workers only show up in the report.
pub async fn run_command(command: Command, logger: Arc<dyn Logger>) -> Result<CommandOutcome> {
    match command {
        Command::Extract(args) => {
            let config = args.to_config().context("Invalid extract options")?;
            let handler = connect(&args.connection, &logger).await?;
            let collection = handler.collection(&config.collection);
            let result = extract(&collection, &config, Arc::clone(&logger)).await;
            handler.disconnect().await;
            let report = result.context("Extract failed")?;
            Ok(CommandOutcome::Pipeline(report))
        }
        Command::ExtractBatch(args) => {
            let config = args.to_config().context("Invalid extract-batch options")?;
            let handler = connect(&args.extract.connection, &logger).await?;
            let collection = handler.collection(&config.collection);
            let result = extract_batch(&collection, &config, Arc::clone(&logger)).await;
            handler.disconnect().await;
            let report = result.context("Batch extract failed")?;
            Ok(CommandOutcome::Pipeline(report))
        }
        Command::Load(args) => {
            let config = args.to_config().context("Invalid load options")?;
            let handler = connect(&args.connection, &logger).await?;
            let collection = handler.collection(&config.collection);
            let result = load(&collection, &config, Arc::clone(&logger)).await;
            handler.disconnect().await;
            let report = result.context("Load failed")?;
            Ok(CommandOutcome::Pipeline(report))
        }
        Command::LoadBatch(args) => {
            let config = args.to_config().context("Invalid load-batch options")?;
            let handler = connect(&args.load.connection, &logger).await?;
            let collection = Arc::new(handler.collection(&config.collection));
            let result = load_batch(collection, &config, Arc::clone(&logger)).await;
            handler.disconnect().await;
            let report = result.context("Batch load failed")?;
            Ok(CommandOutcome::Pipeline(report))
        }
        Command::Ping(args) => {
            let reachable = store::ping(&args.conn_uri, logger.as_ref())
                .await
                .context("Failed to ping server")?;
            if reachable {
                logger.info(format_args!("Ping was successful"));
            } else {
                logger.warn(format_args!(
                    "Ping wasn't successful. Check your connection string or network."
                ));
            }
            Ok(CommandOutcome::Ping(reachable))
        }
        Command::CollectionExists(args) => {
            if args.collection.trim().is_empty() {
                return Err(ConfigError::MissingValue("collection").into());
            }
            let handler = connect(&args.connection, &logger).await?;
            let result = handler.collection_exists(&args.collection).await;
            handler.disconnect().await;
            let exists = result.context("Failed to check collection")?;
            logger.info(format_args!(
                "Collection `{}` exists? {}",
                args.collection, exists
            ));
            Ok(CommandOutcome::CollectionExists {
                collection: args.collection,
                exists,
            })
        }
    }
}

async fn connect(args: &ConnectionArgs, logger: &Arc<dyn Logger>) -> Result<ConnectionHandler> {
    let settings = ConnectionSettings::from(args);
    settings
        .validate()
        .context("Invalid connection options")?;
    ConnectionHandler::connect(&settings, Arc::clone(logger))
        .await
        .context("Failed to open connection")
}
