//! mongo_pipeline library: MongoDB extract/load over a bounded worker pool
//!
//! This library moves documents between a MongoDB collection and compact JSON
//! files. Query results are grouped into fixed-size batches and written by a
//! pool of workers; files are found by name prefix and inserted by a pool of
//! loaders. Every pool drains one bounded channel and is joined before a
//! command returns.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use log::LevelFilter;
//! use mongo_pipeline::config::{ConnectionSettings, ExtractConfig};
//! use mongo_pipeline::logging::FacadeLogger;
//! use mongo_pipeline::store::ConnectionHandler;
//! use mongo_pipeline::extract_batch;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = FacadeLogger::shared(LevelFilter::Info);
//! let settings = ConnectionSettings {
//!     conn_uri: "mongodb://localhost:27017".to_string(),
//!     db_name: "shop".to_string(),
//!     app_name: "exporter".to_string(),
//! };
//! let config = ExtractConfig {
//!     collection: "orders".to_string(),
//!     output_path: std::path::PathBuf::from("./dump"),
//!     batch_size: 500,
//!     workers: 8,
//!     ..Default::default()
//! };
//!
//! let handler = ConnectionHandler::connect(&settings, Arc::clone(&logger)).await?;
//! let orders = handler.collection(&config.collection);
//! let result = extract_batch(&orders, &config, logger).await;
//! handler.disconnect().await;
//!
//! let report = result?;
//! println!("{} documents in {} files", report.records_written, report.batches_processed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod error_handling;
pub mod files;
pub mod initialization;
pub mod logging;
pub mod pipeline;
mod run;
pub mod store;

// Re-export public API
pub use config::{
    Cli, Command, ConnectionSettings, ExtractConfig, LoadConfig, LogFormat, LogLevel,
};
pub use error_handling::{PipelineError, PipelineStats};
pub use run::{
    extract, extract_batch, load, load_batch, run_command, CommandOutcome, PipelineReport,
};
