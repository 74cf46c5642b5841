//! Configuration types.
//!
//! These structs are the library-facing configuration. They can be built
//! programmatically without any CLI dependencies; `config::cli` converts the
//! parsed command line into them.

use std::path::PathBuf;

use clap::ValueEnum;
use mongodb::bson::Document;

use crate::config::constants::{DEFAULT_BATCH_SIZE, DEFAULT_PATH, DEFAULT_WORKERS, MAX_WORKERS};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What the batcher does with an empty residual batch at end of input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyBatchPolicy {
    /// Never emit an empty batch.
    #[default]
    Suppress,
    /// Always emit the residual batch, even when it holds no records.
    Send,
}

/// Where and how to reach the database.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    /// MongoDB connection string
    pub conn_uri: String,
    /// Database to operate on
    pub db_name: String,
    /// Application name reported to the server
    pub app_name: String,
}

impl ConnectionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conn_uri.trim().is_empty() {
            return Err(ConfigError::MissingValue("conn-uri"));
        }
        if self.db_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("db-name"));
        }
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("app-name"));
        }
        Ok(())
    }
}

/// Configuration for `extract` and `extract-batch`.
///
/// # Examples
///
/// ```no_run
/// use mongo_pipeline::ExtractConfig;
/// use std::path::PathBuf;
///
/// let config = ExtractConfig {
///     collection: "orders".to_string(),
///     output_path: PathBuf::from("/tmp/orders"),
///     batch_size: 500,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Collection to read from
    pub collection: String,
    /// File name prefix; the collection name is used when empty
    pub output_prefix: String,
    /// Directory that receives the JSON files
    pub output_path: PathBuf,
    /// Query filter passed to `find`
    pub filter: Document,
    /// Records per file
    pub batch_size: usize,
    /// Concurrent file writers
    pub workers: usize,
    /// Whether an empty residual batch is written
    pub empty_batches: EmptyBatchPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            collection: String::new(),
            output_prefix: String::new(),
            output_path: PathBuf::from(DEFAULT_PATH),
            filter: Document::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            empty_batches: EmptyBatchPolicy::Suppress,
        }
    }
}

impl ExtractConfig {
    /// Prefix actually used for output files.
    pub fn file_prefix(&self) -> &str {
        if self.output_prefix.is_empty() {
            &self.collection
        } else {
            &self.output_prefix
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::MissingValue("collection"));
        }
        validate_batch_size(self.batch_size)?;
        validate_workers(self.workers)
    }
}

/// Configuration for `load` and `load-batch`.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Collection to insert into
    pub collection: String,
    /// Only files whose name starts with this prefix are loaded
    pub file_prefix: String,
    /// Root of the recursive file search
    pub search_path: PathBuf,
    /// Concurrent file loaders
    pub workers: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            collection: String::new(),
            file_prefix: String::new(),
            search_path: PathBuf::from(DEFAULT_PATH),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl LoadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::MissingValue("collection"));
        }
        validate_workers(self.workers)
    }
}

pub(crate) fn validate_batch_size(batch_size: usize) -> Result<(), ConfigError> {
    if batch_size == 0 {
        return Err(ConfigError::InvalidBatchSize(batch_size));
    }
    Ok(())
}

pub(crate) fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(ConfigError::InvalidWorkerCount {
            value: workers,
            max: MAX_WORKERS,
        });
    }
    Ok(())
}
