//! Error type definitions.
//!
//! This module defines the error types returned by the library and the
//! failure categories counted by `PipelineStats`.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Invalid or missing configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required value was empty.
    #[error("Missing required value: --{0}")]
    MissingValue(&'static str),

    /// Batch size must be at least one record.
    #[error("Invalid batch size {0}: must be at least 1")]
    InvalidBatchSize(usize),

    /// Worker count out of range.
    #[error("Invalid worker count {value}: must be between 1 and {max}")]
    InvalidWorkerCount { value: usize, max: usize },

    /// The `--query` filter could not be turned into a document.
    #[error("Invalid query filter: {0}")]
    InvalidQuery(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The connection string or client options were rejected.
    #[error("Invalid connection options: {0}")]
    Options(#[source] mongodb::error::Error),

    /// The server could not be reached when the handle was opened.
    #[error("Could not connect to MongoDB: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// Listing collections failed.
    #[error("Could not list collections of `{database}`: {source}")]
    ListCollections {
        database: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// The `find` command failed or the cursor broke while iterating.
    #[error("Query on `{collection}` failed: {source}")]
    Query {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// `insert_many` failed.
    #[error("Insert into `{collection}` failed: {source}")]
    Insert {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },
}

/// Error types for reading and writing JSON record files.
#[derive(Error, Debug)]
pub enum FileError {
    /// Filesystem access failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of objects.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An array element could not be converted into a document.
    #[error("Element {index} of {} is not a valid document: {reason}", path.display())]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    /// Records could not be serialized.
    #[error("Could not serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors that end a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    File(#[from] FileError),

    /// The source stream (cursor or walker) failed; production stopped.
    #[error("Source failed after {records_read} records: {source}")]
    Source {
        records_read: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every worker is gone, so the channel no longer accepts items.
    #[error("Worker channel closed before production finished")]
    ChannelClosed,

    /// At least one worker panicked.
    #[error("{count} worker(s) panicked: {message}")]
    WorkerPanicked { count: usize, message: String },
}

/// Per-item failures swallowed inside workers.
///
/// These never stop a pipeline; they are logged and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Writing a batch file failed
    WriteFile,
    /// Reading or decoding a record file failed
    ReadFile,
    /// `insert_many` failed
    Insert,
    /// Any other handler failure
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::WriteFile => "File write error",
            FailureKind::ReadFile => "File read error",
            FailureKind::Insert => "Insert error",
            FailureKind::Other => "Other error",
        }
    }
}

/// A failed item inside a worker, tagged with its category.
#[derive(Error, Debug)]
#[error("{kind}: {error:#}")]
pub struct ItemFailure {
    pub kind: FailureKind,
    pub error: anyhow::Error,
}

impl ItemFailure {
    pub fn new(kind: FailureKind, error: impl Into<anyhow::Error>) -> Self {
        ItemFailure {
            kind,
            error: error.into(),
        }
    }
}
