//! Error handling and pipeline statistics.
//!
//! This module provides:
//! - Error type definitions for configuration, store, file, and pipeline failures
//! - Failure categories for errors swallowed inside workers
//! - Thread-safe pipeline statistics
//!
//! Errors fall into three tiers:
//! - **Fatal**: configuration and initial connection errors, which end the process
//! - **Propagated**: source (cursor or walk) errors, which end the pipeline
//! - **Swallowed**: per-item failures inside workers, which are logged and counted

mod stats;
mod types;

// Re-export public API
pub use stats::PipelineStats;
pub use types::{
    ConfigError, FailureKind, FileError, InitializationError, ItemFailure, PipelineError,
    StoreError,
};
