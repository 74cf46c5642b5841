//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, timeouts, exit codes)
//! - Library configuration types
//! - CLI option types and parsing

pub mod cli;
mod constants;
pub(crate) mod types;

// Re-export all constants
pub use cli::{
    parse_filter, Cli, CollectionExistsArgs, Command, ConnectionArgs, ExtractArgs,
    ExtractBatchArgs, LoadArgs, LoadBatchArgs, PingArgs,
};
pub use constants::*;
pub use types::{
    ConnectionSettings, EmptyBatchPolicy, ExtractConfig, LoadConfig, LogFormat, LogLevel,
};
