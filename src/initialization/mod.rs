//! Process-level initialization.
//!
//! Only the binary calls into this module: it installs the logging backend
//! and builds the injected logger handed to the library.

mod logger;

use std::sync::Arc;

use log::LevelFilter;

use crate::logging::{FacadeLogger, Logger};

// Re-export public API
pub use logger::init_logger_with;

/// Builds the logger injected into commands, gated at `level`.
pub fn init_pipeline_logger(level: LevelFilter) -> Arc<dyn Logger> {
    FacadeLogger::shared(level)
}
