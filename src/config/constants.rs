//! Configuration constants.
//!
//! Defaults shared by the CLI and the library configuration structs.

use std::time::Duration;

/// Default number of records per batch for `extract-batch`.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of concurrent workers (and channel capacity).
pub const DEFAULT_WORKERS: usize = 50;

/// Upper bound on workers. Each worker holds a batch in memory and, for loads,
/// a driver connection, so very large pools only add contention.
pub const MAX_WORKERS: usize = 1024;

/// Default directory for extracted files and for the load file search.
pub const DEFAULT_PATH: &str = ".";

/// Extension appended to every extracted file.
pub const OUTPUT_EXTENSION: &str = "json";

// Driver timeouts
/// TCP connect timeout for the connection handle.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Server selection timeout used by `ping` and the initial connection check.
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Log target used by the injected logger when forwarding to the `log` facade.
pub const LOG_TARGET: &str = "mongo_pipeline";

/// Exit code for any fatal configuration or connectivity error.
pub const EXIT_FAILURE: i32 = 1;
