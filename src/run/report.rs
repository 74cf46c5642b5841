//! End-of-run summary.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureKind, PipelineStats};
use crate::logging::Logger;

/// Results of one pipeline command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Command that produced the report (`extract`, `load-batch`, ...)
    pub command: &'static str,
    /// Records pulled from the cursor, or files found by the walker
    pub items_read: usize,
    /// Batches (or files) handed to workers
    pub batches_sent: usize,
    /// Batches (or files) a worker finished
    pub batches_processed: usize,
    /// Batches (or files) a worker gave up on
    pub batches_failed: usize,
    /// Records written to files or inserted
    pub records_written: usize,
    /// Non-zero failure counts by kind
    pub failures: Vec<(FailureKind, usize)>,
    /// Wall-clock duration in seconds
    pub elapsed_seconds: f64,
}

impl PipelineReport {
    pub fn from_stats(command: &'static str, stats: &PipelineStats, elapsed: Duration) -> Self {
        let failures = FailureKind::iter()
            .map(|kind| (kind, stats.failure_count(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();

        PipelineReport {
            command,
            items_read: stats.records_read(),
            batches_sent: stats.batches_sent(),
            batches_processed: stats.batches_processed(),
            batches_failed: stats.batches_failed(),
            records_written: stats.records_written(),
            failures,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    /// True when no worker swallowed a failure.
    pub fn is_clean(&self) -> bool {
        self.batches_failed == 0
    }

    /// Logs the summary line and, if any, the failure breakdown.
    pub fn log_summary(&self, logger: &dyn Logger) {
        logger.info(format_args!("{}", self));
        for (kind, count) in &self.failures {
            logger.warn(format_args!("   {}: {}", kind, count));
        }
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} read, {} batches sent, {} processed, {} failed, {} records written in {:.1}s",
            self.command,
            self.items_read,
            self.batches_sent,
            self.batches_processed,
            self.batches_failed,
            self.records_written,
            self.elapsed_seconds
        )
    }
}
