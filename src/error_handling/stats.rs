//! Pipeline statistics tracking.
//!
//! Thread-safe counters shared by the producer and every worker of a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe pipeline statistics tracker.
///
/// Counts what the producer emitted, what workers finished, and the failures
/// workers swallowed, grouped by `FailureKind`. Every counter is atomic, so a
/// single instance is shared across tasks behind an `Arc`.
pub struct PipelineStats {
    records_read: AtomicUsize,
    batches_sent: AtomicUsize,
    batches_processed: AtomicUsize,
    batches_failed: AtomicUsize,
    records_written: AtomicUsize,
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        PipelineStats {
            records_read: AtomicUsize::new(0),
            batches_sent: AtomicUsize::new(0),
            batches_processed: AtomicUsize::new(0),
            batches_failed: AtomicUsize::new(0),
            records_written: AtomicUsize::new(0),
            failures,
        }
    }

    pub fn add_records_read(&self, count: usize) {
        self.records_read.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_batches_sent(&self) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a batch (or file) a worker finished, with the records it wrote.
    pub fn record_success(&self, records: usize) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
        self.records_written.fetch_add(records, Ordering::Relaxed);
    }

    /// Records a batch (or file) a worker gave up on.
    pub fn record_failure(&self, kind: FailureKind) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        // Every kind is seeded in `new`
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn records_read(&self) -> usize {
        self.records_read.load(Ordering::SeqCst)
    }

    pub fn batches_sent(&self) -> usize {
        self.batches_sent.load(Ordering::SeqCst)
    }

    pub fn batches_processed(&self) -> usize {
        self.batches_processed.load(Ordering::SeqCst)
    }

    pub fn batches_failed(&self) -> usize {
        self.batches_failed.load(Ordering::SeqCst)
    }

    pub fn records_written(&self) -> usize {
        self.records_written.load(Ordering::SeqCst)
    }

    pub fn failure_count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_failures(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_failure_kind_is_counted() {
        let stats = PipelineStats::new();
        for kind in FailureKind::iter() {
            stats.record_failure(kind);
            assert_eq!(stats.failure_count(kind), 1);
        }
        let kinds = FailureKind::iter().count();
        assert_eq!(stats.batches_failed(), kinds);
        assert_eq!(stats.total_failures(), kinds);
        assert_eq!(stats.batches_processed(), 0);
    }
}
