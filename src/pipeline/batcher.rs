//! Fixed-size batch accumulation.

use std::mem;

use crate::config::EmptyBatchPolicy;

/// Accumulates items into batches of exactly `batch_size`.
///
/// `push` hands back a full batch as soon as one is ready; `finish` hands back
/// the residual. Whether an empty residual is returned depends on the
/// `EmptyBatchPolicy`.
#[derive(Debug)]
pub struct Batcher<T> {
    batch_size: usize,
    policy: EmptyBatchPolicy,
    buffer: Vec<T>,
    emitted: usize,
}

impl<T> Batcher<T> {
    /// `batch_size` must be at least 1; callers validate it through the config.
    pub fn new(batch_size: usize, policy: EmptyBatchPolicy) -> Self {
        let batch_size = batch_size.max(1);
        Batcher {
            batch_size,
            policy,
            buffer: Vec::with_capacity(batch_size),
            emitted: 0,
        }
    }

    /// Adds an item; returns a batch when the buffer reaches `batch_size`.
    pub fn push(&mut self, item: T) -> Option<Vec<T>> {
        self.buffer.push(item);
        if self.buffer.len() >= self.batch_size {
            self.emitted += 1;
            let full = mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
            Some(full)
        } else {
            None
        }
    }

    /// Returns the residual batch, if the policy allows emitting it.
    pub fn finish(mut self) -> Option<Vec<T>> {
        if self.buffer.is_empty() && self.policy == EmptyBatchPolicy::Suppress {
            return None;
        }
        self.emitted += 1;
        Some(mem::take(&mut self.buffer))
    }

    /// Items currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Batches handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
