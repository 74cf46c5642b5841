//! Fixed-size worker pool draining one bounded channel.
//!
//! All workers are spawned before anything is produced. Each worker loops
//! "receive → handle → repeat" until the channel is closed *and* drained.
//! `WorkerPool::join` is the completion barrier.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::config::types::validate_workers;
use crate::error_handling::{ConfigError, ItemFailure, PipelineError, PipelineStats};
use crate::logging::Logger;

/// Work applied by every worker to each received item.
#[async_trait]
pub trait ItemHandler<T: Send + 'static>: Send + Sync + 'static {
    /// Processes one item and returns the number of records it wrote.
    ///
    /// A failure is logged and counted by the pool; it never stops other workers.
    async fn handle(&self, worker_id: usize, item: T) -> Result<usize, ItemFailure>;
}

/// N workers sharing one bounded MPMC channel of capacity N.
pub struct WorkerPool<T> {
    sender: Sender<T>,
    workers: Vec<JoinHandle<()>>,
    logger: Arc<dyn Logger>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawns `num_workers` workers on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWorkerCount` when `num_workers` is zero or
    /// above `MAX_WORKERS`.
    pub fn spawn<H>(
        num_workers: usize,
        handler: Arc<H>,
        logger: Arc<dyn Logger>,
        stats: Arc<PipelineStats>,
    ) -> Result<Self, ConfigError>
    where
        H: ItemHandler<T>,
    {
        validate_workers(num_workers)?;

        let (sender, receiver) = async_channel::bounded(num_workers);
        let workers = (0..num_workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    receiver.clone(),
                    Arc::clone(&handler),
                    Arc::clone(&logger),
                    Arc::clone(&stats),
                ))
            })
            .collect();

        logger.debug(format_args!("Spawned {} workers", num_workers));

        Ok(WorkerPool {
            sender,
            workers,
            logger,
        })
    }

    /// A producer handle onto the pool's channel.
    pub fn sender(&self) -> Sender<T> {
        self.sender.clone()
    }

    /// Sends one item, waiting while the channel is full.
    pub async fn submit(&self, item: T) -> Result<(), PipelineError> {
        self.sender
            .send(item)
            .await
            .map_err(|_| PipelineError::ChannelClosed)
    }

    /// Items sent but not yet received by a worker.
    pub fn queued(&self) -> usize {
        self.sender.len()
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Closes the channel and waits for every worker to drain it and exit.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::WorkerPanicked` if any worker panicked. All
    /// workers are awaited before the error is returned.
    pub async fn join(self) -> Result<(), PipelineError> {
        self.sender.close();

        let mut panicked = 0;
        let mut first_panic = String::new();
        for handle in self.workers {
            if let Err(e) = handle.await {
                panicked += 1;
                if first_panic.is_empty() {
                    first_panic = e.to_string();
                }
            }
        }

        if panicked > 0 {
            self.logger
                .error(format_args!("{} worker(s) panicked: {}", panicked, first_panic));
            return Err(PipelineError::WorkerPanicked {
                count: panicked,
                message: first_panic,
            });
        }

        self.logger.debug(format_args!("All workers finished"));
        Ok(())
    }
}

async fn run_worker<T, H>(
    worker_id: usize,
    receiver: Receiver<T>,
    handler: Arc<H>,
    logger: Arc<dyn Logger>,
    stats: Arc<PipelineStats>,
) where
    T: Send + 'static,
    H: ItemHandler<T>,
{
    // recv() only fails once the channel is closed and empty
    while let Ok(item) = receiver.recv().await {
        match handler.handle(worker_id, item).await {
            Ok(records) => stats.record_success(records),
            Err(failure) => {
                logger.error(format_args!("Worker {}: {}", worker_id, failure));
                stats.record_failure(failure.kind);
            }
        }
    }
    logger.debug(format_args!("Worker {} drained the channel", worker_id));
}
