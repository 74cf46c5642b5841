//! Producers: drain a source stream into a pool's channel.
//!
//! Both pumps close the channel on every exit path. A source error stops
//! production immediately; whatever was already sent is still processed by
//! the workers, so callers must still `join` the pool before returning.

use std::error::Error as StdError;

use async_channel::Sender;
use futures::{Stream, StreamExt};

use super::batcher::Batcher;
use crate::error_handling::{PipelineError, PipelineStats};
use crate::logging::Logger;

/// What a pump sent before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Items pulled from the source
    pub records: usize,
    /// Messages sent into the channel
    pub batches: usize,
}

/// Groups source records into batches and sends each batch into `sender`.
///
/// # Errors
///
/// - `PipelineError::Source` when the stream yields an error; the partially
///   filled batch is dropped.
/// - `PipelineError::ChannelClosed` when no worker is left to receive.
pub async fn pump_batches<T, E, S>(
    source: S,
    mut batcher: Batcher<T>,
    sender: &Sender<Vec<T>>,
    stats: &PipelineStats,
    logger: &dyn Logger,
) -> Result<PumpSummary, PipelineError>
where
    S: Stream<Item = Result<T, E>>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut source = std::pin::pin!(source);
    let mut summary = PumpSummary::default();

    let result = async {
        while let Some(next) = source.next().await {
            let record = next.map_err(|e| PipelineError::Source {
                records_read: summary.records,
                source: e.into(),
            })?;
            summary.records += 1;
            stats.add_records_read(1);

            if let Some(batch) = batcher.push(record) {
                send(sender, batch, &mut summary, stats, logger).await?;
            }
        }

        if let Some(residual) = batcher.finish() {
            send(sender, residual, &mut summary, stats, logger).await?;
        }
        Ok(())
    }
    .await;

    sender.close();
    match result {
        Ok(()) => {
            logger.debug(format_args!(
                "Pump finished: {} records in {} batches",
                summary.records, summary.batches
            ));
            Ok(summary)
        }
        Err(e) => {
            logger.error(format_args!("Pump stopped: {}", e));
            Err(e)
        }
    }
}

/// Sends every source item into `sender` unbatched.
///
/// Same error and closing behavior as `pump_batches`.
pub async fn pump_items<T, E, S>(
    source: S,
    sender: &Sender<T>,
    stats: &PipelineStats,
    logger: &dyn Logger,
) -> Result<PumpSummary, PipelineError>
where
    S: Stream<Item = Result<T, E>>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let mut source = std::pin::pin!(source);
    let mut summary = PumpSummary::default();

    let result = async {
        while let Some(next) = source.next().await {
            let item = next.map_err(|e| PipelineError::Source {
                records_read: summary.records,
                source: e.into(),
            })?;
            summary.records += 1;
            stats.add_records_read(1);

            sender
                .send(item)
                .await
                .map_err(|_| PipelineError::ChannelClosed)?;
            summary.batches += 1;
            stats.increment_batches_sent();
        }
        Ok(())
    }
    .await;

    sender.close();
    match result {
        Ok(()) => Ok(summary),
        Err(e) => {
            logger.error(format_args!("Producer stopped: {}", e));
            Err(e)
        }
    }
}

async fn send<T>(
    sender: &Sender<Vec<T>>,
    batch: Vec<T>,
    summary: &mut PumpSummary,
    stats: &PipelineStats,
    logger: &dyn Logger,
) -> Result<(), PipelineError> {
    let len = batch.len();
    sender
        .send(batch)
        .await
        .map_err(|_| PipelineError::ChannelClosed)?;
    summary.batches += 1;
    stats.increment_batches_sent();
    logger.debug(format_args!(
        "Sent batch {} ({} records)",
        summary.batches, len
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyBatchPolicy;
    use crate::logging::MemoryLogger;
    use futures::stream;
    use log::LevelFilter;

    fn ok_stream(n: usize) -> impl Stream<Item = Result<usize, std::io::Error>> {
        stream::iter((0..n).map(Ok))
    }

    #[tokio::test]
    async fn test_pump_batches_sends_all_and_closes() {
        let (tx, rx) = async_channel::unbounded();
        let stats = PipelineStats::new();
        let logger = MemoryLogger::new(LevelFilter::Off);

        let summary = pump_batches(
            ok_stream(25),
            Batcher::new(10, EmptyBatchPolicy::Suppress),
            &tx,
            &stats,
            &logger,
        )
        .await
        .unwrap();

        assert_eq!(summary, PumpSummary { records: 25, batches: 3 });
        assert!(tx.is_closed());

        let mut sizes = Vec::new();
        let mut all = Vec::new();
        while let Ok(batch) = rx.recv().await {
            sizes.push(batch.len());
            all.extend(batch);
        }
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(all, (0..25).collect::<Vec<_>>());
        assert_eq!(stats.records_read(), 25);
        assert_eq!(stats.batches_sent(), 3);
    }

    #[tokio::test]
    async fn test_pump_batches_source_error_closes_channel() {
        let (tx, rx) = async_channel::unbounded();
        let stats = PipelineStats::new();
        let logger = MemoryLogger::new(LevelFilter::Error);

        let items: Vec<Result<usize, std::io::Error>> = vec![
            Ok(1),
            Ok(2),
            Ok(3),
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "bad document")),
            Ok(4),
        ];
        let result = pump_batches(
            stream::iter(items),
            Batcher::new(2, EmptyBatchPolicy::Suppress),
            &tx,
            &stats,
            &logger,
        )
        .await;

        match result {
            Err(PipelineError::Source { records_read, .. }) => assert_eq!(records_read, 3),
            other => panic!("expected a source error, got {other:?}"),
        }
        assert!(tx.is_closed());

        // The full batch sent before the error is still delivered; the partial one is dropped
        assert_eq!(rx.recv().await.unwrap(), vec![1, 2]);
        assert!(rx.recv().await.is_err());
        assert_eq!(logger.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_pump_batches_empty_source_with_send_policy() {
        let (tx, rx) = async_channel::unbounded::<Vec<usize>>();
        let stats = PipelineStats::new();
        let logger = MemoryLogger::new(LevelFilter::Off);

        let summary = pump_batches(
            ok_stream(0),
            Batcher::new(4, EmptyBatchPolicy::Send),
            &tx,
            &stats,
            &logger,
        )
        .await
        .unwrap();

        assert_eq!(summary.batches, 1);
        assert!(rx.recv().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pump_batches_reports_closed_channel() {
        let (tx, rx) = async_channel::bounded::<Vec<usize>>(1);
        drop(rx);
        let stats = PipelineStats::new();
        let logger = MemoryLogger::new(LevelFilter::Off);

        let result = pump_batches(
            ok_stream(3),
            Batcher::new(1, EmptyBatchPolicy::Suppress),
            &tx,
            &stats,
            &logger,
        )
        .await;
        assert!(matches!(result, Err(PipelineError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_pump_items_forwards_each_item() {
        let (tx, rx) = async_channel::unbounded();
        let stats = PipelineStats::new();
        let logger = MemoryLogger::new(LevelFilter::Off);

        let summary = pump_items(ok_stream(4), &tx, &stats, &logger).await.unwrap();
        assert_eq!(summary, PumpSummary { records: 4, batches: 4 });

        let mut received = Vec::new();
        while let Ok(item) = rx.recv().await {
            received.push(item);
        }
        assert_eq!(received, vec![0, 1, 2, 3]);
    }
}
