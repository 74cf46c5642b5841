//! `extract` and `extract-batch`: query results into JSON files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::Document;

use crate::config::ExtractConfig;
use crate::error_handling::{FailureKind, ItemFailure, PipelineError, PipelineStats};
use crate::files::{ensure_dir, write_batch};
use crate::logging::Logger;
use crate::pipeline::{pump_batches, Batcher, ItemHandler, WorkerPool};
use crate::store::RecordSource;

use super::report::PipelineReport;

/// Writes each received batch into its own file.
pub(crate) struct FileWriter {
    dir: PathBuf,
    prefix: String,
    logger: Arc<dyn Logger>,
}

impl FileWriter {
    pub(crate) fn new(dir: PathBuf, prefix: String, logger: Arc<dyn Logger>) -> Self {
        FileWriter {
            dir,
            prefix,
            logger,
        }
    }
}

#[async_trait]
impl ItemHandler<Vec<Document>> for FileWriter {
    async fn handle(&self, worker_id: usize, batch: Vec<Document>) -> Result<usize, ItemFailure> {
        let path = write_batch(&self.dir, &self.prefix, &batch)
            .await
            .map_err(|e| ItemFailure::new(FailureKind::WriteFile, e))?;
        self.logger.debug(format_args!(
            "Worker {} wrote {} records to {}",
            worker_id,
            batch.len(),
            path.display()
        ));
        Ok(batch.len())
    }
}

/// Collects the whole query result and writes it to a single file.
///
/// # Errors
///
/// Configuration, query, cursor and write errors all end the command.
pub async fn extract<S>(
    source: &S,
    config: &ExtractConfig,
    logger: Arc<dyn Logger>,
) -> Result<PipelineReport, PipelineError>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;
    let start = Instant::now();
    let stats = PipelineStats::new();
    ensure_dir(&config.output_path).await?;

    let mut cursor = source.find(config.filter.clone()).await?;
    let mut records = Vec::new();
    while let Some(next) = cursor.next().await {
        let record = next.map_err(|e| PipelineError::Source {
            records_read: records.len(),
            source: e.into(),
        })?;
        records.push(record);
    }
    stats.add_records_read(records.len());
    stats.increment_batches_sent();

    let path = write_batch(&config.output_path, config.file_prefix(), &records).await?;
    stats.record_success(records.len());
    logger.info(format_args!(
        "Wrote {} documents from `{}` to {}",
        records.len(),
        source.name(),
        path.display()
    ));

    let report = PipelineReport::from_stats("extract", &stats, start.elapsed());
    report.log_summary(logger.as_ref());
    Ok(report)
}

/// Streams the query result through the batcher into a pool of file writers.
///
/// Workers are running before the query starts. Whatever happens to the
/// query, the pool is joined before this returns.
///
/// # Errors
///
/// Configuration and query errors, and any cursor error (after the batches
/// already sent have been written). Per-batch write failures are only counted.
pub async fn extract_batch<S>(
    source: &S,
    config: &ExtractConfig,
    logger: Arc<dyn Logger>,
) -> Result<PipelineReport, PipelineError>
where
    S: RecordSource + ?Sized,
{
    config.validate()?;
    let start = Instant::now();
    ensure_dir(&config.output_path).await?;

    let stats = Arc::new(PipelineStats::new());
    let writer = Arc::new(FileWriter::new(
        config.output_path.clone(),
        config.file_prefix().to_string(),
        Arc::clone(&logger),
    ));
    let pool = WorkerPool::<Vec<Document>>::spawn(
        config.workers,
        writer,
        Arc::clone(&logger),
        Arc::clone(&stats),
    )?;

    logger.info(format_args!(
        "Extracting `{}` in batches of {} with {} workers",
        source.name(),
        config.batch_size,
        config.workers
    ));

    let produced = match source.find(config.filter.clone()).await {
        Ok(cursor) => pump_batches(
            cursor,
            Batcher::new(config.batch_size, config.empty_batches),
            &pool.sender(),
            &stats,
            logger.as_ref(),
        )
        .await
        .map(|_| ()),
        Err(e) => Err(e.into()),
    };
    let joined = pool.join().await;
    produced?;
    joined?;

    let report = PipelineReport::from_stats("extract-batch", &stats, start.elapsed());
    report.log_summary(logger.as_ref());
    Ok(report)
}
