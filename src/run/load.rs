//! `load` and `load-batch`: JSON files into a collection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::config::LoadConfig;
use crate::error_handling::{FailureKind, ItemFailure, PipelineError, PipelineStats};
use crate::files::{find_prefixed_files, read_records, PrefixWalker};
use crate::logging::Logger;
use crate::pipeline::{pump_items, ItemHandler, WorkerPool};
use crate::store::RecordSink;

use super::report::PipelineReport;

/// Reads one file per item and inserts its records.
pub(crate) struct FileLoader<K> {
    sink: Arc<K>,
    logger: Arc<dyn Logger>,
}

impl<K: RecordSink> FileLoader<K> {
    pub(crate) fn new(sink: Arc<K>, logger: Arc<dyn Logger>) -> Self {
        FileLoader { sink, logger }
    }
}

#[async_trait]
impl<K: RecordSink> ItemHandler<PathBuf> for FileLoader<K> {
    async fn handle(&self, worker_id: usize, path: PathBuf) -> Result<usize, ItemFailure> {
        let records = read_records(&path)
            .await
            .map_err(|e| ItemFailure::new(FailureKind::ReadFile, e))?;
        if records.is_empty() {
            self.logger.debug(format_args!(
                "Worker {}: {} holds no documents, skipped",
                worker_id,
                path.display()
            ));
            return Ok(0);
        }

        let inserted = self
            .sink
            .insert_many(records)
            .await
            .map_err(|e| ItemFailure::new(FailureKind::Insert, e))?;
        self.logger.debug(format_args!(
            "Worker {} inserted {} documents from {}",
            worker_id,
            inserted,
            path.display()
        ));
        Ok(inserted)
    }
}

/// Reads every matching file into memory and inserts everything at once.
///
/// # Errors
///
/// Any walk, read or insert error ends the command; nothing is inserted when
/// a file cannot be read.
pub async fn load<K>(
    sink: &K,
    config: &LoadConfig,
    logger: Arc<dyn Logger>,
) -> Result<PipelineReport, PipelineError>
where
    K: RecordSink,
{
    config.validate()?;
    let start = Instant::now();
    let stats = PipelineStats::new();

    let files = find_prefixed_files(&config.search_path, &config.file_prefix).await?;
    stats.add_records_read(files.len());
    logger.info(format_args!(
        "Found {} files matching `{}` under {}",
        files.len(),
        config.file_prefix,
        config.search_path.display()
    ));

    let mut records = Vec::new();
    for path in &files {
        records.extend(read_records(path).await?);
    }

    if records.is_empty() {
        logger.warn(format_args!("No documents to insert into `{}`", sink.name()));
    } else {
        stats.increment_batches_sent();
        let inserted = sink.insert_many(records).await?;
        stats.record_success(inserted);
        logger.info(format_args!(
            "Inserted {} documents into `{}`",
            inserted,
            sink.name()
        ));
    }

    let report = PipelineReport::from_stats("load", &stats, start.elapsed());
    report.log_summary(logger.as_ref());
    Ok(report)
}

/// Feeds matching file paths to a pool of loaders, one insert per file.
///
/// # Errors
///
/// Configuration errors, and walk errors (after the files already found
/// have been loaded). Per-file read and insert failures are only counted.
pub async fn load_batch<K>(
    sink: Arc<K>,
    config: &LoadConfig,
    logger: Arc<dyn Logger>,
) -> Result<PipelineReport, PipelineError>
where
    K: RecordSink,
{
    config.validate()?;
    let start = Instant::now();

    let stats = Arc::new(PipelineStats::new());
    let loader = Arc::new(FileLoader::new(Arc::clone(&sink), Arc::clone(&logger)));
    let pool = WorkerPool::<PathBuf>::spawn(
        config.workers,
        loader,
        Arc::clone(&logger),
        Arc::clone(&stats),
    )?;

    logger.info(format_args!(
        "Loading files matching `{}` under {} into `{}` with {} workers",
        config.file_prefix,
        config.search_path.display(),
        sink.name(),
        config.workers
    ));

    let walker = PrefixWalker::new(config.search_path.clone(), config.file_prefix.clone());
    let produced = pump_items(
        walker.into_stream(),
        &pool.sender(),
        &stats,
        logger.as_ref(),
    )
    .await;
    let joined = pool.join().await;
    produced?;
    joined?;

    let report = PipelineReport::from_stats("load-batch", &stats, start.elapsed());
    report.log_summary(logger.as_ref());
    Ok(report)
}
