// Shared test helpers: in-memory sources and sinks, scratch files, loggers.
//
// Each integration test file pulls this in with `mod helpers;`, so not every
// helper is used by every file.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use log::LevelFilter;
use mongodb::bson::{doc, Document};

use mongo_pipeline::error_handling::StoreError;
use mongo_pipeline::logging::{Logger, MemoryLogger};
use mongo_pipeline::store::{RecordSink, RecordSource, RecordStream};

/// A logger that keeps nothing.
pub fn quiet_logger() -> Arc<dyn Logger> {
    Arc::new(MemoryLogger::new(LevelFilter::Off))
}

/// `n` small documents numbered `0..n`.
pub fn numbered_docs(n: i32) -> Vec<Document> {
    (0..n)
        .map(|i| doc! { "n": i, "name": format!("person-{i}"), "tags": ["a", "b"] })
        .collect()
}

/// Query source backed by a vector; the filter is ignored.
pub struct VecSource {
    pub name: String,
    pub docs: Vec<Document>,
}

impl VecSource {
    pub fn new(name: &str, docs: Vec<Document>) -> Self {
        VecSource {
            name: name.to_string(),
            docs,
        }
    }
}

#[async_trait]
impl RecordSource for VecSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, _filter: Document) -> Result<RecordStream, StoreError> {
        let docs: Vec<Result<Document, StoreError>> = self.docs.iter().cloned().map(Ok).collect();
        Ok(futures::stream::iter(docs).boxed())
    }
}

/// Sink that records every `insert_many` call.
#[derive(Default)]
pub struct VecSink {
    calls: Mutex<Vec<Vec<Document>>>,
}

impl VecSink {
    pub fn calls(&self) -> Vec<Vec<Document>> {
        self.calls.lock().expect("sink lock poisoned").clone()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.calls().into_iter().flatten().collect()
    }
}

#[async_trait]
impl RecordSink for VecSink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert_many(&self, records: Vec<Document>) -> Result<usize, StoreError> {
        let n = records.len();
        self.calls.lock().expect("sink lock poisoned").push(records);
        Ok(n)
    }
}

/// Writes `body` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, body).expect("Failed to write test file");
    path
}

/// Every regular file directly inside `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.expect("Failed to read entry").path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

/// Sorts documents by their `n` field after dropping `_id`.
pub fn normalized(mut docs: Vec<Document>) -> Vec<Document> {
    for d in docs.iter_mut() {
        d.remove("_id");
    }
    docs.sort_by_key(|d| d.get_i32("n").unwrap_or(i32::MAX));
    docs
}
