//! Extract into files, then load the files back, without a server.

mod helpers;

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime};
use tempfile::TempDir;

use mongo_pipeline::config::{ExtractConfig, LoadConfig};
use mongo_pipeline::files::read_records;
use mongo_pipeline::{extract, extract_batch, load, load_batch, PipelineError};

use helpers::{list_files, normalized, numbered_docs, quiet_logger, write_file, VecSink, VecSource};

fn extract_config(dir: &std::path::Path, batch_size: usize) -> ExtractConfig {
    ExtractConfig {
        collection: "people".to_string(),
        output_path: dir.to_path_buf(),
        batch_size,
        workers: 4,
        ..Default::default()
    }
}

fn load_config(dir: &std::path::Path) -> LoadConfig {
    LoadConfig {
        collection: "people_copy".to_string(),
        file_prefix: "people".to_string(),
        search_path: dir.to_path_buf(),
        workers: 4,
    }
}

#[tokio::test]
async fn test_extract_batch_then_load_batch_reproduces_documents() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let docs = numbered_docs(237);
    let source = VecSource::new("people", docs.clone());

    let extracted = extract_batch(&source, &extract_config(dir.path(), 20), quiet_logger())
        .await
        .expect("extract-batch should succeed");
    assert_eq!(extracted.records_written, 237);
    assert_eq!(list_files(dir.path()).len(), 12);

    let sink = Arc::new(VecSink::default());
    let loaded = load_batch(Arc::clone(&sink), &load_config(dir.path()), quiet_logger())
        .await
        .expect("load-batch should succeed");
    assert_eq!(loaded.items_read, 12);
    assert_eq!(loaded.records_written, 237);
    assert_eq!(sink.calls().len(), 12);

    assert_eq!(normalized(sink.documents()), normalized(docs));
}

#[tokio::test]
async fn test_extract_then_load_reproduces_documents() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let docs = numbered_docs(15);
    let source = VecSource::new("people", docs.clone());

    extract(&source, &extract_config(dir.path(), 100), quiet_logger())
        .await
        .expect("extract should succeed");

    let sink = VecSink::default();
    load(&sink, &load_config(dir.path()), quiet_logger())
        .await
        .expect("load should succeed");
    assert_eq!(sink.calls().len(), 1);
    assert_eq!(normalized(sink.documents()), normalized(docs));
}

#[tokio::test]
async fn test_extended_types_survive_the_files() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let id = ObjectId::new();
    let when = DateTime::from_millis(1_700_000_000_000);
    let source = VecSource::new(
        "people",
        vec![doc! {
            "_id": id,
            "n": 1,
            "created": when,
            "score": 2.5,
            "visits": 42i64,
            "nested": { "ok": true },
        }],
    );

    extract_batch(&source, &extract_config(dir.path(), 10), quiet_logger())
        .await
        .expect("extract-batch should succeed");

    let files = list_files(dir.path());
    let records = read_records(&files[0]).await.expect("file should parse");
    assert_eq!(records[0].get_object_id("_id").unwrap(), id);
    assert_eq!(records[0].get_datetime("created").unwrap(), &when);
    assert_eq!(records[0].get_f64("score").unwrap(), 2.5);
    assert_eq!(records[0].get_i64("visits").unwrap(), 42);
    assert!(records[0].get_document("nested").unwrap().get_bool("ok").unwrap());
}

#[tokio::test]
async fn test_load_batch_finds_files_in_nested_folders() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_file(dir.path(), "people_a.json", r#"[{"n":1}]"#);
    write_file(dir.path(), "2024/01/people_b.json", r#"[{"n":2},{"n":3}]"#);
    write_file(dir.path(), "2024/02/people_c.json", r#"[{"n":4}]"#);
    write_file(dir.path(), "2024/02/orders_d.json", r#"[{"n":99}]"#);

    let sink = Arc::new(VecSink::default());
    let report = load_batch(Arc::clone(&sink), &load_config(dir.path()), quiet_logger())
        .await
        .expect("load-batch should succeed");

    assert_eq!(report.items_read, 3);
    let ns: Vec<i32> = normalized(sink.documents())
        .iter()
        .map(|d| d.get_i32("n").unwrap())
        .collect();
    assert_eq!(ns, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_load_batch_counts_bad_files_and_keeps_going() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_file(dir.path(), "people_1.json", r#"[{"n":1}]"#);
    write_file(dir.path(), "people_2.json", "garbage");
    write_file(dir.path(), "people_3.json", r#"[1, 2, 3]"#);
    write_file(dir.path(), "people_4.json", r#"[{"n":4}]"#);

    let sink = Arc::new(VecSink::default());
    let report = load_batch(Arc::clone(&sink), &load_config(dir.path()), quiet_logger())
        .await
        .expect("swallowed failures do not fail the run");

    assert_eq!(report.batches_processed, 2);
    assert_eq!(report.batches_failed, 2);
    assert!(!report.is_clean());
    assert_eq!(sink.documents().len(), 2);
}

#[tokio::test]
async fn test_load_batch_rejects_zero_workers() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = load_config(dir.path());
    config.workers = 0;

    let result = load_batch(Arc::new(VecSink::default()), &config, quiet_logger()).await;
    assert!(matches!(result, Err(PipelineError::Config(_))));
}
