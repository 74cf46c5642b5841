//! JSON record files.
//!
//! A record file is a compact JSON array of objects. Documents are written
//! as relaxed Extended JSON so ObjectIds and dates survive a round trip;
//! plain JSON is accepted on read. 64-bit integers are the exception: they
//! are always written as `{"$numberLong": ".."}`, otherwise a small `Int64`
//! would come back as `Int32`.

use std::path::{Path, PathBuf};

use mongodb::bson::{Bson, Document};
use uuid::Uuid;

use crate::config::OUTPUT_EXTENSION;
use crate::error_handling::FileError;

/// Serializes records into a newline-free JSON array.
pub fn records_to_json(records: &[Document]) -> Result<Vec<u8>, FileError> {
    let values: Vec<serde_json::Value> = records
        .iter()
        .map(|doc| to_extjson(Bson::Document(doc.clone())))
        .collect();
    serde_json::to_vec(&values).map_err(FileError::Serialize)
}

fn to_extjson(value: Bson) -> serde_json::Value {
    match value {
        Bson::Int64(n) => serde_json::json!({ "$numberLong": n.to_string() }),
        Bson::Document(doc) => serde_json::Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, to_extjson(value)))
                .collect(),
        ),
        Bson::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(to_extjson).collect())
        }
        other => other.into_relaxed_extjson(),
    }
}

/// Parses a JSON array of objects into documents.
///
/// `path` is only used for error messages.
pub fn records_from_json(path: &Path, data: &[u8]) -> Result<Vec<Document>, FileError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_slice(data).map_err(|source| FileError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match Bson::try_from(value) {
            Ok(Bson::Document(doc)) => Ok(doc),
            Ok(other) => Err(FileError::InvalidRecord {
                path: path.to_path_buf(),
                index,
                reason: format!("expected an object, got {:?}", other.element_type()),
            }),
            Err(e) => Err(FileError::InvalidRecord {
                path: path.to_path_buf(),
                index,
                reason: e.to_string(),
            }),
        })
        .collect()
}

/// `{prefix}_{uuid}.json`
pub fn output_file_name(prefix: &str) -> String {
    format!("{}_{}.{}", prefix, Uuid::new_v4(), OUTPUT_EXTENSION)
}

/// Writes one batch into a new uniquely named file under `dir`.
pub async fn write_batch(
    dir: &Path,
    prefix: &str,
    records: &[Document],
) -> Result<PathBuf, FileError> {
    let data = records_to_json(records)?;
    let path = dir.join(output_file_name(prefix));
    tokio::fs::write(&path, data)
        .await
        .map_err(|source| FileError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Reads a whole record file.
pub async fn read_records(path: &Path) -> Result<Vec<Document>, FileError> {
    let data = tokio::fs::read(path).await.map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    records_from_json(path, &data)
}

/// Creates `dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(dir: &Path) -> Result<(), FileError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| FileError::Io {
            path: dir.to_path_buf(),
            source,
        })
}
