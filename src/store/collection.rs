//! Record sources and sinks.
//!
//! The pipelines only see these traits, so they run the same against a
//! MongoDB collection or an in-memory double.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use mongodb::bson::Document;
use mongodb::Collection;

use crate::error_handling::StoreError;

/// Stream of documents produced by a query.
pub type RecordStream = BoxStream<'static, Result<Document, StoreError>>;

/// Something a filtered query can be run against.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Starts a query and returns its results as a stream.
    async fn find(&self, filter: Document) -> Result<RecordStream, StoreError>;
}

/// Something records can be bulk-inserted into.
#[async_trait]
pub trait RecordSink: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Inserts all `records` and returns how many were acknowledged.
    async fn insert_many(&self, records: Vec<Document>) -> Result<usize, StoreError>;
}

/// A MongoDB collection of untyped documents.
///
/// Cheap to clone; clones share the client's connection pool.
#[derive(Clone, Debug)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    pub fn new(inner: Collection<Document>) -> Self {
        MongoCollection { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

#[async_trait]
impl RecordSource for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn find(&self, filter: Document) -> Result<RecordStream, StoreError> {
        let collection = self.inner.name().to_string();
        let cursor = self
            .inner
            .find(filter, None)
            .await
            .map_err(|source| StoreError::Query {
                collection: collection.clone(),
                source,
            })?;

        Ok(cursor
            .map(move |next| {
                next.map_err(|source| StoreError::Query {
                    collection: collection.clone(),
                    source,
                })
            })
            .boxed())
    }
}

#[async_trait]
impl RecordSink for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn insert_many(&self, records: Vec<Document>) -> Result<usize, StoreError> {
        let result = self
            .inner
            .insert_many(records, None)
            .await
            .map_err(|source| StoreError::Insert {
                collection: self.inner.name().to_string(),
                source,
            })?;
        Ok(result.inserted_ids.len())
    }
}
