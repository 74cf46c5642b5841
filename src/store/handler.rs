//! MongoDB connection handle.

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::{ConnectionSettings, CONNECT_TIMEOUT, SERVER_SELECTION_TIMEOUT};
use crate::error_handling::StoreError;
use crate::logging::Logger;

use super::collection::MongoCollection;

/// Exclusive owner of one client and the selected database.
///
/// Created once per command. Call `disconnect` on every exit path; dropping
/// the handle without it leaves the driver's background tasks to wind down
/// on their own.
pub struct ConnectionHandler {
    client: Client,
    database: Database,
    logger: Arc<dyn Logger>,
}

impl ConnectionHandler {
    /// Opens a client and verifies the server answers a `ping`.
    ///
    /// # Errors
    ///
    /// - `StoreError::Options` if the connection string is rejected
    /// - `StoreError::Connection` if the server cannot be reached
    pub async fn connect(
        settings: &ConnectionSettings,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.conn_uri)
            .await
            .map_err(StoreError::Options)?;
        options.app_name = Some(settings.app_name.clone());
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(StoreError::Options)?;
        let database = client.database(&settings.db_name);

        if let Err(e) = database.run_command(doc! { "ping": 1 }, None).await {
            logger.error(format_args!("Failed to connect to MongoDB: {}", e));
            client.shutdown().await;
            return Err(StoreError::Connection(e));
        }

        logger.info(format_args!(
            "Client connected (database `{}`)",
            settings.db_name
        ));

        Ok(ConnectionHandler {
            client,
            database,
            logger,
        })
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Handle onto `name` in the selected database.
    pub fn collection(&self, name: &str) -> MongoCollection {
        self.logger
            .debug(format_args!("Using collection `{}`", name));
        MongoCollection::new(self.database.collection(name))
    }

    /// Lists every collection name and looks for an exact match.
    pub async fn collection_exists(&self, name: &str) -> Result<bool, StoreError> {
        let names = self
            .database
            .list_collection_names(None)
            .await
            .map_err(|source| StoreError::ListCollections {
                database: self.database.name().to_string(),
                source,
            })?;
        Ok(names.iter().any(|existing| existing == name))
    }

    /// Shuts the client down, waiting for in-use resources to be returned.
    pub async fn disconnect(self) {
        self.client.shutdown().await;
        self.logger.info(format_args!("Client disconnected"));
    }
}
