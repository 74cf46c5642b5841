//! Server reachability check.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::config::SERVER_SELECTION_TIMEOUT;
use crate::error_handling::StoreError;
use crate::logging::Logger;

/// Runs the `ping` admin command against `conn_uri`.
///
/// Returns `Ok(false)` when no server answered within the selection timeout.
///
/// # Errors
///
/// Returns `StoreError::Options` if the connection string is invalid.
pub async fn ping(conn_uri: &str, logger: &dyn Logger) -> Result<bool, StoreError> {
    let mut options = ClientOptions::parse(conn_uri)
        .await
        .map_err(StoreError::Options)?;
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    let client = Client::with_options(options).map_err(StoreError::Options)?;

    let reachable = match client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            logger.warn(format_args!("Ping failed: {}", e));
            false
        }
    };

    client.shutdown().await;
    Ok(reachable)
}
