//! Command-line interface definition.
//!
//! The `Cli` struct is parsed by `clap` in `main.rs`; each subcommand's args
//! convert into the library configuration types from `config::types`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mongodb::bson::{Bson, Document};

use crate::config::constants::{DEFAULT_BATCH_SIZE, DEFAULT_PATH, DEFAULT_WORKERS};
use crate::config::types::{
    ConnectionSettings, EmptyBatchPolicy, ExtractConfig, LoadConfig, LogFormat, LogLevel,
};
use crate::error_handling::ConfigError;

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Dump a collection into files of 500 documents, 8 writers at a time
/// mongo_pipeline extract-batch -c mongodb://localhost -d shop -a exporter \
///     --collection orders -s 500 -n 8 -p ./dump
///
/// # Load them back
/// mongo_pipeline load-batch -c mongodb://localhost -d shop -a loader \
///     --collection orders_copy -o orders -p ./dump
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "mongo_pipeline",
    version,
    about = "Extracts MongoDB collections into JSON files and loads them back."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, short = 'l', global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a collection into a single JSON file
    Extract(ExtractArgs),
    /// Extract a collection into many JSON files using a pool of writers
    ExtractBatch(ExtractBatchArgs),
    /// Load every matching JSON file into a collection with one insert
    Load(LoadArgs),
    /// Load matching JSON files into a collection using a pool of loaders
    LoadBatch(LoadBatchArgs),
    /// Check that a MongoDB server answers
    Ping(PingArgs),
    /// Check whether a collection exists
    #[command(alias = "collxst")]
    CollectionExists(CollectionExistsArgs),
}

/// Connection flags shared by every command that opens a connection handle.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Connection URI for MongoDB
    #[arg(long, short = 'c')]
    pub conn_uri: String,

    /// Database name
    #[arg(long, short = 'd')]
    pub db_name: String,

    /// Application name reported to the server
    #[arg(long, short = 'a')]
    pub app_name: String,
}

impl From<&ConnectionArgs> for ConnectionSettings {
    fn from(args: &ConnectionArgs) -> Self {
        ConnectionSettings {
            conn_uri: args.conn_uri.clone(),
            db_name: args.db_name.clone(),
            app_name: args.app_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Collection to extract
    #[arg(long)]
    pub collection: String,

    /// Output file name prefix (defaults to the collection name)
    #[arg(long, short = 'o', default_value = "")]
    pub output_prefix: String,

    /// Output folder
    #[arg(long, short = 'p', default_value = DEFAULT_PATH)]
    pub output_path: PathBuf,

    /// Query filter as a JSON object, e.g. '{"status": "active"}'
    #[arg(long, short = 'q')]
    pub query: Option<String>,
}

impl ExtractArgs {
    pub fn to_config(&self) -> Result<ExtractConfig, ConfigError> {
        let filter = match self.query.as_deref() {
            Some(query) => parse_filter(query)?,
            None => Document::new(),
        };
        let config = ExtractConfig {
            collection: self.collection.clone(),
            output_prefix: self.output_prefix.clone(),
            output_path: self.output_path.clone(),
            filter,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractBatchArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Number of documents per output file
    #[arg(long, short = 's', alias = "chunk-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Number of files written concurrently
    #[arg(long, short = 'n', alias = "num-concurrent-files", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Write an empty file when the last batch has no documents
    #[arg(long)]
    pub send_empty_batches: bool,
}

impl ExtractBatchArgs {
    pub fn to_config(&self) -> Result<ExtractConfig, ConfigError> {
        let mut config = self.extract.to_config()?;
        config.batch_size = self.batch_size;
        config.workers = self.workers;
        config.empty_batches = if self.send_empty_batches {
            EmptyBatchPolicy::Send
        } else {
            EmptyBatchPolicy::Suppress
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Collection to load into
    #[arg(long)]
    pub collection: String,

    /// Only files whose name starts with this prefix are loaded
    #[arg(long, short = 'o', default_value = "")]
    pub file_prefix: String,

    /// Folder searched (recursively) for files
    #[arg(long, short = 'p', default_value = DEFAULT_PATH)]
    pub search_path: PathBuf,
}

impl LoadArgs {
    pub fn to_config(&self) -> Result<LoadConfig, ConfigError> {
        let config = LoadConfig {
            collection: self.collection.clone(),
            file_prefix: self.file_prefix.clone(),
            search_path: self.search_path.clone(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct LoadBatchArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Number of files loaded concurrently
    #[arg(long, short = 'n', alias = "num-concurrent-files", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
}

impl LoadBatchArgs {
    pub fn to_config(&self) -> Result<LoadConfig, ConfigError> {
        let mut config = self.load.to_config()?;
        config.workers = self.workers;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PingArgs {
    /// Connection URI for MongoDB
    #[arg(long, short = 'c')]
    pub conn_uri: String,
}

#[derive(Debug, Clone, Args)]
pub struct CollectionExistsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Collection to look for
    #[arg(long)]
    pub collection: String,
}

/// Parses a JSON (or Extended JSON) object into a query filter.
pub fn parse_filter(query: &str) -> Result<Document, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(query)
        .map_err(|e| ConfigError::InvalidQuery(format!("not valid JSON: {e}")))?;
    match Bson::try_from(value) {
        Ok(Bson::Document(filter)) => Ok(filter),
        Ok(other) => Err(ConfigError::InvalidQuery(format!(
            "expected a JSON object, got {:?}",
            other.element_type()
        ))),
        Err(e) => Err(ConfigError::InvalidQuery(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_parse_filter_object() {
        let filter = parse_filter(r#"{"type": "orc", "age": {"$gt": 3}}"#).unwrap();
        assert_eq!(filter.get_str("type").unwrap(), "orc");
        assert!(filter.get_document("age").unwrap().contains_key("$gt"));
    }

    #[test]
    fn test_parse_filter_empty_object() {
        assert_eq!(parse_filter("{}").unwrap(), doc! {});
    }

    #[test]
    fn test_parse_filter_extended_json() {
        let filter = parse_filter(r#"{"_id": {"$oid": "65063a2c27b6b3d5da64db70"}}"#).unwrap();
        assert!(filter.get_object_id("_id").is_ok());
    }

    #[test]
    fn test_parse_filter_rejects_non_object() {
        assert!(matches!(
            parse_filter("[1, 2, 3]"),
            Err(ConfigError::InvalidQuery(_))
        ));
        assert!(matches!(
            parse_filter("{not json"),
            Err(ConfigError::InvalidQuery(_))
        ));
    }
}
