//! MongoDB access.
//!
//! This module provides:
//! - `ConnectionHandler`: one client plus the selected database per command
//! - `ping`: a standalone reachability check
//! - `RecordSource` / `RecordSink`: the seams the pipelines read from and write to

mod collection;
mod handler;
mod probe;

pub use collection::{MongoCollection, RecordSink, RecordSource, RecordStream};
pub use handler::ConnectionHandler;
pub use probe::ping;
