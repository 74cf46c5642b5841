//! Producer/consumer batching pipeline.
//!
//! ```text
//! cursor / walker ──pump──▶ bounded channel (cap N) ──▶ worker 1..N ──▶ side effect
//!                                                              │
//!                                               WorkerPool::join (barrier)
//! ```

mod batcher;
mod pool;
mod pump;

pub use batcher::Batcher;
pub use pool::{ItemHandler, WorkerPool};
pub use pump::{pump_batches, pump_items, PumpSummary};
