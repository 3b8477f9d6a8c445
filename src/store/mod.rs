//! The shared time-series table.
//!
//! # Concurrency Model
//!
//! One [`TimeSeriesStore`] is created per simulation and shared through an `Arc`:
//! - The sensor feed inserts at ~1 kHz under a short write lock
//! - The evictor bulk-deletes by timestamp at ~1 Hz under the same write lock
//! - The trend analyzer copies windows out under the read lock
//!
//! No operation spans more than one lock acquisition, and none of them can fail.

mod stats;
mod table;

pub use stats::StoreStats;
pub use table::TimeSeriesStore;
