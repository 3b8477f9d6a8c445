//! # tempseries
//!
//! A concurrent, bounded, in-memory temperature time series fed by a synthetic
//! high-frequency sensor.
//!
//! Three independent periodic workers share one [`TimeSeriesStore`]:
//!
//! - **Sensor feed**: inserts a noisy reading of a sine-wave "day" roughly every millisecond
//! - **Evictor**: once a second, trims the store back under its size bound by age
//! - **Trend analyzer**: every ten seconds, averages sliding windows and reports whether
//!   the temperature is rising or falling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tempseries::{ReportFormat, SimulationConfig, WriterSink};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulationConfig::default();
//! let feed = tempseries::start(&config)?;
//! let analysis = feed.start_analysis(WriterSink::stdout(ReportFormat::Text))?;
//!
//! // ... later
//! if let Some(report) = analysis.latest_report() {
//!     println!("{report}");
//! }
//! analysis.shutdown()?;
//! feed.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The store is an ordered map behind a reader-writer lock. Inserts and bulk deletes
//! take the write lock briefly, window snapshots copy out under the read lock, and the
//! entry count is mirrored in an atomic so size checks never block.
//!
//! Each worker runs on its own named thread and sleeps *after* finishing its work, so
//! cadence drifts under load rather than firing at an absolute rate.

#![deny(missing_docs)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod aggregate;
pub mod analysis;
pub mod clock;
pub mod config;
pub mod error;
pub mod evictor;
pub mod reading;
pub mod runtime;
pub mod sensor;
pub mod store;
pub mod worker;

pub use aggregate::{Aggregate, average};
pub use analysis::{
    AnalysisWindows, LatestReport, ReportFormat, ReportSink, Trend, TrendAnalyzer, TrendReport,
    WriterSink,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use error::FeedError;
pub use evictor::{Evictor, SweepOutcome};
pub use reading::Reading;
pub use runtime::{AnalysisHandle, FeedHandle, start, start_with_clock};
pub use sensor::{SensorFeed, TemperatureModel};
pub use store::{StoreStats, TimeSeriesStore};
pub use worker::{PeriodicTask, PeriodicWorker, RestartPolicy, Schedule};
