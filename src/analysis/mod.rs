//! Sliding-window trend analysis.
//!
//! Every cycle the analyzer copies three windows out of the store, averages them and
//! classifies the temperature as rising or falling:
//!
//! ```text
//!   now - 300s                      now - 75s          now - 15s      now
//!      |--------------------------------|------------------|-----------|
//!      [============ long window (count + average) ====================]
//!                                       [====== lookback window =======]
//!                                                          [= recent ==]
//! ```
//!
//! The lookback window starts `lookback + recent` before now and has no upper bound,
//! so it always contains the recent window as well.

mod report;
mod sink;
mod trend;

pub use report::{Trend, TrendReport};
pub use sink::{ReportFormat, ReportSink, WriterSink};
pub use trend::{AnalysisWindows, LatestReport, TrendAnalyzer};
