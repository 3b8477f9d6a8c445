use super::report::{Trend, TrendReport};
use super::sink::ReportSink;
use crate::aggregate::average;
use crate::clock::Clock;
use crate::store::TimeSeriesStore;
use crate::worker::PeriodicTask;
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Window lengths, in milliseconds, used by a [`TrendAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindows {
    /// Span of the counted and averaged long window.
    ///
    /// Default: 300,000 (5 minutes)
    pub long_ms: u64,
    /// Span of the recent window.
    ///
    /// Default: 15,000 (15 seconds)
    pub recent_ms: u64,
    /// How far back the lookback window is shifted.
    ///
    /// Default: 60,000 (1 minute)
    pub lookback_ms: u64,
}

impl Default for AnalysisWindows {
    fn default() -> Self {
        Self {
            long_ms: 300_000,
            recent_ms: 15_000,
            lookback_ms: 60_000,
        }
    }
}

/// Lock-free handle to the most recent report of an analyzer.
///
/// Clones observe the same slot.
#[derive(Clone, Default)]
pub struct LatestReport {
    slot: Arc<ArcSwapOption<TrendReport>>,
}

impl LatestReport {
    /// Returns the last published report, if any cycle produced one.
    pub fn get(&self) -> Option<Arc<TrendReport>> {
        self.slot.load_full()
    }

    fn publish(&self, report: TrendReport) {
        self.slot.store(Some(Arc::new(report)));
    }
}

/// Periodic reader that classifies the recent temperature trend.
pub struct TrendAnalyzer<C: Clock, S: ReportSink> {
    store: Arc<TimeSeriesStore>,
    clock: C,
    windows: AnalysisWindows,
    sink: S,
    latest: LatestReport,
}

impl<C: Clock, S: ReportSink> TrendAnalyzer<C, S> {
    /// Creates an analyzer reading `store` and emitting into `sink`.
    pub fn new(store: Arc<TimeSeriesStore>, clock: C, windows: AnalysisWindows, sink: S) -> Self {
        Self {
            store,
            clock,
            windows,
            sink,
            latest: LatestReport::default(),
        }
    }

    /// Handle to this analyzer's latest report, usable from other threads.
    pub fn latest(&self) -> LatestReport {
        self.latest.clone()
    }

    /// Returns the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Computes the report for the current instant without emitting it.
    ///
    /// Returns `None` when the long window holds no readings.
    pub fn analyze(&self) -> Option<TrendReport> {
        let now = self.clock.now_ms();
        let windows = &self.windows;

        let long_window = self
            .store
            .snapshot_since(now.saturating_sub(windows.long_ms));
        let long_window_avg = average(&long_window)?;

        let recent = self
            .store
            .snapshot_since(now.saturating_sub(windows.recent_ms));
        let recent_avg = average(&recent);

        // Not bounded above: includes everything newer than its start, recent readings too.
        let lookback = self.store.snapshot_since(
            now.saturating_sub(windows.lookback_ms)
                .saturating_sub(windows.recent_ms),
        );
        let lookback_avg = average(&lookback);

        Some(TrendReport {
            generated_at_ms: now,
            long_window_count: long_window.len(),
            long_window_avg,
            recent_avg,
            lookback_avg,
            trend: Trend::classify(recent_avg, lookback_avg),
        })
    }

    /// Runs one analysis cycle: analyze, publish, emit.
    ///
    /// Sink failures are logged and not retried.
    pub fn run_cycle(&mut self) -> Option<TrendReport> {
        let report = self.analyze()?;
        self.latest.publish(report.clone());

        if let Err(e) = self.sink.emit(&report) {
            log::warn!("failed to emit trend report: {e}");
        }
        Some(report)
    }
}

impl<C: Clock + 'static, S: ReportSink> PeriodicTask for TrendAnalyzer<C, S> {
    fn name(&self) -> &'static str {
        "trend-analyzer"
    }

    fn run_once(&mut self) {
        self.run_cycle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ReportFormat, WriterSink};
    use crate::clock::ManualClock;

    fn analyzer(
        store: &Arc<TimeSeriesStore>,
        now: u64,
    ) -> TrendAnalyzer<ManualClock, WriterSink<Vec<u8>>> {
        TrendAnalyzer::new(
            Arc::clone(store),
            ManualClock::new(now),
            AnalysisWindows::default(),
            WriterSink::new(Vec::new(), ReportFormat::Text),
        )
    }

    #[test]
    fn test_empty_store_emits_nothing() {
        let store = Arc::new(TimeSeriesStore::new());
        let mut analyzer = analyzer(&store, 1_000_000);

        assert!(analyzer.run_cycle().is_none());
        assert!(analyzer.sink().get_ref().is_empty());
        assert!(analyzer.latest().get().is_none());
    }

    #[test]
    fn test_only_stale_data_emits_nothing() {
        let store = Arc::new(TimeSeriesStore::new());
        store.insert(100, 25.0);
        let mut analyzer = analyzer(&store, 1_000_000);

        assert!(analyzer.run_cycle().is_none());
        assert!(analyzer.sink().get_ref().is_empty());
    }

    #[test]
    fn test_rising_trend() {
        let now = 1_000_000;
        let store = Arc::new(TimeSeriesStore::new());
        // Lookback-only region (75s..15s ago) is cooler than the recent 15s
        for ts in (now - 70_000..now - 20_000).step_by(1_000) {
            store.insert(ts, 20.0);
        }
        for ts in (now - 10_000..=now).step_by(1_000) {
            store.insert(ts, 22.0);
        }
        let mut analyzer = analyzer(&store, now);

        let report = analyzer.run_cycle().unwrap();

        assert_eq!(report.trend, Trend::Rising);
        assert_eq!(report.long_window_count, 61);
        assert_eq!(report.recent_avg, Some(22.0));
        assert!(report.lookback_avg.unwrap() < 22.0);
        assert_eq!(analyzer.latest().get().as_deref(), Some(&report));

        let out = String::from_utf8(analyzer.sink().get_ref().clone()).unwrap();
        assert_eq!(out, format!("{report}\n"));
        assert!(out.ends_with("Trend: rising\n"));
    }

    #[test]
    fn test_flat_trend_is_falling() {
        let now = 500_000;
        let store = Arc::new(TimeSeriesStore::new());
        for ts in (now - 100_000..=now).step_by(500) {
            store.insert(ts, 20.0);
        }
        let analyzer = analyzer(&store, now);

        let report = analyzer.analyze().unwrap();
        assert_eq!(report.recent_avg, Some(20.0));
        assert_eq!(report.lookback_avg, Some(20.0));
        assert_eq!(report.trend, Trend::Falling);
    }

    #[test]
    fn test_lookback_window_is_unbounded_above() {
        let now = 1_000_000;
        let store = Arc::new(TimeSeriesStore::new());
        // Only recent data exists: the lookback window still sees it
        store.insert(now - 1_000, 30.0);
        store.insert(now, 10.0);
        let analyzer = analyzer(&store, now);

        let report = analyzer.analyze().unwrap();
        assert_eq!(report.recent_avg, Some(20.0));
        assert_eq!(report.lookback_avg, Some(20.0));
        assert_eq!(report.trend, Trend::Falling);
    }

    #[test]
    fn test_long_window_boundary_inclusive() {
        let now = 400_000;
        let store = Arc::new(TimeSeriesStore::new());
        store.insert(now - 300_000, 10.0); // exactly on the boundary
        store.insert(now - 300_001, 99.0); // just outside
        let analyzer = analyzer(&store, now);

        let report = analyzer.analyze().unwrap();
        assert_eq!(report.long_window_count, 1);
        assert_eq!(report.long_window_avg, 10.0);
        assert_eq!(report.recent_avg, None);
        assert_eq!(report.trend, Trend::Falling);
    }

    #[test]
    fn test_windows_saturate_near_epoch() {
        let store = Arc::new(TimeSeriesStore::new());
        store.insert(0, 5.0);
        store.insert(10, 15.0);
        let analyzer = analyzer(&store, 10);

        let report = analyzer.analyze().unwrap();
        assert_eq!(report.long_window_count, 2);
        assert_eq!(report.long_window_avg, 10.0);
    }
}
