//! Starting and stopping a simulation.
//!
//! [`start`] creates the store and launches the sensor feed and evictor.
//! [`FeedHandle::start_analysis`] launches the trend analyzer separately; the two
//! handles are independent, so stopping or losing one leaves the other running.

use crate::analysis::{LatestReport, ReportSink, TrendAnalyzer, TrendReport};
use crate::clock::{Clock, SystemClock};
use crate::config::SimulationConfig;
use crate::error::FeedError;
use crate::evictor::Evictor;
use crate::sensor::SensorFeed;
use crate::store::TimeSeriesStore;
use crate::worker::{PeriodicWorker, Schedule};
use std::sync::Arc;

/// Starts a simulation against the system clock.
pub fn start(config: &SimulationConfig) -> Result<FeedHandle<SystemClock>, FeedError> {
    start_with_clock(config, SystemClock)
}

/// Starts a simulation against `clock`.
///
/// Creates the store, then spawns the sensor feed (first tick after one tick
/// interval) and the evictor (first sweep after one cleanup interval).
pub fn start_with_clock<C>(config: &SimulationConfig, clock: C) -> Result<FeedHandle<C>, FeedError>
where
    C: Clock + Clone + 'static,
{
    config.validate()?;

    let store = Arc::new(TimeSeriesStore::new());

    let feed = PeriodicWorker::spawn(
        SensorFeed::new(Arc::clone(&store), clock.clone(), config.model),
        config.tick_interval,
        Schedule::AfterInterval,
        config.restart_policy,
    )?;
    let evictor = PeriodicWorker::spawn(
        Evictor::new(Arc::clone(&store), clock.clone(), config.max_entries),
        config.cleanup_interval,
        Schedule::AfterInterval,
        config.restart_policy,
    )?;

    log::info!(
        "sensor feed started: tick {:?}, max {} entries swept every {:?}",
        config.tick_interval,
        config.max_entries,
        config.cleanup_interval
    );

    Ok(FeedHandle {
        store,
        clock,
        config: config.clone(),
        feed,
        evictor,
    })
}

/// A running sensor feed and evictor sharing one store.
///
/// Dropping the handle stops both workers.
pub struct FeedHandle<C: Clock> {
    store: Arc<TimeSeriesStore>,
    clock: C,
    config: SimulationConfig,
    feed: PeriodicWorker,
    evictor: PeriodicWorker,
}

impl<C: Clock + Clone + 'static> FeedHandle<C> {
    /// The shared store.
    pub fn store(&self) -> &Arc<TimeSeriesStore> {
        &self.store
    }

    /// Launches a trend analyzer over this feed's store.
    ///
    /// The analyzer runs its first cycle immediately and then every analysis interval,
    /// on its own thread. It is not tied to this handle's lifetime.
    pub fn start_analysis<S: ReportSink>(&self, sink: S) -> Result<AnalysisHandle, FeedError> {
        let analyzer = TrendAnalyzer::new(
            Arc::clone(&self.store),
            self.clock.clone(),
            self.config.windows,
            sink,
        );
        let latest = analyzer.latest();
        let worker = PeriodicWorker::spawn(
            analyzer,
            self.config.analysis_interval,
            Schedule::Immediate,
            self.config.restart_policy,
        )?;

        log::info!(
            "trend analysis started: every {:?}",
            self.config.analysis_interval
        );

        Ok(AnalysisHandle { worker, latest })
    }

    /// Returns `true` while both the sensor feed and evictor threads are alive.
    pub fn is_running(&self) -> bool {
        !self.feed.is_finished() && !self.evictor.is_finished()
    }

    /// Stops the sensor feed and evictor and waits for them.
    ///
    /// Both workers are signalled before either is joined.
    pub fn shutdown(self) -> Result<(), FeedError> {
        self.feed.signal_shutdown();
        self.evictor.signal_shutdown();
        let feed = self.feed.shutdown();
        let evictor = self.evictor.shutdown();
        feed.and(evictor)
    }

    /// Blocks until both workers exit.
    pub fn wait(self) -> Result<(), FeedError> {
        let feed = self.feed.wait();
        let evictor = self.evictor.wait();
        feed.and(evictor)
    }
}

/// A running trend analyzer.
///
/// Dropping the handle stops the analyzer.
pub struct AnalysisHandle {
    worker: PeriodicWorker,
    latest: LatestReport,
}

impl AnalysisHandle {
    /// The most recent report, if any cycle has produced one.
    pub fn latest_report(&self) -> Option<Arc<TrendReport>> {
        self.latest.get()
    }

    /// Returns `true` while the analyzer thread is alive.
    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Stops the analyzer and waits for it.
    pub fn shutdown(self) -> Result<(), FeedError> {
        self.worker.shutdown()
    }

    /// Blocks until the analyzer exits.
    pub fn wait(self) -> Result<(), FeedError> {
        self.worker.wait()
    }
}
