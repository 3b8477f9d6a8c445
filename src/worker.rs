//! Periodic background workers.
//!
//! Each [`PeriodicWorker`] owns one named thread that repeatedly:
//! 1. Runs one cycle of its [`PeriodicTask`]
//! 2. Sleeps for the configured interval
//! 3. Checks the shutdown signal
//!
//! The delay is measured from the *end* of a cycle, so execution time adds to the
//! nominal interval and cadence drifts under load. Sleeps are sliced so a shutdown
//! request is noticed within [`SHUTDOWN_POLL_INTERVAL`] even for long intervals.

use crate::error::FeedError;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Longest a sleeping worker goes without checking its shutdown signal.
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Work run by a [`PeriodicWorker`] once per cycle.
pub trait PeriodicTask: Send + 'static {
    /// Thread name and log target for this task.
    fn name(&self) -> &'static str;

    /// Runs one cycle.
    fn run_once(&mut self);
}

/// When a worker runs its first cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run immediately, then after every interval.
    Immediate,
    /// Wait one interval before the first cycle.
    AfterInterval,
}

/// What a worker does when a cycle panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// The worker stops. Other workers keep running.
    #[default]
    Never,
    /// The worker waits `backoff` and resumes its loop.
    OnPanic {
        /// Delay before the next cycle after a panic.
        backoff: Duration,
        /// Give up after this many restarts; `None` restarts forever.
        max_restarts: Option<u32>,
    },
}

impl RestartPolicy {
    fn allows(&self, restarts_so_far: u32) -> Option<Duration> {
        match *self {
            RestartPolicy::Never => None,
            RestartPolicy::OnPanic {
                backoff,
                max_restarts,
            } => match max_restarts {
                Some(max) if restarts_so_far >= max => None,
                _ => Some(backoff),
            },
        }
    }
}

/// A dedicated thread running a [`PeriodicTask`] until shut down.
///
/// Dropping the worker signals shutdown and joins the thread.
pub struct PeriodicWorker {
    name: &'static str,
    shutdown_signal: Arc<AtomicBool>,
    // Set when a panic ended the loop
    panicked: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PeriodicWorker {
    /// Spawns `task` on a new thread named after it.
    pub fn spawn<T: PeriodicTask>(
        task: T,
        interval: Duration,
        schedule: Schedule,
        policy: RestartPolicy,
    ) -> Result<Self, FeedError> {
        let name = task.name();
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown_signal);
        let panicked = Arc::new(AtomicBool::new(false));
        let thread_panicked = Arc::clone(&panicked);

        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if !Self::run_loop(task, interval, schedule, policy, &thread_shutdown) {
                    thread_panicked.store(true, Ordering::Release);
                }
            })
            .map_err(|source| FeedError::Spawn {
                task: name.to_string(),
                source,
            })?;

        log::debug!("started worker '{name}' every {interval:?}");

        Ok(Self {
            name,
            shutdown_signal,
            panicked,
            thread: Some(thread),
        })
    }

    /// Name of the task this worker runs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Asks the worker to stop after its current cycle, without waiting.
    pub fn signal_shutdown(&self) {
        self.shutdown_signal.store(true, Ordering::Release);
    }

    /// Stops the worker and waits for its thread to exit.
    ///
    /// Returns [`FeedError::TaskPanicked`] if a panic stopped the task before
    /// the shutdown request.
    pub fn shutdown(mut self) -> Result<(), FeedError> {
        self.signal_shutdown();
        self.join()
    }

    /// Waits for the worker thread to exit without signalling it.
    ///
    /// Blocks forever for a healthy worker that is never shut down.
    pub fn wait(mut self) -> Result<(), FeedError> {
        self.join()
    }

    fn join(&mut self) -> Result<(), FeedError> {
        if let Some(handle) = self.thread.take() {
            handle
                .join()
                .map_err(|_| FeedError::TaskPanicked(self.name.to_string()))?;
        }
        if self.panicked.load(Ordering::Acquire) {
            return Err(FeedError::TaskPanicked(self.name.to_string()));
        }
        Ok(())
    }

    /// Returns `false` when a panic the policy would not absorb ended the loop.
    fn run_loop<T: PeriodicTask>(
        mut task: T,
        interval: Duration,
        schedule: Schedule,
        policy: RestartPolicy,
        shutdown_signal: &AtomicBool,
    ) -> bool {
        let name = task.name();
        let mut restarts = 0u32;

        if schedule == Schedule::AfterInterval && !sleep_unless_shutdown(interval, shutdown_signal)
        {
            return true;
        }

        loop {
            if shutdown_signal.load(Ordering::Acquire) {
                break;
            }

            let mut delay = interval;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.run_once())) {
                let reason = panic_message(payload.as_ref());
                match policy.allows(restarts) {
                    Some(backoff) => {
                        restarts += 1;
                        log::warn!(
                            "worker '{name}' panicked ({reason}); restart {restarts} in {backoff:?}"
                        );
                        delay = backoff;
                    }
                    None => {
                        log::error!("worker '{name}' panicked ({reason}); stopping");
                        return false;
                    }
                }
            }

            if !sleep_unless_shutdown(delay, shutdown_signal) {
                break;
            }
        }

        log::debug!("worker '{name}' stopped");
        true
    }
}

impl Drop for PeriodicWorker {
    fn drop(&mut self) {
        self.signal_shutdown();

        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Sleeps for `duration` in slices, returning `false` early if shutdown was requested.
fn sleep_unless_shutdown(duration: Duration, shutdown_signal: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if shutdown_signal.load(Ordering::Acquire) {
            return false;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }
        thread::sleep(remaining.min(SHUTDOWN_POLL_INTERVAL));
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
