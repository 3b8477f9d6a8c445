//! Size-triggered, age-based eviction.

use crate::clock::Clock;
use crate::store::TimeSeriesStore;
use crate::worker::PeriodicTask;
use std::sync::Arc;

/// Result of one eviction sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The store was at or under its bound; nothing was touched.
    WithinBound {
        /// Store size observed by the sweep.
        len: usize,
    },
    /// Entries older than `threshold` were deleted.
    Evicted {
        /// Oldest timestamp kept.
        threshold: u64,
        /// Number of entries removed.
        removed: usize,
    },
}

/// Periodically trims the store once it grows past `max_entries`.
///
/// When over the bound, the sweep deletes everything older than
/// `now - max_entries` milliseconds. The entry count doubles as an age in
/// milliseconds, which keeps the store near `max_entries` only while the feed writes
/// about one reading per millisecond. At other insert rates the store settles at a
/// different size.
pub struct Evictor<C: Clock> {
    store: Arc<TimeSeriesStore>,
    clock: C,
    max_entries: usize,
}

impl<C: Clock> Evictor<C> {
    /// Creates an evictor bounding `store` to `max_entries`.
    pub fn new(store: Arc<TimeSeriesStore>, clock: C, max_entries: usize) -> Self {
        Self {
            store,
            clock,
            max_entries,
        }
    }

    /// Runs one sweep.
    pub fn sweep(&self) -> SweepOutcome {
        let len = self.store.len();
        if len <= self.max_entries {
            return SweepOutcome::WithinBound { len };
        }

        let threshold = self
            .clock
            .now_ms()
            .saturating_sub(self.max_entries as u64);
        let removed = self.store.delete_older_than(threshold);

        log::debug!(
            "evicted {removed} readings older than {threshold} ({} remain)",
            self.store.len()
        );

        SweepOutcome::Evicted { threshold, removed }
    }
}

impl<C: Clock + 'static> PeriodicTask for Evictor<C> {
    fn name(&self) -> &'static str {
        "evictor"
    }

    fn run_once(&mut self) {
        self.sweep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn populated(range: std::ops::Range<u64>) -> Arc<TimeSeriesStore> {
        let store = Arc::new(TimeSeriesStore::new());
        for ts in range {
            store.insert(ts, 20.0);
        }
        store
    }

    #[test]
    fn test_sweep_trims_to_age_bound() {
        let store = populated(0..600_000);
        let evictor = Evictor::new(Arc::clone(&store), ManualClock::new(600_000), 500_000);

        let outcome = evictor.sweep();

        assert_eq!(
            outcome,
            SweepOutcome::Evicted {
                threshold: 100_000,
                removed: 100_000
            }
        );
        assert_eq!(store.len(), 500_000);
        let remaining = store.snapshot_since(0);
        assert_eq!(remaining.first().unwrap().timestamp, 100_000);
        assert_eq!(remaining.last().unwrap().timestamp, 599_999);
    }

    #[test]
    fn test_sweep_leaves_store_within_bound_untouched() {
        let store = populated(0..1_000);
        let evictor = Evictor::new(Arc::clone(&store), ManualClock::new(1_000_000), 1_000);

        assert_eq!(evictor.sweep(), SweepOutcome::WithinBound { len: 1_000 });
        assert_eq!(store.len(), 1_000);
        assert_eq!(store.stats().sweeps, 0);
    }

    #[test]
    fn test_sweep_threshold_saturates() {
        let store = populated(0..20);
        let evictor = Evictor::new(Arc::clone(&store), ManualClock::new(5), 10);

        // now - max_entries underflows to 0, so nothing is old enough to go
        assert_eq!(
            evictor.sweep(),
            SweepOutcome::Evicted {
                threshold: 0,
                removed: 0
            }
        );
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn test_sparse_inserts_evict_by_age_not_count() {
        // One reading every 10 ms: the age bound keeps far fewer than max_entries
        let store = Arc::new(TimeSeriesStore::new());
        for i in 0..200u64 {
            store.insert(i * 10, 20.0);
        }
        let evictor = Evictor::new(Arc::clone(&store), ManualClock::new(2_000), 100);

        evictor.sweep();

        assert_eq!(store.len(), 10); // 1_900..=1_990
    }
}
