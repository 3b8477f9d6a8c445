use super::stats::{StatsCounters, StoreStats};
use crate::reading::Reading;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A concurrency-safe table of temperatures keyed by millisecond timestamp.
///
/// Keys are unique: inserting at an existing timestamp overwrites the value. The
/// table never shrinks on its own; only [`delete_older_than`](Self::delete_older_than)
/// removes entries.
///
/// A panic on another thread while it holds the lock does not poison the table for
/// everyone else. Every operation leaves the map consistent before it can unwind, so
/// the guard is recovered instead of propagated.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    entries: RwLock<BTreeMap<u64, f64>>,
    /// Mirrors `entries.len()`; updated under the write lock.
    len: AtomicUsize,
    stats: StatsCounters,
}

impl TimeSeriesStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a temperature at `timestamp`, replacing any existing value there.
    pub fn insert(&self, timestamp: u64, temperature: f64) {
        let overwrote = {
            let mut entries = self.write();
            let overwrote = entries.insert(timestamp, temperature).is_some();
            self.len.store(entries.len(), Ordering::Release);
            overwrote
        };
        self.stats.record_insert(overwrote);
    }

    /// Inserts a [`Reading`].
    pub fn insert_reading(&self, reading: Reading) {
        self.insert(reading.timestamp, reading.temperature);
    }

    /// Returns the number of entries.
    ///
    /// Does not take the lock, so it may briefly lag a concurrent insert or delete.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry with `timestamp < threshold`.
    ///
    /// The removal is atomic with respect to other store operations: an insert at or
    /// above `threshold` racing with this call always survives it.
    ///
    /// # Returns
    ///
    /// Number of entries removed
    pub fn delete_older_than(&self, threshold: u64) -> usize {
        let removed = {
            let mut entries = self.write();
            let kept = entries.split_off(&threshold);
            let removed = std::mem::replace(&mut *entries, kept);
            self.len.store(entries.len(), Ordering::Release);
            removed
        };

        // Freeing up to a few hundred thousand nodes happens outside the lock.
        let count = removed.len();
        drop(removed);
        self.stats.record_sweep(count);
        count
    }

    /// Copies out every entry with `timestamp >= threshold`, oldest first.
    ///
    /// The result is a snapshot: later inserts and deletes do not affect it.
    pub fn snapshot_since(&self, threshold: u64) -> Vec<Reading> {
        self.read().range(threshold..).map(Reading::from).collect()
    }

    /// Returns the cumulative operation counters.
    pub fn stats(&self) -> StoreStats {
        self.stats.snapshot()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, f64>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, f64>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
