use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Cumulative counters for a [`TimeSeriesStore`](super::TimeSeriesStore).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total calls to `insert`.
    pub inserts: u64,
    /// Inserts that replaced an existing entry with the same timestamp.
    pub overwrites: u64,
    /// Entries removed by `delete_older_than`.
    pub evicted: u64,
    /// Calls to `delete_older_than` that removed at least one entry.
    pub sweeps: u64,
}

#[derive(Debug, Default)]
pub(super) struct StatsCounters {
    inserts: AtomicU64,
    overwrites: AtomicU64,
    evicted: AtomicU64,
    sweeps: AtomicU64,
}

impl StatsCounters {
    pub(super) fn record_insert(&self, overwrote: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        if overwrote {
            self.overwrites.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn record_sweep(&self, removed: usize) {
        if removed > 0 {
            self.evicted.fetch_add(removed as u64, Ordering::Relaxed);
            self.sweeps.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn snapshot(&self) -> StoreStats {
        StoreStats {
            inserts: self.inserts.load(Ordering::Relaxed),
            overwrites: self.overwrites.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
        }
    }
}
