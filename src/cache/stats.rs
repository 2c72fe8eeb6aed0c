use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use super::tier::TierStats;

/// Process-wide cache counters. Monotonically increasing, updated with
/// relaxed atomics; readers never block writers and slightly stale reads
/// are fine.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    hits_main: AtomicU64,
    hits_hot: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    local_loads: AtomicU64,
    peer_loads: AtomicU64,
    load_errors: AtomicU64,
    puts: AtomicU64,
    put_errors: AtomicU64,
}

/// Serializable view of [`GroupStats`] plus per-tier occupancy, served on
/// `/stats` and logged periodically.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub gets: u64,
    pub hits_main: u64,
    pub hits_hot: u64,
    pub misses: u64,
    pub loads: u64,
    pub local_loads: u64,
    pub peer_loads: u64,
    pub load_errors: u64,
    pub puts: u64,
    pub put_errors: u64,
    pub main: TierStats,
    pub hot: TierStats,
}

impl GroupStats {
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit_main(&self) {
        self.hits_main.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit_hot(&self) {
        self.hits_hot.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_error(&self) {
        self.load_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put_error(&self) {
        self.put_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, main: TierStats, hot: TierStats) -> StatsSnapshot {
        StatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            hits_main: self.hits_main.load(Ordering::Relaxed),
            hits_hot: self.hits_hot.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            load_errors: self.load_errors.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            put_errors: self.put_errors.load(Ordering::Relaxed),
            main,
            hot,
        }
    }
}
