use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

/// Which tier a value lands in. Decided by the caller from ownership: main
/// for values this node hydrated as owner, hot for copies fetched from peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Main,
    Hot,
}

/// Point-in-time view of one tier, for the stats surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TierStats {
    pub items: usize,
    pub used_bytes: u64,
    pub budget_bytes: u64,
    pub evictions: u64,
}

struct TierState {
    entries: LruCache<String, Bytes>,
    used_bytes: u64,
    budget_bytes: u64,
    evictions: u64,
}

impl TierState {
    fn new(budget_bytes: u64) -> Self {
        Self {
            entries: LruCache::unbounded(),
            used_bytes: 0,
            budget_bytes,
            evictions: 0,
        }
    }

    fn get(&mut self, key: &str) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: Bytes) -> bool {
        let size = value.len() as u64;
        if size > self.budget_bytes {
            // Larger than the whole tier: serve once, never cache.
            return false;
        }

        if let Some(old) = self.entries.pop(key) {
            self.used_bytes -= old.len() as u64;
        }

        while self.used_bytes + size > self.budget_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.used_bytes -= evicted.len() as u64;
                    self.evictions += 1;
                }
                None => break,
            }
        }

        self.entries.put(key.to_string(), value);
        self.used_bytes += size;
        true
    }

    fn stats(&self) -> TierStats {
        TierStats {
            items: self.entries.len(),
            used_bytes: self.used_bytes,
            budget_bytes: self.budget_bytes,
            evictions: self.evictions,
        }
    }
}

/// Bounded two-tier in-process cache.
///
/// Both tiers are independent LRU structures guarded by their own mutex;
/// critical sections are O(1) map and list operations, never I/O. Entries
/// belong to exactly one tier.
pub struct LocalCache {
    main: Mutex<TierState>,
    hot: Mutex<TierState>,
}

impl LocalCache {
    pub fn new(main_budget_bytes: u64, hot_budget_bytes: u64) -> Self {
        Self {
            main: Mutex::new(TierState::new(main_budget_bytes)),
            hot: Mutex::new(TierState::new(hot_budget_bytes)),
        }
    }

    fn tier(&self, tier: CacheTier) -> &Mutex<TierState> {
        match tier {
            CacheTier::Main => &self.main,
            CacheTier::Hot => &self.hot,
        }
    }

    /// Look the key up in main, then hot. A hit touches recency only in the
    /// tier that held the value.
    pub fn get(&self, key: &str) -> Option<(Bytes, CacheTier)> {
        if let Some(value) = self.main.lock().get(key) {
            return Some((value, CacheTier::Main));
        }
        if let Some(value) = self.hot.lock().get(key) {
            return Some((value, CacheTier::Hot));
        }
        None
    }

    /// Look the key up in one tier only.
    pub fn get_tier(&self, key: &str, tier: CacheTier) -> Option<Bytes> {
        self.tier(tier).lock().get(key)
    }

    /// Insert into a tier, evicting LRU entries until the value fits.
    /// Returns false when the value exceeds the tier's whole budget and was
    /// not cached.
    pub fn insert(&self, key: &str, value: Bytes, tier: CacheTier) -> bool {
        self.tier(tier).lock().insert(key, value)
    }

    /// Presence check without touching recency.
    pub fn contains(&self, key: &str, tier: CacheTier) -> bool {
        self.tier(tier).lock().entries.contains(key)
    }

    pub fn tier_stats(&self, tier: CacheTier) -> TierStats {
        self.tier(tier).lock().stats()
    }
}
