use bytes::Bytes;
use std::sync::Arc;

use crate::membership::service::MembershipService;
use crate::membership::types::PeerIdentity;
use crate::peer::client::PeerClient;
use crate::routing::ring::PeerRouter;
use crate::store::ObjectStore;

use super::CacheError;
use super::singleflight::CoalescingLoader;
use super::stats::{GroupStats, StatsSnapshot};
use super::tier::{CacheTier, LocalCache};

/// One logical cache group: a named key space shared by every node of the
/// cluster, fronting one durable store.
///
/// The read path: local tiers, then a coalesced load that either hydrates
/// from the durable store (this node owns the key) or fetches from the
/// owning peer. The write path goes straight through to the durable store;
/// the next read hydrates.
///
/// Dropping a `get`/`put` future abandons only that caller's wait: an
/// in-flight coalesced load keeps running for the remaining waiters.
pub struct CacheGroup {
    name: String,
    cache: LocalCache,
    loader: CoalescingLoader,
    router: PeerRouter,
    membership: Arc<MembershipService>,
    client: PeerClient,
    store: Arc<dyn ObjectStore>,
    stats: GroupStats,
    hot_insert_one_in: u32,
}

impl CacheGroup {
    pub fn new(
        name: impl Into<String>,
        main_budget_bytes: u64,
        hot_budget_bytes: u64,
        hot_insert_one_in: u32,
        membership: Arc<MembershipService>,
        store: Arc<dyn ObjectStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            cache: LocalCache::new(main_budget_bytes, hot_budget_bytes),
            loader: CoalescingLoader::new(),
            router: PeerRouter::new(Arc::clone(&membership)),
            membership,
            client: PeerClient::new(),
            store,
            stats: GroupStats::default(),
            hot_insert_one_in,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn self_identity(&self) -> &PeerIdentity {
        &self.membership.self_identity
    }

    pub fn peer_count(&self) -> usize {
        self.membership.peer_count()
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot(
            self.cache.tier_stats(CacheTier::Main),
            self.cache.tier_stats(CacheTier::Hot),
        )
    }

    /// Read `key`, from memory if possible, otherwise through a single
    /// coalesced load against the owner (local store hydration or peer
    /// fetch).
    pub async fn get(self: &Arc<Self>, key: &str) -> Result<Bytes, CacheError> {
        self.stats.record_get();

        if let Some((value, tier)) = self.cache.get(key) {
            match tier {
                CacheTier::Main => self.stats.record_hit_main(),
                CacheTier::Hot => self.stats.record_hit_hot(),
            }
            return Ok(value);
        }
        self.stats.record_miss();

        let group = Arc::clone(self);
        let key_owned = key.to_string();
        self.loader
            .load(key, move || async move { group.load_uncached(&key_owned).await })
            .await
    }

    /// Write `key` through to the durable store. The cache is intentionally
    /// not populated here; ownership is not checked, any node accepts any
    /// key.
    pub async fn put(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        self.stats.record_put();

        match self.store.put(key, value).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.stats.record_put_error();
                Err(e.into())
            }
        }
    }

    /// The peer-protocol server path: return the authoritative bytes for a
    /// key this node is being asked for as owner. Main tier first, else one
    /// coalesced store hydration into main. Never consults the ring and
    /// never re-routes.
    pub async fn fetch_owned(self: &Arc<Self>, key: &str) -> Result<Bytes, CacheError> {
        if let Some(value) = self.cache.get_tier(key, CacheTier::Main) {
            self.stats.record_hit_main();
            return Ok(value);
        }

        let group = Arc::clone(self);
        let key_owned = key.to_string();
        self.loader
            .load(key, move || async move {
                group.stats.record_load();
                let result = group.hydrate_local(&key_owned).await;
                group.record_outcome(&result);
                result
            })
            .await
    }

    /// Single uncached load for `key`: decide ownership, then hydrate
    /// locally or fetch from the owning peer. Runs at most once per key at
    /// a time (enforced by the coalescer).
    async fn load_uncached(self: &Arc<Self>, key: &str) -> Result<Bytes, CacheError> {
        self.stats.record_load();

        let owner = self.router.owner(key);
        let result = match owner {
            Some(peer) if peer != self.membership.self_identity => {
                self.fetch_from_peer(&peer, key).await
            }
            // Self-owned; an empty ring cannot happen while self is in the
            // snapshot, but degrade to a local read if it ever does.
            _ => self.hydrate_local(key).await,
        };

        self.record_outcome(&result);
        result
    }

    async fn hydrate_local(&self, key: &str) -> Result<Bytes, CacheError> {
        self.stats.record_local_load();
        tracing::debug!("hydrating {} from the durable store", key);

        let value = self.store.get(key).await?;
        self.cache.insert(key, value.clone(), CacheTier::Main);
        Ok(value)
    }

    async fn fetch_from_peer(&self, peer: &PeerIdentity, key: &str) -> Result<Bytes, CacheError> {
        self.stats.record_peer_load();
        tracing::debug!("fetching {} from owner {}", key, peer);

        let value = self.client.fetch(peer, &self.name, key).await?;
        if self.should_hot_insert() {
            self.cache.insert(key, value.clone(), CacheTier::Hot);
        }
        Ok(value)
    }

    fn record_outcome(&self, result: &Result<Bytes, CacheError>) {
        if let Err(e) = result
            && !matches!(e, CacheError::NotFound(_))
        {
            self.stats.record_load_error();
        }
    }

    fn should_hot_insert(&self) -> bool {
        self.hot_insert_one_in <= 1 || rand::random::<u32>() % self.hot_insert_one_in == 0
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &LocalCache {
        &self.cache
    }
}
