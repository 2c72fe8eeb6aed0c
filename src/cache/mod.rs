//! Cache Engine Module
//!
//! The in-process half of the distributed cache.
//!
//! ## Core Concepts
//! - **Two tiers**: `main` holds values this node is authoritative for (or
//!   hydrated directly); `hot` holds copies of peer-owned values to shed
//!   repeat cross-node reads. Each tier has its own byte budget and LRU order.
//! - **Coalescing**: concurrent misses for one key collapse into a single
//!   backing load; every waiter observes the identical result.
//! - **Orchestration**: `CacheGroup` composes the tiers, the coalescer, the
//!   ownership router, the peer client and the durable store into the
//!   end-to-end Get/Put path.

pub mod group;
pub mod singleflight;
pub mod stats;
pub mod tier;


use thiserror::Error;

use crate::store::StoreError;

pub use group::CacheGroup;
pub use singleflight::CoalescingLoader;
pub use stats::{GroupStats, StatsSnapshot};
pub use tier::{CacheTier, LocalCache};

/// Cache-layer failures. `Clone` so one coalesced load failure can be handed
/// to every waiter for the key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// The key is absent from the durable store and every reachable tier.
    /// A definitive miss, not retried.
    #[error("key not found: {0}")]
    NotFound(String),

    /// The durable store failed. Possibly transient; the caller decides
    /// whether to retry.
    #[error("durable store failure: {0}")]
    Store(String),

    /// The owning peer could not be reached or answered with an error.
    #[error("peer {peer} unavailable: {reason}")]
    PeerUnavailable { peer: String, reason: String },

    /// The in-flight load machinery itself failed.
    #[error("cache load failed: {0}")]
    LoadFailed(String),
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => CacheError::NotFound(key),
            StoreError::Backend(reason) => CacheError::Store(reason),
        }
    }
}
