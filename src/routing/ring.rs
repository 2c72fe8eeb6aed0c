use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::membership::service::MembershipService;
use crate::membership::types::{MembershipSnapshot, PeerIdentity};

/// Virtual points placed on the ring per peer.
pub const DEFAULT_REPLICAS: usize = 50;

fn hash_point(data: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    hasher.finish()
}

/// Consistent-hash ring over one membership snapshot.
///
/// Construction iterates the snapshot's sorted peers, so the same snapshot
/// contents always produce the same ring regardless of discovery order. A
/// hash collision between two virtual points keeps the later peer in that
/// iteration order.
pub struct HashRing {
    points: BTreeMap<u64, usize>,
    peers: Vec<PeerIdentity>,
}

impl HashRing {
    pub fn from_snapshot(snapshot: &MembershipSnapshot) -> Self {
        Self::with_replicas(snapshot, DEFAULT_REPLICAS)
    }

    pub fn with_replicas(snapshot: &MembershipSnapshot, replicas: usize) -> Self {
        let peers: Vec<PeerIdentity> = snapshot.peers().to_vec();
        let mut points = BTreeMap::new();

        for (index, peer) in peers.iter().enumerate() {
            for replica in 0..replicas {
                points.insert(hash_point(&format!("{replica}{peer}")), index);
            }
        }

        Self { points, peers }
    }

    /// The peer that owns `key`: the nearest ring successor of the key's
    /// hash, wrapping to the first point.
    pub fn owner(&self, key: &str) -> Option<&PeerIdentity> {
        if self.points.is_empty() {
            return None;
        }

        let hash = hash_point(key);
        let index = self
            .points
            .range(hash..)
            .next()
            .or_else(|| self.points.iter().next())
            .map(|(_, index)| *index)?;

        self.peers.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Routes keys against the live membership, rebuilding the ring only when a
/// new snapshot version is observed.
pub struct PeerRouter {
    membership: Arc<MembershipService>,
    cached: Mutex<Option<(u64, Arc<HashRing>)>>,
}

impl PeerRouter {
    pub fn new(membership: Arc<MembershipService>) -> Self {
        Self {
            membership,
            cached: Mutex::new(None),
        }
    }

    /// The ring for the current snapshot, rebuilt at most once per snapshot
    /// version.
    pub fn ring(&self) -> Arc<HashRing> {
        let snapshot = self.membership.current();

        let mut cached = self.cached.lock();
        if let Some((version, ring)) = cached.as_ref()
            && *version == snapshot.version()
        {
            return Arc::clone(ring);
        }

        let ring = Arc::new(HashRing::from_snapshot(&snapshot));
        tracing::debug!(
            "rebuilt hash ring for snapshot v{} with {} peer(s)",
            snapshot.version(),
            snapshot.len()
        );
        *cached = Some((snapshot.version(), Arc::clone(&ring)));
        ring
    }

    /// The peer that owns `key` under the current snapshot.
    pub fn owner(&self, key: &str) -> Option<PeerIdentity> {
        self.ring().owner(key).cloned()
    }
}
