use anyhow::{Context, Result, bail};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::discovery::DiscoverySource;
use super::types::{MembershipSnapshot, PeerIdentity};

/// Holds the active [`MembershipSnapshot`] and keeps it fresh.
///
/// `current()` is a lock-free atomic load; request handling never blocks on
/// discovery. The refresh loop runs for the life of the process (static
/// sources install one snapshot and spawn nothing).
pub struct MembershipService {
    pub self_identity: PeerIdentity,
    source: DiscoverySource,
    refresh_interval: Duration,
    snapshot: ArcSwap<MembershipSnapshot>,
    version: AtomicU64,
}

impl MembershipService {
    /// Resolve the peer set once and install the first snapshot.
    ///
    /// The first resolution must succeed and must contain the local node's
    /// own identity, for every discovery mode; otherwise startup fails and
    /// the node never serves traffic.
    pub async fn bootstrap(
        self_identity: PeerIdentity,
        source: DiscoverySource,
        refresh_interval: Duration,
    ) -> Result<Arc<Self>> {
        let peers = source
            .resolve()
            .await
            .context("initial peer discovery failed")?;

        let snapshot = MembershipSnapshot::new(peers, 1);
        if !snapshot.contains(&self_identity) {
            bail!(
                "self not in peers: {} not in {:?}",
                self_identity,
                snapshot.peers()
            );
        }

        tracing::info!(
            "membership bootstrapped with {} peer(s), self {}",
            snapshot.len(),
            self_identity
        );

        Ok(Arc::new(Self {
            self_identity,
            source,
            refresh_interval,
            snapshot: ArcSwap::from_pointee(snapshot),
            version: AtomicU64::new(1),
        }))
    }

    /// The latest accepted snapshot. Lock-free; always fully formed.
    pub fn current(&self) -> Arc<MembershipSnapshot> {
        self.snapshot.load_full()
    }

    pub fn peer_count(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Spawn the periodic refresh task. A static source installs its single
    /// snapshot at bootstrap and needs no background work.
    pub fn start(self: &Arc<Self>) {
        if self.source.is_static() {
            tracing::info!("static peer list; no membership refresh task");
            return;
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.refresh_loop().await;
        });
    }

    async fn refresh_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.refresh_interval);
        // The bootstrap resolution already happened; skip the immediate tick.
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = self.refresh().await {
                tracing::warn!("membership refresh failed, keeping previous snapshot: {e:#}");
            }
        }
    }

    /// Resolve and install a new snapshot. Failures leave the previous
    /// snapshot in place.
    pub async fn refresh(&self) -> Result<()> {
        let peers = self.source.resolve().await?;
        self.apply_peers(peers)
    }

    /// Validate and atomically publish a resolved peer set.
    ///
    /// A set that does not contain this node is rejected: accepting it would
    /// make the cluster disagree about who owns this node's keys.
    pub(crate) fn apply_peers(&self, peers: Vec<PeerIdentity>) -> Result<()> {
        let version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        let snapshot = MembershipSnapshot::new(peers, version);

        if !snapshot.contains(&self.self_identity) {
            bail!(
                "self not in peers: {} not in {:?}",
                self.self_identity,
                snapshot.peers()
            );
        }

        let previous = self.snapshot.load().len();
        if previous != snapshot.len() {
            tracing::info!(
                "membership changed: {} -> {} peer(s)",
                previous,
                snapshot.len()
            );
        }

        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }
}
