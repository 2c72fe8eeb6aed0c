use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A peer node's network identity: its normalized base URL.
///
/// Identities are immutable once part of a snapshot and totally ordered so
/// that snapshot construction and ring construction are deterministic across
/// nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerIdentity(String);

impl PeerIdentity {
    /// Parse and normalize a peer URL. The URL must carry an http(s) scheme
    /// and a host; a trailing slash is stripped so equal peers compare equal.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = reqwest::Url::parse(raw).with_context(|| format!("invalid peer URL {raw:?}"))?;

        match url.scheme() {
            "http" | "https" => {}
            other => bail!("unsupported peer URL scheme {other:?} in {raw:?}"),
        }
        if url.host_str().is_none() {
            bail!("peer URL {raw:?} has no host");
        }

        Ok(Self(raw.trim_end_matches('/').to_string()))
    }

    /// Build an identity from a resolved host and port, http scheme.
    pub fn from_host_port(host: &str, port: u16) -> Self {
        let host = host.trim_end_matches('.');
        Self(format!("http://{host}:{port}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable, versioned view of the peer set.
///
/// Peers are sorted and deduplicated at construction, so two snapshots built
/// from the same peers in any order are identical. Snapshots are replaced,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipSnapshot {
    peers: Vec<PeerIdentity>,
    version: u64,
}

impl MembershipSnapshot {
    pub fn new(mut peers: Vec<PeerIdentity>, version: u64) -> Self {
        peers.sort();
        peers.dedup();
        Self { peers, version }
    }

    pub fn peers(&self) -> &[PeerIdentity] {
        &self.peers
    }

    pub fn contains(&self, peer: &PeerIdentity) -> bool {
        self.peers.binary_search(peer).is_ok()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Replacement counter; increases monotonically with each installed
    /// snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }
}
