use bytes::Bytes;
use std::time::Duration;

use crate::cache::CacheError;
use crate::membership::types::PeerIdentity;

use super::protocol::peer_fetch_path;

/// Upper bound on a single peer fetch, connection included. Large artifacts
/// still have to arrive within this window.
const PEER_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client half of the peer fetch protocol.
///
/// Issues exactly one request per fetch. A miss on the owner maps to
/// [`CacheError::NotFound`]; transport failures and non-success statuses map
/// to [`CacheError::PeerUnavailable`] and are surfaced, not retried.
pub struct PeerClient {
    http: reqwest::Client,
}

impl Default for PeerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Fetch `key` of `group` from `peer`.
    pub async fn fetch(
        &self,
        peer: &PeerIdentity,
        group: &str,
        key: &str,
    ) -> Result<Bytes, CacheError> {
        let url = format!("{}{}", peer.as_str(), peer_fetch_path(group, key));

        let response = self
            .http
            .get(url)
            .timeout(PEER_FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| CacheError::PeerUnavailable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CacheError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(CacheError::PeerUnavailable {
                peer: peer.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::PeerUnavailable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
    }
}
