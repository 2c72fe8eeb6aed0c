//! Membership Module Tests
//!
//! Validates identity parsing, snapshot construction, and the self-presence
//! rules around bootstrap and refresh.
//!
//! *Note: DNS-backed sources need a resolver and live records; they are
//! exercised in integration environments. The static source and the
//! snapshot-acceptance logic are covered here.*

#[cfg(test)]
mod tests {
    use crate::config::DiscoveryConfig;
    use crate::membership::discovery::DiscoverySource;
    use crate::membership::service::MembershipService;
    use crate::membership::types::{MembershipSnapshot, PeerIdentity};
    use std::time::Duration;

    fn identity(raw: &str) -> PeerIdentity {
        PeerIdentity::parse(raw).unwrap()
    }

    async fn two_node_service() -> std::sync::Arc<MembershipService> {
        let source = DiscoverySource::from_config(&DiscoveryConfig::Static {
            peers: vec![
                "http://127.0.0.1:8080".to_string(),
                "http://127.0.0.1:8081".to_string(),
            ],
        })
        .unwrap();

        MembershipService::bootstrap(
            identity("http://127.0.0.1:8080"),
            source,
            Duration::from_secs(15),
        )
        .await
        .unwrap()
    }

    // ============================================================
    // PEER IDENTITY
    // ============================================================

    #[test]
    fn test_identity_normalizes_trailing_slash() {
        assert_eq!(
            identity("http://cache-0.internal:8080/"),
            identity("http://cache-0.internal:8080")
        );
    }

    #[test]
    fn test_identity_rejects_garbage() {
        assert!(PeerIdentity::parse("not a url").is_err());
        assert!(PeerIdentity::parse("ftp://cache-0:8080").is_err());
    }

    #[test]
    fn test_identity_from_host_port_strips_root_dot() {
        // SRV targets come back as fully qualified names with a trailing dot.
        let peer = PeerIdentity::from_host_port("cache-0.internal.", 9090);
        assert_eq!(peer.as_str(), "http://cache-0.internal:9090");
    }

    // ============================================================
    // SNAPSHOT
    // ============================================================

    #[test]
    fn test_snapshot_sorts_and_dedups() {
        let snapshot = MembershipSnapshot::new(
            vec![
                identity("http://b:1"),
                identity("http://a:1"),
                identity("http://b:1"),
            ],
            1,
        );

        assert_eq!(
            snapshot.peers(),
            &[identity("http://a:1"), identity("http://b:1")]
        );
        assert!(snapshot.contains(&identity("http://a:1")));
        assert!(!snapshot.contains(&identity("http://c:1")));
    }

    #[test]
    fn test_snapshot_is_order_independent() {
        let forward = MembershipSnapshot::new(vec![identity("http://a:1"), identity("http://b:1")], 1);
        let reverse = MembershipSnapshot::new(vec![identity("http://b:1"), identity("http://a:1")], 1);
        assert_eq!(forward, reverse);
    }

    // ============================================================
    // BOOTSTRAP / REFRESH POLICY
    // ============================================================

    #[tokio::test]
    async fn test_bootstrap_with_static_peers() {
        let service = two_node_service().await;

        let snapshot = service.current();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(&service.self_identity));
    }

    #[tokio::test]
    async fn test_bootstrap_fails_when_self_missing() {
        let source = DiscoverySource::from_config(&DiscoveryConfig::Static {
            peers: vec!["http://127.0.0.1:8081".to_string()],
        })
        .unwrap();

        let result = MembershipService::bootstrap(
            identity("http://127.0.0.1:8080"),
            source,
            Duration::from_secs(15),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_fails_on_malformed_peer() {
        let result = DiscoverySource::from_config(&DiscoveryConfig::Static {
            peers: vec!["http://ok:8080".to_string(), "::garbage::".to_string()],
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_refresh_missing_self_keeps_previous_snapshot() {
        let service = two_node_service().await;
        let before = service.current();

        let result = service.apply_peers(vec![identity("http://127.0.0.1:9999")]);
        assert!(result.is_err());

        let after = service.current();
        assert_eq!(before.peers(), after.peers());
        assert_eq!(before.version(), after.version());
    }

    #[tokio::test]
    async fn test_refresh_installs_grown_peer_set() {
        let service = two_node_service().await;

        service
            .apply_peers(vec![
                identity("http://127.0.0.1:8080"),
                identity("http://127.0.0.1:8081"),
                identity("http://127.0.0.1:8082"),
            ])
            .unwrap();

        let snapshot = service.current();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.version() > 1);
    }

    #[tokio::test]
    async fn test_static_source_needs_no_refresh_task() {
        let source = DiscoverySource::from_config(&DiscoveryConfig::Static {
            peers: vec!["http://127.0.0.1:8080".to_string()],
        })
        .unwrap();
        assert!(source.is_static());
    }
}
