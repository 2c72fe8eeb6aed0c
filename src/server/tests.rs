//! HTTP Surface Tests
//!
//! Drives the full route table of a single node over a real listener with a
//! plain HTTP client, the way a build client would.

#[cfg(test)]
mod tests {
    use crate::cache::CacheGroup;
    use crate::config::DiscoveryConfig;
    use crate::membership::discovery::DiscoverySource;
    use crate::membership::service::MembershipService;
    use crate::membership::types::PeerIdentity;
    use crate::server;
    use crate::store::{MemoryStore, ObjectStore};
    use std::sync::Arc;
    use std::time::Duration;

    async fn spawn_node() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let self_url = format!("http://{}", listener.local_addr().unwrap());

        let source = DiscoverySource::from_config(&DiscoveryConfig::Static {
            peers: vec![self_url.clone()],
        })
        .unwrap();
        let membership = MembershipService::bootstrap(
            PeerIdentity::parse(&self_url).unwrap(),
            source,
            Duration::from_secs(15),
        )
        .await
        .unwrap();

        let store: Arc<dyn ObjectStore> = Arc::new(MemoryStore::new());
        let group = CacheGroup::new("buildcache", 1 << 20, 1 << 17, 10, membership, store);

        let app = server::router(group);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        self_url
    }

    #[tokio::test]
    async fn test_put_then_get_over_http() {
        let base = spawn_node().await;
        let http = reqwest::Client::new();

        let put = http
            .put(format!("{base}/cas/0a1b2c3d"))
            .body(vec![1u8, 2, 3, 4])
            .send()
            .await
            .unwrap();
        assert_eq!(put.status(), reqwest::StatusCode::OK);

        let get = http
            .get(format!("{base}/cas/0a1b2c3d"))
            .send()
            .await
            .unwrap();
        assert_eq!(get.status(), reqwest::StatusCode::OK);
        assert_eq!(get.bytes().await.unwrap().as_ref(), &[1u8, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_action_cache_namespace_round_trip() {
        let base = spawn_node().await;
        let http = reqwest::Client::new();

        http.put(format!("{base}/ac/deadbeef"))
            .body("action-result")
            .send()
            .await
            .unwrap();

        let get = http
            .get(format!("{base}/ac/deadbeef"))
            .send()
            .await
            .unwrap();
        assert_eq!(get.text().await.unwrap(), "action-result");
    }

    #[tokio::test]
    async fn test_get_missing_key_is_404() {
        let base = spawn_node().await;

        let response = reqwest::get(format!("{base}/cas/never-written"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_is_served_for_cached_artifacts() {
        let base = spawn_node().await;
        let http = reqwest::Client::new();

        http.put(format!("{base}/cas/cafef00d"))
            .body("artifact")
            .send()
            .await
            .unwrap();

        let head = http
            .head(format!("{base}/cas/cafef00d"))
            .send()
            .await
            .unwrap();
        assert_eq!(head.status(), reqwest::StatusCode::OK);
        assert!(head.bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_healthz_reports_node_identity() {
        let base = spawn_node().await;

        let response = reqwest::get(format!("{base}/healthz")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["node"], base.as_str());
        assert_eq!(body["group"], "buildcache");
        assert_eq!(body["peers"], 1);
    }

    #[tokio::test]
    async fn test_stats_counters_move() {
        let base = spawn_node().await;
        let http = reqwest::Client::new();

        http.put(format!("{base}/cas/abc"))
            .body("x")
            .send()
            .await
            .unwrap();
        http.get(format!("{base}/cas/abc")).send().await.unwrap();
        http.get(format!("{base}/cas/abc")).send().await.unwrap();

        let stats: serde_json::Value = http
            .get(format!("{base}/stats"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(stats["puts"], 1);
        assert_eq!(stats["gets"], 2);
        assert_eq!(stats["hits_main"], 1);
        assert_eq!(stats["local_loads"], 1);
    }

    #[tokio::test]
    async fn test_peer_endpoint_is_mounted() {
        let base = spawn_node().await;
        let http = reqwest::Client::new();

        http.put(format!("{base}/cas/shared"))
            .body("bytes")
            .send()
            .await
            .unwrap();

        let response = http
            .get(format!("{base}/_cache/buildcache/cas/shared"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "bytes");
    }
}
