//! HTTP Server Module
//!
//! The client-facing surface of a cache node. Build clients read and write
//! artifacts under two namespaces, `/ac/...` (action cache) and `/cas/...`
//! (content-addressed store); both map verbatim into the shared cache key
//! space. The internal peer fetch endpoint is mounted on the same router.

pub mod handlers;

#[cfg(test)]
mod tests;

use axum::extract::Extension;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::cache::CacheGroup;
use crate::peer;
use crate::peer::protocol::PEER_FETCH_ROUTE;

use handlers::{handle_artifact_get, handle_artifact_put, handle_healthz, handle_stats};

/// Assemble the node's full route table over one cache group.
pub fn router(group: Arc<CacheGroup>) -> Router {
    Router::new()
        .route(PEER_FETCH_ROUTE, get(peer::handlers::handle_peer_fetch))
        .route(
            "/ac/*path",
            get(handle_artifact_get).put(handle_artifact_put),
        )
        .route(
            "/cas/*path",
            get(handle_artifact_get).put(handle_artifact_put),
        )
        .route("/healthz", get(handle_healthz))
        .route("/stats", get(handle_stats))
        .layer(Extension(group))
}
