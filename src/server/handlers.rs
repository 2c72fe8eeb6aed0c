use axum::Json;
use axum::extract::{Extension, OriginalUri};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{CacheError, CacheGroup, StatsSnapshot};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub node: String,
    pub group: String,
    pub peers: usize,
}

/// GET (and HEAD, served by axum's GET routing) for `/ac/*` and `/cas/*`.
/// The full request path, without its leading slash, is the cache key.
pub async fn handle_artifact_get(
    Extension(group): Extension<Arc<CacheGroup>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let key = uri.path().trim_start_matches('/').to_string();

    match group.get(&key).await {
        Ok(value) => (StatusCode::OK, value).into_response(),
        Err(CacheError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("get for {} failed: {}", key, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to retrieve key",
            )
                .into_response()
        }
    }
}

/// PUT for `/ac/*` and `/cas/*`: write-through to the durable store. The
/// next read hydrates the cache.
pub async fn handle_artifact_put(
    Extension(group): Extension<Arc<CacheGroup>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    let key = uri.path().trim_start_matches('/').to_string();

    match group.put(&key, body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("put for {} failed: {}", key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "put failed").into_response()
        }
    }
}

pub async fn handle_healthz(
    Extension(group): Extension<Arc<CacheGroup>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            node: group.self_identity().to_string(),
            group: group.name().to_string(),
            peers: group.peer_count(),
        }),
    )
}

pub async fn handle_stats(
    Extension(group): Extension<Arc<CacheGroup>>,
) -> (StatusCode, Json<StatsSnapshot>) {
    (StatusCode::OK, Json(group.stats_snapshot()))
}
