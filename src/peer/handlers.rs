use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::cache::{CacheError, CacheGroup};

/// Serve an owned key to a requesting peer.
///
/// The requester already decided we are the owner; this handler answers
/// authoritatively (main tier, else durable store) and never re-routes, so
/// two nodes briefly disagreeing about ownership cannot create a forwarding
/// loop.
pub async fn handle_peer_fetch(
    Extension(group): Extension<Arc<CacheGroup>>,
    Path((group_name, key)): Path<(String, String)>,
) -> Response {
    if group_name != group.name() {
        tracing::warn!("peer fetch for unknown group {:?}", group_name);
        return StatusCode::NOT_FOUND.into_response();
    }

    match group.fetch_owned(&key).await {
        Ok(value) => (StatusCode::OK, value).into_response(),
        Err(CacheError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("peer fetch for {} failed: {}", key, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
