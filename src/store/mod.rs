//! Durable Store Module
//!
//! The cluster's source of truth on a full cache miss. The cache engine only
//! sees the [`ObjectStore`] capability; the concrete backend is chosen once
//! at startup.
//!
//! ## Core Concepts
//! - **Read-through**: the engine calls `get` exactly once per global miss
//!   (coalesced per node), then serves the bytes from memory.
//! - **Write-through**: `put` goes straight to the backend; the cache is
//!   populated by the next read, never by a write.
//! - **Best-effort sizing**: `head` pre-sizes hydration buffers; a failed
//!   head degrades to size-unknown, never to a failed read.

pub mod memory;
pub mod s3;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// Durable store failures, classified for the cache layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The key does not exist in the backend. A definitive miss.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backend was unreachable or rejected the call. Possibly transient;
    /// surfaced to the caller, never retried here.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Key/value object store with the three operations the engine needs.
///
/// Keys are opaque strings; values are immutable once written.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full object for `key`.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Object size in bytes, if the backend can answer cheaply.
    async fn head(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Write the full object for `key`.
    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError>;
}
