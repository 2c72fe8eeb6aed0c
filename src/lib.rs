//! Distributed Build-Artifact Cache Library
//!
//! This library crate defines the core modules that make up the cache node.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`cache`**: The in-process caching engine. Two byte-budgeted LRU tiers,
//!   per-key coalescing of concurrent loads, and the `CacheGroup` orchestrator
//!   that ties routing, peers and the durable store together.
//! - **`membership`**: The cluster topology layer. Maintains an immutable peer
//!   snapshot refreshed from a discovery source (static list, DNS SRV records,
//!   or DNS A records).
//! - **`routing`**: Consistent-hash ownership. Maps every cache key onto
//!   exactly one peer for a given membership snapshot, on every node.
//! - **`peer`**: The node-to-node fetch protocol. HTTP client and handler used
//!   when the local node is not the owner of a key.
//! - **`store`**: The durable backing store boundary. An object-store
//!   capability with S3 and in-memory implementations.
//! - **`server`**: The client-facing HTTP surface (action cache and CAS
//!   namespaces, health and stats endpoints).

pub mod cache;
pub mod config;
pub mod membership;
pub mod peer;
pub mod routing;
pub mod server;
pub mod store;
