//! Ownership Routing Module
//!
//! Maps every cache key onto exactly one peer using a consistent-hash ring.
//!
//! ## Core Concepts
//! - **Determinism**: two nodes holding the same membership snapshot compute
//!   the same owner for every key, with no coordination.
//! - **Virtual points**: each peer occupies many points on the ring so that
//!   key ownership stays roughly balanced and membership changes only move
//!   the keys adjacent to the affected peer.
//! - **Rebuild on change**: the ring is rebuilt only when a new snapshot is
//!   installed, never per request.

pub mod ring;

#[cfg(test)]
mod tests;

pub use ring::{HashRing, PeerRouter};
