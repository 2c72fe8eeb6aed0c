//! Peer Fetch Module
//!
//! The node-to-node protocol used when a key's owner is another node.
//!
//! ## Core Concepts
//! - **Client**: one HTTP request to the owner, no retries; retry policy
//!   belongs to the caller of the cache, not to the transport.
//! - **Server**: a handler that answers for keys this node owns, from the
//!   main tier or via a coalesced hydration from the durable store.
//! - **Wire format**: the response body is the raw payload, delimited by
//!   Content-Length; misses are 404, server failures 5xx.

pub mod client;
pub mod handlers;
pub mod protocol;


pub use client::PeerClient;
