//! Peer Network Protocol
//!
//! Defines the single internal endpoint nodes use to fetch owned values
//! from each other.
//!
//! A request identifies the logical group and the key; the response is the
//! raw byte payload with an explicit Content-Length, a 404 for a key absent
//! from the durable store, or a 5xx for a server-side failure. There are no
//! partial or chunk-streamed semantics beyond the length-delimited body.
//!
//! Keys may contain path separators (`ac/...`, `cas/...`) and are carried
//! verbatim in the URL path; the namespaces in use are hex-digest based and
//! need no additional encoding.

/// Internal fetch endpoint prefix, mounted on every node.
pub const ENDPOINT_PEER_FETCH: &str = "/_cache";

/// Axum route pattern for the fetch endpoint.
pub const PEER_FETCH_ROUTE: &str = "/_cache/:group/*key";

/// URL path for fetching `key` of `group` from a peer.
pub fn peer_fetch_path(group: &str, key: &str) -> String {
    format!("{ENDPOINT_PEER_FETCH}/{group}/{key}")
}
