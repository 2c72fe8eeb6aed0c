//! Routing Module Tests
//!
//! Validates ownership determinism, balance, and stability of the
//! consistent-hash ring.

#[cfg(test)]
mod tests {
    use crate::membership::types::{MembershipSnapshot, PeerIdentity};
    use crate::routing::ring::HashRing;
    use std::collections::HashMap;

    fn identity(raw: &str) -> PeerIdentity {
        PeerIdentity::parse(raw).unwrap()
    }

    fn snapshot(urls: &[&str]) -> MembershipSnapshot {
        MembershipSnapshot::new(urls.iter().map(|u| identity(u)).collect(), 1)
    }

    #[test]
    fn test_owner_is_deterministic() {
        let snap = snapshot(&["http://a:1", "http://b:1", "http://c:1"]);
        let ring = HashRing::from_snapshot(&snap);

        let first = ring.owner("cas/abc123").unwrap().clone();
        for _ in 0..100 {
            assert_eq!(ring.owner("cas/abc123"), Some(&first));
        }
    }

    #[test]
    fn test_independently_built_rings_agree() {
        // Same snapshot contents, different construction order upstream.
        let forward = snapshot(&["http://a:1", "http://b:1", "http://c:1"]);
        let reverse = snapshot(&["http://c:1", "http://b:1", "http://a:1"]);

        let ring_a = HashRing::from_snapshot(&forward);
        let ring_b = HashRing::from_snapshot(&reverse);

        for i in 0..1000 {
            let key = format!("cas/object-{i}");
            assert_eq!(ring_a.owner(&key), ring_b.owner(&key), "key {key}");
        }
    }

    #[test]
    fn test_single_peer_owns_everything() {
        let snap = snapshot(&["http://only:1"]);
        let ring = HashRing::from_snapshot(&snap);

        for i in 0..100 {
            let key = format!("ac/action-{i}");
            assert_eq!(ring.owner(&key), Some(&identity("http://only:1")));
        }
    }

    #[test]
    fn test_empty_snapshot_has_no_owner() {
        let ring = HashRing::from_snapshot(&snapshot(&[]));
        assert!(ring.is_empty());
        assert_eq!(ring.owner("anything"), None);
    }

    #[test]
    fn test_keys_spread_across_peers() {
        let snap = snapshot(&["http://a:1", "http://b:1", "http://c:1", "http://d:1"]);
        let ring = HashRing::from_snapshot(&snap);

        let mut counts: HashMap<PeerIdentity, usize> = HashMap::new();
        for i in 0..10_000 {
            let owner = ring.owner(&format!("cas/object-{i}")).unwrap().clone();
            *counts.entry(owner).or_insert(0) += 1;
        }

        // All four peers should see a meaningful share of 10k keys.
        assert_eq!(counts.len(), 4);
        for (peer, count) in counts {
            assert!(count > 1000, "{peer} owns only {count} of 10000 keys");
        }
    }

    #[test]
    fn test_membership_growth_moves_few_keys() {
        let three = snapshot(&["http://a:1", "http://b:1", "http://c:1"]);
        let four = snapshot(&["http://a:1", "http://b:1", "http://c:1", "http://d:1"]);

        let ring_before = HashRing::from_snapshot(&three);
        let ring_after = HashRing::from_snapshot(&four);

        let total = 10_000;
        let moved = (0..total)
            .filter(|i| {
                let key = format!("cas/object-{i}");
                ring_before.owner(&key) != ring_after.owner(&key)
            })
            .count();

        // Consistent hashing: adding one of four peers should move roughly a
        // quarter of the keys, not most of them.
        assert!(moved < total / 2, "{moved} of {total} keys moved");
    }

    #[test]
    fn test_replicas_improve_balance() {
        let snap = snapshot(&["http://a:1", "http://b:1"]);
        let ring = HashRing::with_replicas(&snap, 1);

        // Even a single-point ring still routes every key somewhere.
        for i in 0..100 {
            assert!(ring.owner(&format!("k{i}")).is_some());
        }
    }
}
