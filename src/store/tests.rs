//! Store Module Tests
//!
//! Exercises the in-memory backend against the `ObjectStore` contract the
//! cache engine depends on. The S3 backend shares the same contract and is
//! covered by integration environments with a real endpoint.

#[cfg(test)]
mod tests {
    use crate::store::{MemoryStore, ObjectStore, StoreError};
    use bytes::Bytes;

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = MemoryStore::new();

        store
            .put("cas/abc123", Bytes::from_static(b"artifact-bytes"))
            .await
            .unwrap();

        let value = store.get("cas/abc123").await.unwrap();
        assert_eq!(value, Bytes::from_static(b"artifact-bytes"));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let store = MemoryStore::new();

        let err = store.get("cas/never-written").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("cas/never-written".to_string()));
    }

    #[tokio::test]
    async fn test_head_reports_size() {
        let store = MemoryStore::new();
        store
            .put("ac/deadbeef", Bytes::from(vec![0u8; 1024]))
            .await
            .unwrap();

        let size = store.head("ac/deadbeef").await.unwrap();
        assert_eq!(size, Some(1024));
    }

    #[tokio::test]
    async fn test_head_missing_key_is_not_found() {
        let store = MemoryStore::new();

        let err = store.head("ac/missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_object() {
        let store = MemoryStore::new();

        store.put("key", Bytes::from_static(b"v1")).await.unwrap();
        store.put("key", Bytes::from_static(b"v2")).await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Bytes::from_static(b"v2"));
        assert_eq!(store.len(), 1);
    }
}
