use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{ObjectStore, StoreError};

/// Process-local object store.
///
/// Used as the durable backend in development mode and throughout the test
/// suite. Not durable across restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        match self.objects.get(key) {
            Some(value) => Ok(value.clone()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn head(&self, key: &str) -> Result<Option<u64>, StoreError> {
        match self.objects.get(key) {
            Some(value) => Ok(Some(value.len() as u64)),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        self.objects.insert(key.to_string(), value);
        Ok(())
    }
}
