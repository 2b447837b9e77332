//! In-memory object store

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{Error, Result};

use super::object_store::ObjectStore;

/// Object store backed by a concurrent map
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: DashMap<(String, String), Vec<u8>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through the async trait
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        self.objects
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Copy of an object's bytes, if present
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.object(bucket, key)
            .ok_or_else(|| Error::not_found(bucket, key))
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        self.insert(bucket, key, data);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
