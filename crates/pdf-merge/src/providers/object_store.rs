//! Object store provider trait

use async_trait::async_trait;
use crate::error::Result;

/// Whole-object storage addressed by bucket and key
///
/// Implementations:
/// - `LocalObjectStore`: Local filesystem
/// - `MemoryObjectStore`: In-process map
/// - `GcsObjectStore`: Google Cloud Storage (feature `gcp`)
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the full contents of an object
    ///
    /// Returns `Error::ObjectNotFound` when the object does not exist.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Create or overwrite an object
    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
