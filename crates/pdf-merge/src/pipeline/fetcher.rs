//! Source document retrieval

use crate::error::{Error, Result};
use crate::providers::ObjectStore;

/// Read one source PDF; a single attempt with no caching
pub async fn fetch_source(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Vec<u8>> {
    let data = store.get_object(bucket, key).await.map_err(|e| {
        tracing::error!("Error downloading PDF {}/{}: {}", bucket, key, e);
        Error::SourceFetch {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        }
    })?;

    tracing::debug!("Downloaded {}/{} ({} bytes)", bucket, key, data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryObjectStore;

    #[tokio::test]
    async fn test_fetch() {
        let store = MemoryObjectStore::new();
        store.insert("in", "a.pdf", b"%PDF".to_vec());

        assert_eq!(fetch_source(&store, "in", "a.pdf").await.unwrap(), b"%PDF");

        let err = fetch_source(&store, "in", "b.pdf").await.unwrap_err();
        assert!(matches!(err, Error::SourceFetch { ref key, .. } if key == "b.pdf"));
    }
}
