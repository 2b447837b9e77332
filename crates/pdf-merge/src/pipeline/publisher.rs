//! Result publishing

use std::path::Path;

use crate::error::{Error, Result};
use crate::providers::ObjectStore;

/// Upload the local artifact at `artifact` to `bucket/key` in one write
///
/// Returns the number of bytes uploaded.
pub async fn publish_artifact(
    store: &dyn ObjectStore,
    artifact: &Path,
    bucket: &str,
    key: &str,
) -> Result<u64> {
    tracing::info!("Uploading {} to {}/{}", artifact.display(), bucket, key);

    let publish_error = |message: String| {
        tracing::error!("Error uploading merged PDF to {}/{}: {}", bucket, key, message);
        Error::Publish {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        }
    };

    let data = tokio::fs::read(artifact)
        .await
        .map_err(|e| publish_error(format!("failed to read {}: {}", artifact.display(), e)))?;
    let size = data.len() as u64;

    store
        .put_object(bucket, key, data)
        .await
        .map_err(|e| publish_error(e.to_string()))?;

    tracing::info!("Successfully uploaded {} bytes to {}/{}", size, bucket, key);
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{LocalObjectStore, MemoryObjectStore};

    #[tokio::test]
    async fn test_publish_copies_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("artifact.pdf");
        std::fs::write(&artifact, b"%PDF-1.5 merged").unwrap();
        let store = MemoryObjectStore::new();

        let size = publish_artifact(&store, &artifact, "out", "merged/job1.pdf")
            .await
            .unwrap();

        assert_eq!(size, 15);
        assert_eq!(store.object("out", "merged/job1.pdf").unwrap(), b"%PDF-1.5 merged");
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryObjectStore::new();

        let err = publish_artifact(&store, &dir.path().join("gone.pdf"), "out", "x.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Publish { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("artifact.pdf");
        std::fs::write(&artifact, b"%PDF").unwrap();
        let store = LocalObjectStore::new(dir.path().join("buckets")).unwrap();

        // Bucket names may not contain separators
        let err = publish_artifact(&store, &artifact, "out/nested", "x.pdf")
            .await
            .unwrap_err();
        match err {
            Error::Publish { bucket, message, .. } => {
                assert_eq!(bucket, "out/nested");
                assert!(message.contains("Invalid bucket"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
