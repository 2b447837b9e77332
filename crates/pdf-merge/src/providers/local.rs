//! Local filesystem object store
//!
//! Each bucket is a directory under the store root and each key is a relative
//! path inside it, so `in/manifests/job1.json` lives at
//! `<root>/in/manifests/job1.json`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

use super::object_store::ObjectStore;

/// Local object store using filesystem
pub struct LocalObjectStore {
    /// Directory holding one subdirectory per bucket
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local object store
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve an object path, rejecting anything that escapes its bucket
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        if !is_plain_relative(bucket) || bucket.contains('/') {
            return Err(Error::storage(format!("Invalid bucket name '{}'", bucket)));
        }
        if !is_plain_relative(key) {
            return Err(Error::storage(format!("Invalid object key '{}'", key)));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

fn is_plain_relative(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found(bucket, key)),
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}/{}: {}",
                bucket, key, e
            ))),
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::storage(format!("Failed to write {}/{}: {}", bucket, key, e)))
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_path_buf()).unwrap();

        store
            .put_object("out", "merged/2024/job1.pdf", b"%PDF-1.5".to_vec())
            .await
            .unwrap();

        assert!(dir.path().join("out/merged/2024/job1.pdf").is_file());
        assert_eq!(
            store.get_object("out", "merged/2024/job1.pdf").await.unwrap(),
            b"%PDF-1.5"
        );
    }

    #[tokio::test]
    async fn test_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_path_buf()).unwrap();

        let err = store.get_object("in", "nope.pdf").await.unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound { .. }));
        assert!(!dir.path().join("in/nope.pdf").exists());
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().join("root")).unwrap();

        for (bucket, key) in [("in", "../secret"), ("..", "a.pdf"), ("in", "/etc/passwd"), ("a/b", "c"), ("", "a.pdf")] {
            let err = store.get_object(bucket, key).await.unwrap_err();
            assert!(matches!(err, Error::Storage(_)), "{}/{}", bucket, key);
        }
    }
}
