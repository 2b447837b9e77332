//! Merge pipeline: manifest → sources → merged document → destination
//!
//! Every run gets its own temporary artifact in the scratch directory, named
//! after a fresh job id. The artifact is held by a [`NamedTempFile`] guard so it
//! is removed whether the run succeeds or fails at any stage.

pub mod fetcher;
pub mod manifest;
pub mod merge;
pub mod publisher;

pub use fetcher::fetch_source;
pub use manifest::{resolve_manifest, Manifest, ManifestError};
pub use merge::{merge_documents, MergeOptions, MergeOutcome, OutputDocument};
pub use publisher::publish_artifact;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::config::MergeConfig;
use crate::error::Result;
use crate::providers::ObjectStore;
use crate::types::{MergeJob, MergeSummary};

/// Runs merge jobs against one object store
pub struct MergePipeline {
    store: Arc<dyn ObjectStore>,
    scratch_dir: PathBuf,
    pdf_version: String,
}

impl MergePipeline {
    /// Create a pipeline writing temporary artifacts under `scratch_dir`
    pub fn new(store: Arc<dyn ObjectStore>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            scratch_dir: scratch_dir.into(),
            pdf_version: MergeOptions::default().pdf_version,
        }
    }

    /// Create from config
    pub fn from_config(store: Arc<dyn ObjectStore>, config: &MergeConfig) -> Self {
        Self::new(store, config.scratch_dir()).with_pdf_version(config.pdf.version.clone())
    }

    /// Set the PDF header version of merged output
    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Run one job to completion
    pub async fn run(&self, job: &MergeJob) -> Result<MergeSummary> {
        let job_id = Uuid::new_v4();
        tracing::info!(
            "Merge job {}: manifest {} -> {} (optimize: {})",
            job_id,
            job.manifest_location(),
            job.destination_location(),
            job.optimize_pdf
        );

        let artifact = self.create_artifact(job_id).inspect_err(|e| {
            tracing::error!("Merge job {}: failed to create temporary artifact: {}", job_id, e);
        })?;

        let result = self.run_stages(job, job_id, artifact.path()).await;

        let path = artifact.path().to_path_buf();
        if let Err(e) = artifact.close() {
            tracing::warn!("Failed to remove temporary artifact {}: {}", path.display(), e);
        }

        match &result {
            Ok(summary) => tracing::info!(
                "Merge job {} complete: {} pages from {} sources, {} bytes",
                job_id,
                summary.pages,
                summary.sources,
                summary.bytes_written
            ),
            Err(e) => tracing::error!("Merge job {} failed: {}", job_id, e),
        }

        result
    }

    async fn run_stages(&self, job: &MergeJob, job_id: Uuid, artifact: &Path) -> Result<MergeSummary> {
        let store = self.store.as_ref();

        let keys = resolve_manifest(store, &job.input_bucket, &job.input_file_key).await?;

        let options = MergeOptions {
            optimize: job.optimize_pdf,
            pdf_version: self.pdf_version.clone(),
        };
        let outcome = merge_documents(store, &job.input_bucket, &keys, artifact, &options).await?;

        let bytes_written =
            publish_artifact(store, artifact, &job.output_bucket, &job.output_file_key).await?;

        Ok(MergeSummary {
            job_id,
            sources: keys.len(),
            skipped_sources: outcome.skipped,
            pages: outcome.pages,
            bytes_written,
            optimized: job.optimize_pdf,
            destination: job.destination_location(),
            completed_at: chrono::Utc::now(),
        })
    }

    fn create_artifact(&self, job_id: Uuid) -> Result<NamedTempFile> {
        std::fs::create_dir_all(&self.scratch_dir)?;
        let artifact = tempfile::Builder::new()
            .prefix(&format!("{}-", job_id))
            .suffix(".pdf")
            .tempfile_in(&self.scratch_dir)?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::MemoryObjectStore;
    use crate::test_support::{labelled_pdf, page_labels};
    use async_trait::async_trait;

    fn job(optimize_pdf: bool) -> MergeJob {
        MergeJob {
            input_bucket: "in".to_string(),
            input_file_key: "manifests/job1.json".to_string(),
            output_bucket: "out".to_string(),
            output_file_key: "merged/job1.pdf".to_string(),
            optimize_pdf,
        }
    }

    fn seeded_store(manifest: &str) -> Arc<MemoryObjectStore> {
        let store = Arc::new(MemoryObjectStore::new());
        store.insert("in", "manifests/job1.json", manifest);
        store.insert("in", "a.pdf", labelled_pdf(&["a.page1"]));
        store.insert("in", "b.pdf", labelled_pdf(&["b.page1", "b.page2"]));
        store
    }

    fn scratch_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_two_source_scenario() {
        let store = seeded_store(r#"{"pdfs": ["a.pdf", "b.pdf"]}"#);
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = MergePipeline::new(store.clone(), scratch.path());

        let summary = pipeline.run(&job(false)).await.unwrap();

        assert_eq!(summary.sources, 2);
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.destination, "out/merged/job1.pdf");
        let output = store.object("out", "merged/job1.pdf").unwrap();
        assert_eq!(summary.bytes_written, output.len() as u64);
        assert_eq!(page_labels(&output), vec!["a.page1", "b.page1", "b.page2"]);
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_optimized_run_has_same_pages() {
        let store = seeded_store(r#"{"pdfs": ["b.pdf", "a.pdf"]}"#);
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = MergePipeline::new(store.clone(), scratch.path());

        let summary = pipeline.run(&job(true)).await.unwrap();
        assert!(summary.optimized);

        let output = store.object("out", "merged/job1.pdf").unwrap();
        assert_eq!(page_labels(&output), vec!["b.page1", "b.page2", "a.page1"]);
    }

    #[tokio::test]
    async fn test_empty_manifest_still_publishes() {
        for manifest in [r#"{"pdfs": []}"#, "{}"] {
            let store = seeded_store(manifest);
            let scratch = tempfile::tempdir().unwrap();
            let pipeline = MergePipeline::new(store.clone(), scratch.path());

            let summary = pipeline.run(&job(false)).await.unwrap();

            assert_eq!(summary.pages, 0);
            let output = store.object("out", "merged/job1.pdf").unwrap();
            assert!(page_labels(&output).is_empty());
            assert!(scratch_is_empty(scratch.path()));
        }
    }

    #[tokio::test]
    async fn test_missing_source_writes_nothing() {
        let store = seeded_store(r#"{"pdfs": ["a.pdf", "nope.pdf"]}"#);
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = MergePipeline::new(store.clone(), scratch.path());

        let err = pipeline.run(&job(false)).await.unwrap_err();

        assert!(matches!(err, Error::Merge(_)));
        assert!(err.to_string().contains("nope.pdf"));
        assert!(!store.contains("out", "merged/job1.pdf"));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let store = Arc::new(MemoryObjectStore::new());
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = MergePipeline::new(store.clone(), scratch.path());

        let err = pipeline.run(&job(false)).await.unwrap_err();
        assert!(matches!(err, Error::ManifestFetch { .. }));
        assert!(scratch_is_empty(scratch.path()));
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryObjectStore);

    #[async_trait]
    impl ObjectStore for ReadOnlyStore {
        async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            self.0.get_object(bucket, key).await
        }

        async fn put_object(&self, _bucket: &str, _key: &str, _data: Vec<u8>) -> Result<()> {
            Err(Error::storage("access denied"))
        }

        fn name(&self) -> &str {
            "read-only"
        }
    }

    #[tokio::test]
    async fn test_publish_failure_removes_artifact() {
        let inner = MemoryObjectStore::new();
        inner.insert("in", "manifests/job1.json", r#"{"pdfs": ["a.pdf"]}"#);
        inner.insert("in", "a.pdf", labelled_pdf(&["a.page1"]));
        let scratch = tempfile::tempdir().unwrap();
        let pipeline = MergePipeline::new(Arc::new(ReadOnlyStore(inner)), scratch.path());

        let err = pipeline.run(&job(false)).await.unwrap_err();

        assert!(matches!(err, Error::Publish { .. }));
        assert!(err.to_string().contains("access denied"));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_creates_scratch_dir() {
        let store = seeded_store(r#"{"pdfs": ["a.pdf"]}"#);
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("nested/scratch");
        let pipeline = MergePipeline::new(store.clone(), &scratch).with_pdf_version("1.7");

        pipeline.run(&job(false)).await.unwrap();

        assert!(scratch.is_dir());
        let output = store.object("out", "merged/job1.pdf").unwrap();
        assert!(output.starts_with(b"%PDF-1.7"));
    }
}
