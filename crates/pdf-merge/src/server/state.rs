//! Application state for the merge server

use std::sync::Arc;

use crate::config::MergeConfig;
use crate::error::Result;
use crate::pipeline::MergePipeline;
use crate::providers::{self, ObjectStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: MergeConfig,
    /// Pipeline bound to the configured object store
    pipeline: MergePipeline,
}

impl AppState {
    /// Create state with the object store selected by `config`
    pub async fn new(config: MergeConfig) -> Result<Self> {
        tracing::info!(
            "Initializing merge service state (storage backend: {:?})...",
            config.storage.backend
        );
        let store = providers::from_config(&config.storage).await?;
        Ok(Self::with_store(config, store))
    }

    /// Create state around an existing object store
    pub fn with_store(config: MergeConfig, store: Arc<dyn ObjectStore>) -> Self {
        let pipeline = MergePipeline::from_config(store, &config);
        tracing::info!(
            "Object store: {}, scratch dir: {}",
            pipeline.store().name(),
            pipeline.scratch_dir().display()
        );
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &MergePipeline {
        &self.inner.pipeline
    }
}
