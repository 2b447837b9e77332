//! Configuration for the merge service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the TOML configuration file
pub const CONFIG_ENV_VAR: &str = "PDF_MERGE_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Object store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Output document configuration
    #[serde(default)]
    pub pdf: PdfConfig,
    /// Directory for temporary merge artifacts (default: OS temp dir)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl MergeConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load from the file named by `PDF_MERGE_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Resolved scratch directory for temporary artifacts
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_size: 1024 * 1024,
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem, one directory per bucket
    #[default]
    Local,
    /// Google Cloud Storage
    Gcp,
}

/// Object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend provider (local or gcp)
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the local backend; buckets are subdirectories
    #[serde(default = "default_local_root")]
    pub local_root: PathBuf,
}

fn default_local_root() -> PathBuf {
    PathBuf::from("./buckets")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_root: default_local_root(),
        }
    }
}

/// Output document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    /// PDF header version written to merged output
    #[serde(default = "default_pdf_version")]
    pub version: String,
}

fn default_pdf_version() -> String {
    "1.5".to_string()
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            version: default_pdf_version(),
        }
    }
}
