//! Merge server binary
//!
//! Run with: cargo run -p pdf-merge --bin pdf-merge-server

use pdf_merge::{config::MergeConfig, server::MergeServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_merge=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = MergeConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Storage backend: {:?}", config.storage.backend);
    tracing::info!("  - Local root: {}", config.storage.local_root.display());
    tracing::info!("  - Scratch dir: {}", config.scratch_dir().display());
    tracing::info!("  - PDF version: {}", config.pdf.version);

    let server = MergeServer::new(config).await?;

    tracing::info!("API: http://{}", server.address());
    tracing::info!("  POST /api/invoke - Run a direct or batched event");
    tracing::info!("  POST /api/merge  - Run a single merge job");

    server.start().await?;

    Ok(())
}
