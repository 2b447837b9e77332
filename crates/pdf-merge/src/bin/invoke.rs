//! One-shot invocation binary
//!
//! Reads an event (direct form or `Records` batch) from a file or stdin, runs
//! it once and prints the result envelope as JSON.
//!
//! Run with: cargo run -p pdf-merge --features cli --bin pdf-merge -- event.json

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use pdf_merge::{config::MergeConfig, handle_invocation, providers, MergePipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pdf-merge", version, about = "Merge the PDFs listed in a manifest")]
struct Args {
    /// Event JSON file; reads stdin when omitted or `-`
    event: Option<PathBuf>,

    /// Configuration file (overrides PDF_MERGE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit with status 1 when the envelope reports failure
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_merge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MergeConfig::from_file(path)?,
        None => MergeConfig::from_env()?,
    };

    let raw = match args.event.as_deref() {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: serde_json::Value = serde_json::from_str(&raw)?;

    let store = providers::from_config(&config.storage).await?;
    let pipeline = MergePipeline::from_config(store, &config);

    let response = handle_invocation(&pipeline, event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if args.strict && !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
