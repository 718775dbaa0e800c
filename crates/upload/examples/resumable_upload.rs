//! Uploads a local file in 1 MiB chunks.
//!
//! ```text
//! cargo run -p up2share-upload --example resumable_upload -- <file> [config.json]
//! ```
//!
//! The optional config file holds `ClientConfig` settings, for example
//! `{"apiKey": "...", "timeoutSecs": 30}`.

use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use up2share_transport::{ApiClient, ClientConfig};
use up2share_upload::ResumableUploadHandler;

const CHUNK_SIZE: u64 = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,up2share=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let file_path = PathBuf::from(args.next().context("usage: resumable_upload <file> [config.json]")?);

    let config = match args.next() {
        Some(path) => ClientConfig::from_json_file(&PathBuf::from(path))?,
        None => ClientConfig::default().with_timeout_secs(30),
    };

    let client = ApiClient::new(config)?;
    let handler = ResumableUploadHandler::new(client);

    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    let mut file = tokio::fs::File::open(&file_path)
        .await
        .with_context(|| format!("failed to open {}", file_path.display()))?;

    let report = handler
        .drive_upload(&mut file, CHUNK_SIZE, filename.as_deref())
        .await?;

    match report.outcome.location() {
        Some(location) => println!("uploaded {} bytes -> {location}", report.bytes_sent),
        None => println!(
            "uploaded {} bytes (confirmed: {})",
            report.bytes_sent,
            report.is_confirmed()
        ),
    }

    Ok(())
}
