//! Media Sync Agent - Main entry point
//!
//! One-way, idempotent upload of local images into a media server album.

use anyhow::Result;
use clap::Parser;
use media_sync_agent::{config::Config, executor::SyncExecutor, utils};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to scan for media (overrides config)
    #[arg(short, long, value_name = "DIR")]
    media_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file when present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = args.config {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    config.apply_env()?;

    if let Some(media_dir) = args.media_dir {
        config.agent.media_dir = media_dir;
    }

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::info!(
        "Starting media-sync-agent v{} (device_id: {})",
        env!("CARGO_PKG_VERSION"),
        config.agent.device_id
    );

    let report = SyncExecutor::new(config).execute().await?;

    if report.failed > 0 {
        tracing::warn!(
            "{} file(s) failed to upload and will be retried on the next run",
            report.failed
        );
    }
    if report.processed > 0 {
        tracing::info!("Done! Processed {} new files.", report.processed);
    } else {
        tracing::debug!("No new files to process");
    }

    Ok(())
}
