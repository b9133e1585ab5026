//! Sync run orchestration.
//!
//! Drives one full pass: endpoint selection, album resolution, progress
//! load, then the sequential per-file upload/link/record loop. Fatal
//! failures abort before any file is touched; per-file failures are
//! contained to that file and never abort the run.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fs::scanner::{scan_directory, ScanOptions};
use crate::progress::ProgressStore;
use crate::remote::endpoint::select_base_url;
use crate::remote::{RemoteClient, UploadOutcome};
use crate::utils::errors::Result;

/// Summary of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Candidates found in the media directory
    pub scanned: usize,

    /// Candidates already settled before this run
    pub skipped: usize,

    /// Files newly settled in this run
    pub processed: usize,

    /// Newly created remote assets
    pub created: usize,

    /// Settled through server-side dedup (200) or rejection (409)
    pub deduplicated: usize,

    /// Upload failures left for the next run
    pub failed: usize,

    /// Settled files whose album link failed (logged, not retried)
    pub link_failures: usize,
}

pub struct SyncExecutor {
    config: Config,
}

impl SyncExecutor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one synchronization pass.
    pub async fn execute(&self) -> Result<SyncReport> {
        // Fatal before any network contact
        self.config.validate()?;

        let base_url = select_base_url(
            self.config.server.primary_url.as_deref(),
            self.config.server.fallback_url.as_deref(),
            self.config.http.probe_timeout(),
        )
        .await?;

        let client = RemoteClient::new(base_url, &self.config)?;

        info!("Looking for album: '{}'", self.config.server.album);
        let album_id = client.resolve_album(&self.config.server.album).await?;

        let mut store = ProgressStore::load(&self.config.agent.progress_file);
        debug!("Progress store holds {} entries", store.len());

        let options = ScanOptions {
            extensions: self.config.agent.extensions.clone(),
            recursive: self.config.agent.recursive,
        };
        let files = scan_directory(&self.config.agent.media_dir, &options)?;

        let mut report = SyncReport {
            scanned: files.len(),
            ..SyncReport::default()
        };

        for file in &files {
            let key = match self.config.agent.identity.progress_key(file) {
                Ok(key) => key,
                Err(e) => {
                    warn!("Skipping {}: could not derive identity ({})", file.file_name, e);
                    report.failed += 1;
                    continue;
                }
            };

            if store.contains(&key) {
                report.skipped += 1;
                continue;
            }

            info!("Uploading: {}", file.file_name);
            let outcome = client.upload_asset(file).await;

            match &outcome {
                UploadOutcome::Failed { cause } => {
                    warn!("Upload failed for {}: {}", file.file_name, cause);
                    report.failed += 1;
                    continue;
                }
                UploadOutcome::Created { .. } => report.created += 1,
                UploadOutcome::Deduplicated { .. } | UploadOutcome::RejectedDuplicate { .. } => {
                    info!("Duplicate on server: {}", file.file_name);
                    report.deduplicated += 1;
                }
            }

            // Link failures never unsettle the file: re-uploading is far
            // more expensive than a missing album membership. An unknown
            // duplicate id settles without a link at all.
            if let Some(asset_id) = outcome.asset_id() {
                match client.add_to_album(&album_id, asset_id).await {
                    Ok(()) => debug!(
                        "Added {} to album '{}'",
                        file.file_name, self.config.server.album
                    ),
                    Err(e) => {
                        warn!("Failed to add {} to album: {}", file.file_name, e);
                        report.link_failures += 1;
                    }
                }
            }

            store.record(&key)?;
            report.processed += 1;
        }

        Ok(report)
    }
}
