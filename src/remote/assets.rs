//! Asset upload and response classification.
//!
//! The status-code table here is the crux of the idempotency contract:
//! 201 and 200 are success paths, 409 is a rejection that still settles
//! the file, and everything else leaves the file for the next run.

use chrono::SecondsFormat;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use super::RemoteClient;
use crate::fs::scanner::CandidateFile;

/// Classified result of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Truly new asset (HTTP 201)
    Created { asset_id: String },

    /// Server-side identity match, treated as success (HTTP 200)
    Deduplicated { asset_id: String },

    /// Hard conflict; the id is absent when the response body carries
    /// none (HTTP 409)
    RejectedDuplicate { asset_id: Option<String> },

    /// Genuine failure; the file stays unsettled and is retried next run
    Failed { cause: String },
}

impl UploadOutcome {
    /// A settled file is recorded in the progress store and never
    /// uploaded again.
    pub fn is_settled(&self) -> bool {
        !matches!(self, UploadOutcome::Failed { .. })
    }

    /// The remote asset id to link into the album, when one is known.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Created { asset_id } | UploadOutcome::Deduplicated { asset_id } => {
                Some(asset_id)
            }
            UploadOutcome::RejectedDuplicate { asset_id } => asset_id.as_deref(),
            UploadOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    id: String,
}

impl RemoteClient {
    /// Upload one file and classify the server's response.
    ///
    /// Transport errors and unexpected statuses are folded into
    /// `UploadOutcome::Failed`, keeping the orchestrator's settlement
    /// logic single-sourced. The file handle moves into the streaming
    /// request body, so it closes on every exit path.
    pub async fn upload_asset(&self, file: &CandidateFile) -> UploadOutcome {
        let handle = match tokio::fs::File::open(&file.path).await {
            Ok(handle) => handle,
            Err(e) => {
                return UploadOutcome::Failed {
                    cause: format!("open {}: {}", file.path.display(), e),
                }
            }
        };

        let stream = ReaderStream::new(handle);
        let data = Part::stream_with_length(Body::wrap_stream(stream), file.size)
            .file_name(file.file_name.clone());

        let form = Form::new()
            .text("deviceAssetId", file.device_asset_id())
            .text("deviceId", self.device_id.clone())
            .text(
                "fileCreatedAt",
                file.created.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .text(
                "fileModifiedAt",
                file.modified.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .text("isFavorite", "false")
            .part("assetData", data);

        let response = self
            .http
            .post(self.url("/api/assets"))
            .header("x-api-key", &self.api_key)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                return UploadOutcome::Failed {
                    cause: format!("transport error: {}", e),
                }
            }
        };

        match resp.status() {
            StatusCode::CREATED => match resp.json::<AssetResponse>().await {
                Ok(body) => UploadOutcome::Created { asset_id: body.id },
                Err(e) => UploadOutcome::Failed {
                    cause: format!("unreadable create response: {}", e),
                },
            },
            StatusCode::OK => match resp.json::<AssetResponse>().await {
                Ok(body) => UploadOutcome::Deduplicated { asset_id: body.id },
                Err(e) => UploadOutcome::Failed {
                    cause: format!("unreadable duplicate response: {}", e),
                },
            },
            StatusCode::CONFLICT => {
                let asset_id = resp.json::<AssetResponse>().await.ok().map(|body| body.id);
                UploadOutcome::RejectedDuplicate { asset_id }
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                UploadOutcome::Failed {
                    cause: format!("status {}: {}", status, body),
                }
            }
        }
    }
}
