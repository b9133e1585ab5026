//! HTTP client for the remote media server.
//!
//! The server is an external collaborator, consumed strictly through its
//! documented contract: health ping, album listing, album membership, and
//! asset upload. Its storage and dedup logic live on the other side of
//! the wire.

pub mod albums;
pub mod assets;
pub mod endpoint;

use std::time::Duration;

use crate::config::Config;
use crate::utils::errors::Result;

pub use albums::Album;
pub use assets::UploadOutcome;

/// Client bound to the one endpoint selected for this run.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    device_id: String,
    api_timeout: Duration,
    upload_timeout: Duration,
}

impl RemoteClient {
    pub fn new(base_url: String, config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.server.api_key.clone(),
            device_id: config.agent.device_id.clone(),
            api_timeout: config.http.api_timeout(),
            upload_timeout: config.http.upload_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
