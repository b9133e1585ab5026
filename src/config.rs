//! Configuration management for the sync agent.
//!
//! Loads configuration from a TOML file, then applies environment variable
//! overrides (a `.env` file is honored when present). Validation is fatal
//! before any network contact.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::identity::IdentityStrategy;
use crate::utils::errors::{AgentError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Logical device name sent with every upload
    pub device_id: String,

    /// Directory scanned for new media
    pub media_dir: PathBuf,

    /// Durable record of already-synchronized files
    pub progress_file: PathBuf,

    /// Accepted image extensions, matched case-insensitively
    pub extensions: Vec<String>,

    /// Descend into subdirectories (default: flat listing)
    pub recursive: bool,

    /// Progress identity strategy
    pub identity: IdentityStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Preferred base URL, health-checked at startup
    pub primary_url: Option<String>,

    /// Base URL used when the primary probe fails; trusted without a probe
    pub fallback_url: Option<String>,

    /// API credential, sent as `x-api-key`
    pub api_key: String,

    /// Album the uploads are linked into; must already exist on the server
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Health probe timeout in seconds
    pub probe_timeout_secs: u64,

    /// Timeout for metadata calls (album listing, membership) in seconds
    pub api_timeout_secs: u64,

    /// Timeout for a single asset upload in seconds
    pub upload_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

fn default_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "webp"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            device_id: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "media-sync-agent-01".to_string()),
            media_dir: PathBuf::new(),
            progress_file: PathBuf::from("upload-history.json"),
            extensions: default_extensions(),
            recursive: false,
            identity: IdentityStrategy::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            probe_timeout_secs: 2,
            api_timeout_secs: 10,
            upload_timeout_secs: 60,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AgentError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Apply environment variable overrides on top of the file values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(value) = env_var("MEDIA_SYNC_DEVICE_ID") {
            self.agent.device_id = value;
        }
        if let Some(value) = env_var("MEDIA_SYNC_MEDIA_DIR") {
            self.agent.media_dir = PathBuf::from(value);
        }
        if let Some(value) = env_var("MEDIA_SYNC_PROGRESS_FILE") {
            self.agent.progress_file = PathBuf::from(value);
        }
        if let Some(value) = env_var("MEDIA_SYNC_IDENTITY") {
            self.agent.identity = value
                .parse()
                .map_err(|e: String| AgentError::Config(format!("MEDIA_SYNC_IDENTITY: {}", e)))?;
        }
        if let Some(value) = env_var("MEDIA_SYNC_PRIMARY_URL") {
            self.server.primary_url = Some(value);
        }
        if let Some(value) = env_var("MEDIA_SYNC_FALLBACK_URL") {
            self.server.fallback_url = Some(value);
        }
        if let Some(value) = env_var("MEDIA_SYNC_API_KEY") {
            self.server.api_key = value;
        }
        if let Some(value) = env_var("MEDIA_SYNC_ALBUM") {
            self.server.album = value;
        }
        if let Some(value) = env_var("MEDIA_SYNC_LOG_LEVEL") {
            self.log.level = value;
        }
        Ok(())
    }

    /// Check that every required setting is present and usable.
    /// Called before any network contact; a failure here is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.agent.media_dir.as_os_str().is_empty() {
            return Err(AgentError::Config(
                "media_dir is not set (config [agent].media_dir, MEDIA_SYNC_MEDIA_DIR, or --media-dir)"
                    .to_string(),
            ));
        }
        if !self.agent.media_dir.is_dir() {
            return Err(AgentError::Config(format!(
                "media directory not found: {}",
                self.agent.media_dir.display()
            )));
        }
        if self.server.api_key.is_empty() {
            return Err(AgentError::Config(
                "api_key is not set (config [server].api_key or MEDIA_SYNC_API_KEY)".to_string(),
            ));
        }
        if self.server.album.is_empty() {
            return Err(AgentError::Config(
                "album is not set (config [server].album or MEDIA_SYNC_ALBUM)".to_string(),
            ));
        }
        if self.server.primary_url.is_none() && self.server.fallback_url.is_none() {
            return Err(AgentError::Config(
                "no server URL configured: set primary_url and/or fallback_url".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
