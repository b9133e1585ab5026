//! Progress identity strategies.
//!
//! The progress store tracks files by a string key. The faithful default
//! keys on the base filename alone: two files with the same name are the
//! same entity, regardless of path or content. The content-hash strategy
//! trades that speed for precision.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

use crate::fs::scanner::CandidateFile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityStrategy {
    /// Base filename only
    #[default]
    Filename,
    /// SHA-256 of file contents
    ContentHash,
}

impl IdentityStrategy {
    /// Derive the progress-store key for a candidate.
    pub fn progress_key(&self, file: &CandidateFile) -> std::io::Result<String> {
        match self {
            IdentityStrategy::Filename => Ok(file.file_name.clone()),
            IdentityStrategy::ContentHash => content_hash(&file.path),
        }
    }
}

impl FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filename" => Ok(IdentityStrategy::Filename),
            "content-hash" => Ok(IdentityStrategy::ContentHash),
            other => Err(format!(
                "unknown identity strategy '{}' (expected 'filename' or 'content-hash')",
                other
            )),
        }
    }
}

/// Hex-encoded SHA-256 of the file contents.
///
/// Note: this reads the entire file into memory; candidates are images,
/// not archives, so the buffers stay small.
fn content_hash(path: &Path) -> std::io::Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(format!("{:x}", hasher.finalize()))
}
