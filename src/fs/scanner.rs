//! Candidate enumeration with metadata capture.
//!
//! Scans the media directory for image files and records the filesystem
//! metadata the upload identity is derived from. Candidates are ephemeral:
//! recomputed every run, never cached.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Options for candidate scanning
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Accepted file extensions, matched case-insensitively
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: ["png", "jpg", "jpeg", "webp"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            recursive: false,
        }
    }
}

/// A file eligible for synchronization, captured once per run.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Full path to the file
    pub path: PathBuf,

    /// Base filename (the progress identity under the default strategy)
    pub file_name: String,

    /// File size in bytes
    pub size: u64,

    /// Creation time in UTC. Filesystems without birth-time support fall
    /// back to the modification time.
    pub created: DateTime<Utc>,

    /// Last modification time in UTC
    pub modified: DateTime<Utc>,
}

impl CandidateFile {
    /// Create a CandidateFile from a DirEntry.
    /// Returns None for entries whose filename is not valid UTF-8.
    fn from_entry(entry: &DirEntry) -> std::io::Result<Option<Self>> {
        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping non-UTF-8 filename: {}", entry.path().display());
            return Ok(None);
        };
        let file_name = file_name.to_string();

        let metadata = entry.metadata().map_err(std::io::Error::from)?;
        let modified_at = metadata.modified()?;
        let created_at = metadata.created().unwrap_or(modified_at);

        Ok(Some(Self {
            path: entry.path().to_path_buf(),
            file_name,
            size: metadata.len(),
            created: DateTime::<Utc>::from(created_at),
            modified: DateTime::<Utc>::from(modified_at),
        }))
    }

    /// Deterministic composite key the server uses to recognize repeat
    /// submissions of the same physical file, even after the local
    /// progress store is lost.
    pub fn device_asset_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.file_name,
            self.size,
            self.modified.timestamp()
        )
    }
}

/// Scan the media directory and collect candidates in upload order:
/// ascending modification time, ties broken by enumeration order.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> std::io::Result<Vec<CandidateFile>> {
    let mut walker = WalkDir::new(root).follow_links(false);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;

        if entry.file_type().is_dir() {
            continue;
        }
        if !has_accepted_extension(entry.path(), &options.extensions) {
            continue;
        }
        if let Some(candidate) = CandidateFile::from_entry(&entry)? {
            files.push(candidate);
        }
    }

    // Stable sort: enumeration order survives for equal timestamps
    files.sort_by_key(|f| f.modified);

    Ok(files)
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext))
}
