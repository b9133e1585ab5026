//! Durable record of already-synchronized files.
//!
//! A human-readable JSON array of progress keys, read fully on start and
//! rewritten after every settled file. The rewrite goes through a sibling
//! temp file followed by a rename, so a crash mid-write never corrupts
//! previously recorded entries. Entries are only ever added; the store
//! never shrinks on its own.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::utils::errors::Result;

#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    entries: BTreeSet<String>,
}

impl ProgressStore {
    /// Load the store from disk.
    ///
    /// A missing, unreadable, or corrupt file is an empty store and a
    /// warning, never a fatal condition.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<BTreeSet<String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        "Progress store {} is corrupt ({}); starting from an empty store",
                        path.display(),
                        e
                    );
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                warn!(
                    "Could not read progress store {} ({}); starting from an empty store",
                    path.display(),
                    e
                );
                BTreeSet::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a settled file and persist immediately, bounding data loss
    /// on crash to the in-flight file.
    pub fn record(&mut self, key: &str) -> Result<()> {
        if self.entries.insert(key.to_string()) {
            self.persist()?;
        }
        Ok(())
    }

    /// Full rewrite through a sibling temp file, then an atomic rename.
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
