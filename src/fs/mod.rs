//! Filesystem enumeration for the media directory.

pub mod scanner;

pub use scanner::{scan_directory, CandidateFile, ScanOptions};
