//! Media Sync Agent Library
//!
//! One-way, idempotent synchronization of local images into a remote
//! media server album.

pub mod config;
pub mod executor;
pub mod fs;
pub mod identity;
pub mod progress;
pub mod remote;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::AgentError;
pub type Result<T> = std::result::Result<T, AgentError>;
