//! Agora-Harvest: a polite petition debate harvester
//!
//! This crate harvests petitions, their pro/con arguments with
//! counter-argument replies, and comments from a paginated petition site,
//! persisting one JSON document per petition. Runs are incremental and
//! resumable: the identifier universe is discovered once per section,
//! finished work is recognized from the files already on disk, and failed
//! identifiers are retried on the next run.

pub mod config;
pub mod crawl;
pub mod export;
pub mod record;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {path}: {source}")]
    Http { path: String, source: reqwest::Error },

    #[error("Fetch failed for {path}: HTTP {status}")]
    Fetch { path: String, status: u16 },

    #[error("Page structure error: {0}")]
    Structure(#[from] crawl::ExtractError),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{Argument, Debate, ItemRecord, Reply};
pub use storage::{FsStore, StateStore};
