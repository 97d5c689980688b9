//! Work-state persistence
//!
//! The files on disk are the source of truth for crawl progress. Per
//! section there is one directory holding one JSON document per processed
//! item, plus a universe snapshot and a failure list at fixed paths derived
//! from the section name. "Done" is never tracked in memory across runs;
//! it is recomputed from the directory contents every time.

mod fs;

pub use fs::FsStore;

use crate::record::ItemRecord;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during work-state persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed state file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for work-state operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable work-state operations for the harvester.
///
/// Implementations must write records atomically: a reader never observes a
/// partially written document, and a crash mid-write leaves the previous
/// state intact.
pub trait StateStore {
    /// Returns the cached universe snapshot for a section, if one exists.
    ///
    /// The snapshot is returned verbatim; it is never revalidated against
    /// the live site.
    fn load_universe(&self, section: &str) -> StoreResult<Option<Vec<String>>>;

    /// Persists the universe snapshot for a section. Called once, right
    /// after discovery.
    fn save_universe(&self, section: &str, ids: &[String]) -> StoreResult<()>;

    /// Derives the successfully materialized identifiers from storage
    /// contents.
    fn done_ids(&self, section: &str) -> StoreResult<HashSet<String>>;

    /// Loads the failure list persisted by the previous run, or an empty
    /// list if none exists.
    fn load_failures(&self, section: &str) -> StoreResult<Vec<String>>;

    /// Overwrites the section's failure list with exactly the identifiers
    /// that failed in the current run.
    fn save_failures(&self, section: &str, ids: &[String]) -> StoreResult<()>;

    /// Atomically persists one item record keyed by its identifier.
    fn save_record(&self, section: &str, id: &str, record: &ItemRecord) -> StoreResult<()>;

    /// Reads one previously persisted item record back.
    fn load_record(&self, section: &str, id: &str) -> StoreResult<ItemRecord>;
}
