//! File-per-key state store
//!
//! Layout under the data directory:
//!
//! ```text
//! <root>/<section>_ALL.json      universe snapshot (JSON array)
//! <root>/<section>_MISSING.json  failures from the last run (JSON array)
//! <root>/<section>/<id>.json     one item record per processed identifier
//! ```

use super::{StateStore, StoreError, StoreResult};
use crate::record::ItemRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// State store backed by plain JSON files under one data directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| io_error(&root, source))?;
        Ok(Self { root })
    }

    /// Directory holding the section's item records
    pub fn section_dir(&self, section: &str) -> PathBuf {
        self.root.join(section)
    }

    fn universe_path(&self, section: &str) -> PathBuf {
        self.root.join(format!("{}_ALL.json", section))
    }

    fn failures_path(&self, section: &str) -> PathBuf {
        self.root.join(format!("{}_MISSING.json", section))
    }

    fn record_path(&self, section: &str, id: &str) -> PathBuf {
        self.section_dir(section).join(format!("{}.json", id))
    }
}

impl StateStore for FsStore {
    fn load_universe(&self, section: &str) -> StoreResult<Option<Vec<String>>> {
        let path = self.universe_path(section);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    fn save_universe(&self, section: &str, ids: &[String]) -> StoreResult<()> {
        write_json(&self.universe_path(section), &ids)
    }

    fn done_ids(&self, section: &str) -> StoreResult<HashSet<String>> {
        let dir = self.section_dir(section);
        if !dir.exists() {
            return Ok(HashSet::new());
        }

        let mut done = HashSet::new();
        let entries = fs::read_dir(&dir).map_err(|source| io_error(&dir, source))?;
        for entry in entries {
            let entry = entry.map_err(|source| io_error(&dir, source))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    done.insert(stem.to_string());
                }
            }
        }
        Ok(done)
    }

    fn load_failures(&self, section: &str) -> StoreResult<Vec<String>> {
        let path = self.failures_path(section);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    fn save_failures(&self, section: &str, ids: &[String]) -> StoreResult<()> {
        write_json(&self.failures_path(section), &ids)
    }

    fn save_record(&self, section: &str, id: &str, record: &ItemRecord) -> StoreResult<()> {
        let dir = self.section_dir(section);
        fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        write_json(&self.record_path(section, id), record)
    }

    fn load_record(&self, section: &str, id: &str) -> StoreResult<ItemRecord> {
        read_json(&self.record_path(section, id))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

/// Writes `value` as JSON to a sibling temp file, then renames it into
/// place, so a crash mid-write never leaves a truncated document behind.
/// Non-ASCII content is written as-is.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let body = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        path: path.display().to_string(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| io_error(&tmp, source))?;
    fs::rename(&tmp, path).map_err(|source| io_error(path, source))?;
    Ok(())
}
