//! Cache and report files under a single data directory.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use geowatch_core::{id_sort_key, EarthquakeCache, VolcanoRecord};

use crate::error::StoreError;

const EARTHQUAKE_FILE: &str = "earthquake.json";
const VOLCANO_FILE: &str = "volcano.json";
const REPORT_DIR: &str = "reports";
const LATEST_REPORT: &str = "latest.md";

/// File-backed persistence rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads the earthquake cache. `Ok(None)` when no cache file exists yet
    /// (first run).
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on read failure, [`StoreError::Json`] when the file
    /// exists but does not deserialize.
    pub fn load_earthquakes(&self) -> Result<Option<EarthquakeCache>, StoreError> {
        self.load_json(EARTHQUAKE_FILE)
    }

    /// Writes the earthquake cache, sorting its records newest-first in
    /// place so the on-disk order is stable across runs.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on write failure.
    pub fn save_earthquakes(&self, cache: &mut EarthquakeCache) -> Result<(), StoreError> {
        sort_earthquakes(cache);
        self.save_json(EARTHQUAKE_FILE, cache)
    }

    /// Loads the volcano cache. `Ok(None)` when no cache file exists yet.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on read failure, [`StoreError::Json`] when the file
    /// exists but does not deserialize.
    pub fn load_volcanoes(&self) -> Result<Option<Vec<VolcanoRecord>>, StoreError> {
        self.load_json(VOLCANO_FILE)
    }

    /// Writes the volcano cache, sorting records by id in place first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on write failure.
    pub fn save_volcanoes(&self, records: &mut Vec<VolcanoRecord>) -> Result<(), StoreError> {
        sort_volcanoes(records);
        self.save_json(VOLCANO_FILE, records)
    }

    /// Writes a run report under `reports/<file_stem>.md` and refreshes
    /// `reports/latest.md` with the same content.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on write failure.
    pub fn save_report(&self, file_stem: &str, markdown: &str) -> Result<(), StoreError> {
        let dir = self.dir.join(REPORT_DIR);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        write_atomic(&dir.join(format!("{file_stem}.md")), markdown.as_bytes())?;
        write_atomic(&dir.join(LATEST_REPORT), markdown.as_bytes())
    }

    fn load_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let value = serde_json::from_str(&raw).map_err(|e| StoreError::json(&path, e))?;
        Ok(Some(value))
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let path = self.dir.join(file);
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::json(&path, e))?;
        write_atomic(&path, &json)?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "cache written");
        Ok(())
    }
}

/// Temp file in the destination directory, then rename. Keeps the write
/// atomic on the same filesystem.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

/// Newest first, by the numeric suffix embedded in the source id.
pub fn sort_earthquakes(cache: &mut EarthquakeCache) {
    cache
        .data
        .sort_by(|a, b| id_sort_key(&b.id).cmp(&id_sort_key(&a.id)));
}

/// Ascending by numeric id, id-less records first.
pub fn sort_volcanoes(records: &mut [VolcanoRecord]) {
    records.sort_by_key(|v| (v.id.is_some(), v.id.unwrap_or(0)));
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
