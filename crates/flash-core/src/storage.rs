//! Key-value storage for the persisted group mapping
//!
//! One entry per key. The file backend keeps each entry in `<key>.json`
//! inside a data directory; no database, no daemon.

use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Storage key used by the current data layout
pub const DEFAULT_STORAGE_KEY: &str = "flashcard_groups_v6_data";

/// Minimal string key-value store
pub trait Storage {
    /// Read the raw value under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Storage backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Default data directory (e.g. ~/.local/share/flash)
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("flash"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Temp file + rename: readers never see a partial blob
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "saved");
        Ok(())
    }
}

/// In-process storage, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.get("other").unwrap(), None);
    }

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), None);
        storage.set(DEFAULT_STORAGE_KEY, "{}").unwrap();
        assert!(storage.path_for(DEFAULT_STORAGE_KEY).exists());
        assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some("{}"));

        storage.set(DEFAULT_STORAGE_KEY, r#"{"1":{}}"#).unwrap();
        assert_eq!(
            storage.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"1":{}}"#)
        );
        assert!(!storage.path_for(DEFAULT_STORAGE_KEY).with_extension("json.tmp").exists());
    }
}
