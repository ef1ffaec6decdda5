//! File-backed key-value store
//!
//! Directory structure:
//! ```text
//! {data_dir}/
//! ├── unknownWords.json   # Array of flagged item ids
//! └── srsData.json        # Review records keyed by item id
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, Result, StorageError};

/// Stores each key as `{key}.json` under a data directory
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, creating the directory if needed
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Default data directory (e.g. ~/.local/share/kelime)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("kelime"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::write(&path, blob)?;
        log::debug!("Wrote {} bytes to {:?}", blob.len(), path);
        Ok(())
    }
}
