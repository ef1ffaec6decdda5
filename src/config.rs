//! Configuration file
//!
//! `config.toml` lives in the user config directory (e.g.
//! `~/.config/kelime/config.toml`). Every field is optional:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/kelime"
//! catalog = "/home/me/words.json"
//! chunk_size = 20
//! advance_delay_ms = 200
//! intervals = ["0", "4h", "8h", "24h", "3d", "7d", "14d", "30d"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DEFAULT_CHUNK_SIZE;
use crate::persistence::{JsonFileStore, StorageError};
use crate::srs::{IntervalError, IntervalTable};
use crate::study::DEFAULT_ADVANCE_DELAY;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid intervals: {0}")]
    Intervals(#[from] IntervalError),

    #[error("chunk_size must be at least 1")]
    ChunkSize,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_advance_delay_ms() -> u64 {
    DEFAULT_ADVANCE_DELAY.as_millis() as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    /// Human-readable delays, one per level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog: None,
            chunk_size: default_chunk_size(),
            advance_delay_ms: default_advance_delay_ms(),
            intervals: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("kelime").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        self.interval_table()?;
        Ok(())
    }

    /// Data directory, falling back to the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(JsonFileStore::default_data_dir()?),
        }
    }

    /// Catalog path, falling back to `catalog.json` in the data directory
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("catalog.json")),
        }
    }

    pub fn interval_table(&self) -> Result<IntervalTable> {
        match &self.intervals {
            Some(entries) => Ok(IntervalTable::parse(entries)?),
            None => Ok(IntervalTable::reference()),
        }
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}
