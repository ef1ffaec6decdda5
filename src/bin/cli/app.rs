use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use kelime_lib::catalog::{load_catalog, ItemId, VocabularyItem};
use kelime_lib::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use kelime_lib::study::{Scope, StudyController};
use kelime_lib::{Config, SystemClock};

/// Values given on the command line that win over the config file
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

/// Shared application state for CLI commands
pub struct App {
    pub controller: StudyController,
}

impl App {
    /// Load config, catalog and stored review state
    pub fn new(overrides: Overrides) -> Result<Self> {
        let config_path = match overrides.config {
            Some(path) => path,
            None => Config::default_path().context("Failed to locate config directory")?,
        };
        let mut config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        if overrides.data_dir.is_some() {
            config.data_dir = overrides.data_dir;
        }
        if overrides.catalog.is_some() {
            config.catalog = overrides.catalog;
        }

        let catalog_path = config.catalog_path().context("Failed to resolve catalog path")?;
        let catalog = load_catalog(&catalog_path).context("Failed to load catalog")?;

        let controller = StudyController::open(
            catalog,
            open_store(&config),
            Box::new(SystemClock),
            config.interval_table().context("Invalid interval table")?,
        )
        .with_chunk_size(config.chunk_size)
        .with_advance_delay(config.advance_delay());

        if !controller.load_status().is_saved() {
            eprintln!("Warning: stored progress could not be read; starting from scratch.");
        }

        Ok(Self { controller })
    }

    /// Look up an item, failing with a readable message for unknown ids
    pub fn find_item(&self, id: ItemId) -> Result<&VocabularyItem> {
        match self.controller.catalog().get(id) {
            Some(item) => Ok(item),
            None => bail!("No item with id {} in the catalog", id),
        }
    }
}

/// File store in the data directory, or memory if that cannot be set up
fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    let store = config
        .data_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| JsonFileStore::new(dir).map_err(anyhow::Error::from));

    match store {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Falling back to in-memory storage: {:#}", e);
            eprintln!("Warning: progress will not be saved ({:#}).", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// Translate `--chunk N` (1-based) / `--all` into a scope
pub fn resolve_scope(chunk: Option<usize>, all: bool) -> Result<Scope> {
    match (chunk, all) {
        (_, true) => Ok(Scope::All),
        (Some(0), _) => bail!("Chunk numbers start at 1"),
        (Some(n), _) => Ok(Scope::Chunk(n - 1)),
        (None, false) => Ok(Scope::Chunk(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scope() {
        assert_eq!(resolve_scope(None, false).unwrap(), Scope::Chunk(0));
        assert_eq!(resolve_scope(Some(3), false).unwrap(), Scope::Chunk(2));
        assert_eq!(resolve_scope(None, true).unwrap(), Scope::All);
        assert!(resolve_scope(Some(0), false).is_err());
    }
}
