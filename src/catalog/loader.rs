//! Loading the catalog from a JSON file
//!
//! The file is an array of `{ "id": 1, "front": "...", "back": "..." }`
//! objects. The `en`/`tr` field names used by older word lists are accepted
//! as aliases.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::{Catalog, ItemId, VocabularyItem};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(items: Vec<VocabularyItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
        }
        Ok(Self::from_unique(items))
    }
}

/// Parse a catalog from JSON text
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let items: Vec<VocabularyItem> = serde_json::from_str(content)?;
    Catalog::new(items)
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&content)?;
    log::info!("Loaded {} vocabulary items from {:?}", catalog.len(), path);
    Ok(catalog)
}
