//! Key-value persistence for review state
//!
//! The scheduler stores two independent blobs:
//! - `unknownWords`: JSON array of flagged item ids
//! - `srsData`: JSON object mapping item id to `{level, nextReviewAt}`
//!
//! Every change rewrites the whole blob. Storage is best effort: failures are
//! reported to the caller but never roll back in-memory state.

mod file_store;
mod memory_store;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Key of the unknown-set blob
pub const UNKNOWN_KEY: &str = "unknownWords";

/// Key of the review-state blob
pub const REVIEWS_KEY: &str = "srsData";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable key-value storage with last-write-wins semantics
pub trait KeyValueStore {
    /// Read the blob stored under `key`, `None` if nothing was saved yet
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn save(&self, key: &str, blob: &str) -> Result<()>;
}

/// Whether the last storage round-trip succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStatus {
    Saved,
    /// Storage failed; the change lives in memory only
    Unavailable,
}

impl PersistStatus {
    pub fn is_saved(self) -> bool {
        self == Self::Saved
    }

    /// Combine the outcome of two saves in one transaction
    pub fn and(self, other: Self) -> Self {
        if self.is_saved() && other.is_saved() {
            Self::Saved
        } else {
            Self::Unavailable
        }
    }
}

/// Load and decode a blob, falling back to the default on any failure
///
/// The returned status is `Unavailable` when the store failed or the blob
/// could not be decoded; a missing key is not a failure.
pub fn load_or_default<T, S>(store: &S, key: &str) -> (T, PersistStatus)
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return (T::default(), PersistStatus::Saved),
        Err(e) => {
            log::warn!("Failed to load '{}', starting empty: {}", key, e);
            return (T::default(), PersistStatus::Unavailable);
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => (value, PersistStatus::Saved),
        Err(e) => {
            log::warn!("Discarding unreadable '{}' blob: {}", key, e);
            (T::default(), PersistStatus::Unavailable)
        }
    }
}

/// Encode and save a value, logging instead of failing
pub fn save_value<T, S>(store: &S, key: &str, value: &T) -> PersistStatus
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string_pretty(value)
        .map_err(StorageError::from)
        .and_then(|blob| store.save(key, &blob));

    match result {
        Ok(()) => PersistStatus::Saved,
        Err(e) => {
            log::warn!("Failed to save '{}', keeping change in memory: {}", key, e);
            PersistStatus::Unavailable
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::BrokenStore;
    use super::*;
    use crate::srs::{ReviewStore, UnknownSet};

    #[test]
    fn test_missing_key_is_default_and_available() {
        let store = MemoryStore::new();
        let (set, status): (UnknownSet, _) = load_or_default(&store, UNKNOWN_KEY);
        assert!(set.is_empty());
        assert_eq!(status, PersistStatus::Saved);
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_default() {
        let store = MemoryStore::new();
        store.save(REVIEWS_KEY, "{not json").unwrap();

        let (reviews, status): (ReviewStore, _) = load_or_default(&store, REVIEWS_KEY);
        assert!(reviews.is_empty());
        assert_eq!(status, PersistStatus::Unavailable);
    }

    #[test]
    fn test_broken_store_degrades() {
        let (set, status): (UnknownSet, _) = load_or_default(&BrokenStore, UNKNOWN_KEY);
        assert!(set.is_empty());
        assert_eq!(status, PersistStatus::Unavailable);

        let status = save_value(&BrokenStore, UNKNOWN_KEY, &set);
        assert_eq!(status, PersistStatus::Unavailable);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let set = UnknownSet::from(vec![4, 2]);
        assert!(save_value(&store, UNKNOWN_KEY, &set).is_saved());

        let (loaded, status): (UnknownSet, _) = load_or_default(&store, UNKNOWN_KEY);
        assert_eq!(loaded, set);
        assert!(status.is_saved());
    }

    #[test]
    fn test_status_and() {
        use PersistStatus::{Saved, Unavailable};
        assert_eq!(Saved.and(Saved), Saved);
        assert_eq!(Saved.and(Unavailable), Unavailable);
        assert_eq!(Unavailable.and(Saved), Unavailable);
    }
}
