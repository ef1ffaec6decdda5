//! Vocabulary catalog
//!
//! The catalog is the ordered, read-only list of items a study session draws
//! from. It is loaded once at startup and never mutated afterwards.

mod loader;
mod models;

pub use loader::{load_catalog, parse_catalog, CatalogError};
pub use models::*;
