//! Spaced repetition scheduling for vocabulary items
//!
//! This module provides:
//! - Leveled interval algorithm (reset-to-level-1 on failure)
//! - Review records and the unknown-set
//! - Due-item and statistics queries over the catalog

pub mod algorithm;
pub mod models;
pub mod queries;

pub use algorithm::{IntervalError, IntervalTable};
pub use models::*;
pub use queries::{due_items, review_stats};
