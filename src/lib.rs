//! Spaced-repetition core for vocabulary drilling
//!
//! The crate decides which vocabulary items to show, in what order, and how
//! an answer changes an item's review level and the set of items the user
//! flagged as difficult.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod persistence;
pub mod srs;
pub mod study;

pub use catalog::{Catalog, ItemId, VocabularyItem};
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::Config;
pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore, PersistStatus};
pub use srs::{IntervalTable, ReviewRecord, ReviewStats, ReviewStore, UnknownSet};
pub use study::{
    Advance, Answer, Outcome, PendingAdvance, Scope, Selection, Session, SessionMode,
    SessionStatus, StudyController,
};
