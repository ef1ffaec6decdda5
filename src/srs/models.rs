//! Data models for the spaced repetition scheduler

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::clock::Timestamp;

/// Scheduling record for a single vocabulary item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Index into the interval table
    #[serde(default)]
    pub level: usize,
    /// Epoch milliseconds at which the item becomes due again
    #[serde(default)]
    pub next_review_at: Timestamp,
}

impl ReviewRecord {
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_at <= now
    }
}

/// Review records keyed by item id
///
/// Items without a record are treated as `ReviewRecord::default()`, which is
/// level 0 and always due.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewStore {
    records: BTreeMap<ItemId, ReviewRecord>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for an item, falling back to the implicit default
    pub fn get(&self, id: ItemId) -> ReviewRecord {
        self.records.get(&id).copied().unwrap_or_default()
    }

    /// Whether the item has ever been rated
    pub fn contains(&self, id: ItemId) -> bool {
        self.records.contains_key(&id)
    }

    pub(crate) fn upsert(&mut self, id: ItemId, record: ReviewRecord) {
        self.records.insert(id, record);
    }

    /// Pull every level down to `max_level`, returning how many records moved
    pub(crate) fn clamp_levels(&mut self, max_level: usize) -> usize {
        let mut clamped = 0;
        for record in self.records.values_mut() {
            if record.level > max_level {
                record.level = max_level;
                clamped += 1;
            }
        }
        clamped
    }

    /// An item is due when it has no record or its review time has passed
    pub fn is_due(&self, id: ItemId, now: Timestamp) -> bool {
        self.records.get(&id).map_or(true, |r| r.is_due(now))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ReviewRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }
}

/// Item ids the user flagged as difficult
///
/// Serialized as a plain JSON array in the order ids were flagged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct UnknownSet {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl UnknownSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.members.contains(&id)
    }

    /// Returns false if the id was already a member
    pub(crate) fn insert(&mut self, id: ItemId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Returns false if the id was not a member
    pub(crate) fn remove(&mut self, id: ItemId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }
}

impl From<Vec<ItemId>> for UnknownSet {
    fn from(ids: Vec<ItemId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }
}

impl From<UnknownSet> for Vec<ItemId> {
    fn from(set: UnknownSet) -> Self {
        set.order
    }
}

/// Statistics over the catalog at a point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    pub new_items: usize,
    pub due_items: usize,
    pub unknown_items: usize,
    /// Number of rated items at each level of the interval table
    pub levels: Vec<usize>,
}
