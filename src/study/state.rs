//! Review state and its transitions
//!
//! `StudyState` bundles the review records and the unknown-set so that every
//! change to one happens in the same transition as the matching change to the
//! other. Transitions are pure: they take the state by value and hand back
//! the new state plus a description of what changed, leaving persistence to
//! the caller.

use serde::{Deserialize, Serialize};

use crate::catalog::ItemId;
use crate::clock::Timestamp;
use crate::srs::algorithm::{calculate_next_review, IntervalTable};
use crate::srs::{ReviewStore, UnknownSet};

/// Something the user did to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyEvent {
    /// Plain pass/fail rating, no unknown-set side effect
    Rate { id: ItemId, success: bool },
    /// Manual "mark as struggling" toggle
    ToggleUnknown { id: ItemId },
    /// Pass/fail answer in free-study mode
    ///
    /// A miss flags the item if it is not flagged yet; a hit unflags it if it
    /// is. Either way the flag change carries the toggle's rating. When the
    /// membership already matches the answer nothing changes.
    MarkOutcome { id: ItemId, success: bool },
}

impl StudyEvent {
    pub fn id(&self) -> ItemId {
        match self {
            Self::Rate { id, .. } | Self::ToggleUnknown { id } | Self::MarkOutcome { id, .. } => {
                *id
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipChange {
    Added,
    Removed,
}

/// What a transition touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    /// A review record was written
    pub rated: bool,
    pub membership: Option<MembershipChange>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        !self.rated && self.membership.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyState {
    reviews: ReviewStore,
    unknown: UnknownSet,
}

impl StudyState {
    pub fn new(reviews: ReviewStore, unknown: UnknownSet) -> Self {
        Self { reviews, unknown }
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    pub fn unknown(&self) -> &UnknownSet {
        &self.unknown
    }

    /// Apply an event at `now`
    pub fn apply(
        mut self,
        event: StudyEvent,
        now: Timestamp,
        table: &IntervalTable,
    ) -> (Self, Changes) {
        let changes = match event {
            StudyEvent::Rate { id, success } => {
                self.rate(id, success, now, table);
                Changes {
                    rated: true,
                    membership: None,
                }
            }
            StudyEvent::ToggleUnknown { id } => {
                let was_member = self.unknown.contains(id);
                self.set_membership(id, was_member, now, table)
            }
            StudyEvent::MarkOutcome { id, success } => {
                let was_member = self.unknown.contains(id);
                // Only act when the answer disagrees with the current flag
                if success == was_member {
                    self.set_membership(id, was_member, now, table)
                } else {
                    Changes::default()
                }
            }
        };
        (self, changes)
    }

    fn rate(&mut self, id: ItemId, success: bool, now: Timestamp, table: &IntervalTable) {
        let record = calculate_next_review(&self.reviews.get(id), success, now, table);
        self.reviews.upsert(id, record);
    }

    /// Flip membership based on a snapshot taken before any mutation
    fn set_membership(
        &mut self,
        id: ItemId,
        was_member: bool,
        now: Timestamp,
        table: &IntervalTable,
    ) -> Changes {
        let membership = if was_member {
            self.unknown.remove(id);
            self.rate(id, true, now, table);
            MembershipChange::Removed
        } else {
            self.unknown.insert(id);
            self.rate(id, false, now, table);
            MembershipChange::Added
        };

        Changes {
            rated: true,
            membership: Some(membership),
        }
    }
}
