//! Study session queues
//!
//! A session is an ordered list of item ids plus a pointer. Free-study
//! sessions are derived from a scope (one chunk or the whole catalog) and an
//! optional unknown-only filter, shuffled when the selection is made, and
//! loop forever. Unknown-only queues follow the unknown-set as it changes.
//! Due-review sessions take the due items in catalog order and end once every
//! item has been answered.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemId};
use crate::clock::Timestamp;
use crate::srs::{due_items, ReviewStore, UnknownSet};

/// Which part of the catalog a free-study pass draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    /// Zero-based chunk index
    Chunk(usize),
    All,
}

impl Default for Scope {
    fn default() -> Self {
        Self::Chunk(0)
    }
}

/// Scope and filter of a free-study pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub scope: Scope,
    pub unknown_only: bool,
}

impl Selection {
    pub fn new(scope: Scope, unknown_only: bool) -> Self {
        Self {
            scope,
            unknown_only,
        }
    }

    /// Scope slice first, then the unknown filter
    pub fn derive(&self, catalog: &Catalog, unknown: &UnknownSet, chunk_size: usize) -> Vec<ItemId> {
        let scoped = match self.scope {
            Scope::All => catalog.items(),
            Scope::Chunk(index) => catalog.chunk(index, chunk_size),
        };

        scoped
            .iter()
            .filter(|item| !self.unknown_only || unknown.contains(item.id))
            .map(|item| item.id)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Circular pass over a selection
    FreeStudy,
    /// Single linear pass over due items
    DueReview,
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionStatus {
    /// Nothing matched the free-study selection
    Empty,
    /// Showing item `position` (1-based) of `total`
    Active { position: usize, total: usize },
    /// Every due item was answered, or nothing was due to begin with
    Complete,
}

/// Result of moving the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Pointer moved to this index
    Next(usize),
    /// Free study went past the end and is back at index 0
    Wrapped,
    /// Due review went past its last item
    Complete,
    /// Free study has nothing to advance over
    Empty,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: SessionMode,
    selection: Option<Selection>,
    queue: Vec<ItemId>,
    pointer: usize,
}

impl Session {
    /// Build a free-study session for a freshly made selection
    pub fn free_study<R: Rng + ?Sized>(
        catalog: &Catalog,
        unknown: &UnknownSet,
        selection: Selection,
        chunk_size: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> Self {
        let mut session = Self {
            mode: SessionMode::FreeStudy,
            selection: Some(selection),
            queue: selection.derive(catalog, unknown, chunk_size),
            pointer: 0,
        };
        if shuffle {
            session.queue.shuffle(rng);
        }
        log::debug!(
            "Free study {:?}: {} items (shuffled: {})",
            selection,
            session.queue.len(),
            shuffle
        );
        session
    }

    /// Build a due-review session from the items due at `now`
    pub fn due_review(catalog: &Catalog, reviews: &ReviewStore, now: Timestamp) -> Self {
        let queue: Vec<ItemId> = due_items(catalog, reviews, now)
            .into_iter()
            .map(|item| item.id)
            .collect();
        log::debug!("Due review at {}: {} items", now, queue.len());
        Self {
            mode: SessionMode::DueReview,
            selection: None,
            queue,
            pointer: 0,
        }
    }

    /// Switch a free-study session to another selection
    ///
    /// The queue is re-derived and shuffled once. Selecting the pair that is
    /// already active leaves order and pointer untouched. Returns whether
    /// anything changed.
    pub fn reselect<R: Rng + ?Sized>(
        &mut self,
        catalog: &Catalog,
        unknown: &UnknownSet,
        selection: Selection,
        chunk_size: usize,
        rng: &mut R,
    ) -> bool {
        if self.mode != SessionMode::FreeStudy || self.selection == Some(selection) {
            return false;
        }
        *self = Self::free_study(catalog, unknown, selection, chunk_size, true, rng);
        true
    }

    /// Reshuffle a free-study queue and restart from the first item
    ///
    /// Due review keeps catalog order, so this is a no-op there.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.mode != SessionMode::FreeStudy {
            return false;
        }
        self.queue.shuffle(rng);
        self.pointer = 0;
        true
    }

    /// Re-apply the unknown-only filter after the unknown-set changed
    ///
    /// Items that left the set drop out and newly flagged items in scope are
    /// appended in catalog order; the surviving order is kept. When the item
    /// under the pointer drops out, the pointer moves to the item that
    /// followed it and that move is returned.
    pub fn refilter(
        &mut self,
        catalog: &Catalog,
        unknown: &UnknownSet,
        chunk_size: usize,
    ) -> Option<Advance> {
        let selection = match self.selection {
            Some(selection) if self.mode == SessionMode::FreeStudy && selection.unknown_only => {
                selection
            }
            _ => return None,
        };

        let derived = selection.derive(catalog, unknown, chunk_size);
        let keep: HashSet<ItemId> = derived.iter().copied().collect();
        let current = self.current();
        let dropped_current = current.is_some_and(|id| !keep.contains(&id));

        let (successor, wrapped) = if dropped_current {
            match self.queue[self.pointer + 1..].iter().find(|id| keep.contains(*id)) {
                Some(id) => (Some(*id), false),
                None => (
                    self.queue[..self.pointer]
                        .iter()
                        .find(|id| keep.contains(*id))
                        .copied(),
                    true,
                ),
            }
        } else {
            (None, false)
        };

        self.queue.retain(|id| keep.contains(id));
        let present: HashSet<ItemId> = self.queue.iter().copied().collect();
        self.queue
            .extend(derived.into_iter().filter(|id| !present.contains(id)));

        let target = if dropped_current {
            successor.or_else(|| self.queue.first().copied())
        } else {
            current
        };
        self.pointer = target
            .and_then(|id| self.queue.iter().position(|queued| *queued == id))
            .unwrap_or(0);

        log::debug!(
            "Refiltered {:?}: {} items, pointer {}",
            selection,
            self.queue.len(),
            self.pointer
        );

        if !dropped_current {
            return None;
        }
        Some(if self.queue.is_empty() {
            Advance::Empty
        } else if wrapped {
            Advance::Wrapped
        } else {
            Advance::Next(self.pointer)
        })
    }

    /// Move to the next item
    pub fn advance(&mut self) -> Advance {
        match self.mode {
            SessionMode::FreeStudy => {
                if self.queue.is_empty() {
                    return Advance::Empty;
                }
                self.pointer = (self.pointer + 1) % self.queue.len();
                if self.pointer == 0 {
                    Advance::Wrapped
                } else {
                    Advance::Next(self.pointer)
                }
            }
            SessionMode::DueReview => {
                if self.pointer < self.queue.len() {
                    self.pointer += 1;
                }
                if self.pointer >= self.queue.len() {
                    Advance::Complete
                } else {
                    Advance::Next(self.pointer)
                }
            }
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.queue.is_empty() && self.mode == SessionMode::FreeStudy {
            SessionStatus::Empty
        } else if self.pointer >= self.queue.len() {
            SessionStatus::Complete
        } else {
            SessionStatus::Active {
                position: self.pointer + 1,
                total: self.queue.len(),
            }
        }
    }

    /// Item under the pointer, if the session is active
    pub fn current(&self) -> Option<ItemId> {
        self.queue.get(self.pointer).copied()
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn queue(&self) -> &[ItemId] {
        &self.queue
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
