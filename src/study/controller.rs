//! The single owner of review state
//!
//! `StudyController` holds the catalog, the review records and the
//! unknown-set. Every mutation goes through one of three entry points
//! (`rate`, `toggle_unknown`, `mark_outcome`); each runs a pure transition and
//! then rewrites the blobs it touched.

use std::mem;
use std::time::Duration;

use rand::Rng;

use super::session::{Advance, Selection, Session, SessionMode};
use super::state::{Changes, StudyEvent, StudyState};
use crate::catalog::{Catalog, ItemId, VocabularyItem, DEFAULT_CHUNK_SIZE};
use crate::clock::{Clock, Timestamp};
use crate::persistence::{
    load_or_default, save_value, KeyValueStore, PersistStatus, REVIEWS_KEY, UNKNOWN_KEY,
};
use crate::srs::{due_items, review_stats, IntervalTable, ReviewStats, ReviewStore, UnknownSet};

/// Delay before a free-study answer moves to the next card
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(200);

/// Result of a mutating command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub changes: Changes,
    /// `Unavailable` when a touched blob could not be written
    pub persist: PersistStatus,
}

/// How the pointer moves after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAdvance {
    /// Call `Session::advance` once the delay has passed
    After(Duration),
    /// The pointer already moved
    Done(Advance),
}

/// Result of answering the current card of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub id: ItemId,
    pub outcome: Outcome,
    pub advance: PendingAdvance,
}

pub struct StudyController {
    catalog: Catalog,
    state: StudyState,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    intervals: IntervalTable,
    chunk_size: usize,
    advance_delay: Duration,
    loaded: PersistStatus,
}

impl StudyController {
    /// Load review state from `store`, starting empty if it cannot be read
    pub fn open(
        catalog: Catalog,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        intervals: IntervalTable,
    ) -> Self {
        let (mut reviews, reviews_status): (ReviewStore, _) =
            load_or_default(store.as_ref(), REVIEWS_KEY);
        let (unknown, unknown_status): (UnknownSet, _) =
            load_or_default(store.as_ref(), UNKNOWN_KEY);

        let clamped = reviews.clamp_levels(intervals.max_level());
        if clamped > 0 {
            log::warn!(
                "Clamped {} review records to level {}",
                clamped,
                intervals.max_level()
            );
        }

        log::info!(
            "Loaded {} review records and {} unknown items",
            reviews.len(),
            unknown.len()
        );

        Self {
            catalog,
            state: StudyState::new(reviews, unknown),
            store,
            clock,
            intervals,
            chunk_size: DEFAULT_CHUNK_SIZE,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            loaded: reviews_status.and(unknown_status),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    pub fn intervals(&self) -> &IntervalTable {
        &self.intervals
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Whether the stored state was read without problems at startup
    pub fn load_status(&self) -> PersistStatus {
        self.loaded
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn is_unknown(&self, id: ItemId) -> bool {
        self.state.unknown().contains(id)
    }

    // ==================== Commands ====================

    /// Rate an item without touching the unknown-set
    pub fn rate(&mut self, id: ItemId, success: bool) -> Outcome {
        self.dispatch(StudyEvent::Rate { id, success })
    }

    /// Flag or unflag an item, rating it as a miss or a hit respectively
    pub fn toggle_unknown(&mut self, id: ItemId) -> Outcome {
        self.dispatch(StudyEvent::ToggleUnknown { id })
    }

    /// Free-study pass/fail answer
    pub fn mark_outcome(&mut self, id: ItemId, success: bool) -> Outcome {
        self.dispatch(StudyEvent::MarkOutcome { id, success })
    }

    fn dispatch(&mut self, event: StudyEvent) -> Outcome {
        debug_assert!(
            self.catalog.contains(event.id()),
            "item {} is not in the catalog",
            event.id()
        );

        let now = self.clock.now();
        let (next, changes) = mem::take(&mut self.state).apply(event, now, &self.intervals);
        self.state = next;
        log::debug!("{:?} at {} -> {:?}", event, now, changes);

        Outcome {
            changes,
            persist: self.persist(&changes),
        }
    }

    /// Rewrite every blob the transition touched
    fn persist(&self, changes: &Changes) -> PersistStatus {
        let mut status = PersistStatus::Saved;
        if changes.membership.is_some() {
            status = status.and(save_value(
                self.store.as_ref(),
                UNKNOWN_KEY,
                self.state.unknown(),
            ));
        }
        if changes.rated {
            status = status.and(save_value(
                self.store.as_ref(),
                REVIEWS_KEY,
                self.state.reviews(),
            ));
        }
        status
    }

    // ==================== Queries ====================

    /// Items due right now, in catalog order
    pub fn due_items(&self) -> Vec<&VocabularyItem> {
        due_items(&self.catalog, self.state.reviews(), self.clock.now())
    }

    pub fn stats(&self) -> ReviewStats {
        review_stats(
            &self.catalog,
            self.state.reviews(),
            self.state.unknown(),
            &self.intervals,
            self.clock.now(),
        )
    }

    // ==================== Sessions ====================

    /// Start a free-study pass over a selection
    pub fn build_session<R: Rng + ?Sized>(
        &self,
        selection: Selection,
        shuffle: bool,
        rng: &mut R,
    ) -> Session {
        Session::free_study(
            &self.catalog,
            self.state.unknown(),
            selection,
            self.chunk_size,
            shuffle,
            rng,
        )
    }

    /// Change the selection of a free-study pass
    pub fn reselect<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        selection: Selection,
        rng: &mut R,
    ) -> bool {
        session.reselect(
            &self.catalog,
            self.state.unknown(),
            selection,
            self.chunk_size,
            rng,
        )
    }

    /// Start a due-review pass over what is due right now
    pub fn start_due_review(&self) -> Session {
        Session::due_review(&self.catalog, self.state.reviews(), self.clock.now())
    }

    /// Bring an unknown-only free-study queue back in line with the
    /// unknown-set. Returns the pointer move when the current card dropped out.
    pub fn refresh(&self, session: &mut Session) -> Option<Advance> {
        session.refilter(&self.catalog, self.state.unknown(), self.chunk_size)
    }

    pub fn current_item(&self, session: &Session) -> Option<&VocabularyItem> {
        session.current().and_then(|id| self.catalog.get(id))
    }

    /// Answer the card under the session pointer
    ///
    /// In free study the answer goes through `mark_outcome` and the caller
    /// advances after `advance_delay`, unless the card left an unknown-only
    /// queue, in which case its successor is already current. In due review
    /// the item is rated and the pointer moves immediately. Returns `None` when the session has no
    /// current card.
    pub fn answer(&mut self, session: &mut Session, success: bool) -> Option<Answer> {
        let id = session.current()?;

        let answer = match session.mode() {
            SessionMode::FreeStudy => {
                let outcome = self.mark_outcome(id, success);
                let moved = if outcome.changes.membership.is_some() {
                    self.refresh(session)
                } else {
                    None
                };
                Answer {
                    id,
                    outcome,
                    advance: moved
                        .map_or(PendingAdvance::After(self.advance_delay), PendingAdvance::Done),
                }
            }
            SessionMode::DueReview => {
                let outcome = self.rate(id, success);
                Answer {
                    id,
                    outcome,
                    advance: PendingAdvance::Done(session.advance()),
                }
            }
        };
        Some(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::persistence::testing::BrokenStore;
    use crate::persistence::MemoryStore;
    use crate::srs::ReviewRecord;
    use crate::study::{MembershipChange, Scope, SessionStatus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HOUR: i64 = 3_600_000;
    const T0: i64 = 1_700_000_000_000;

    fn catalog(n: u32) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|i| VocabularyItem::new(i, format!("w{}", i), format!("k{}", i)))
                .collect(),
        )
        .unwrap()
    }

    fn create_test_controller(n: u32) -> (StudyController, MemoryStore, ManualClock) {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        let controller = StudyController::open(
            catalog(n),
            Box::new(store.clone()),
            Box::new(clock.clone()),
            IntervalTable::reference(),
        );
        (controller, store, clock)
    }

    fn stored_reviews(store: &MemoryStore) -> ReviewStore {
        serde_json::from_str(&store.get(REVIEWS_KEY).unwrap()).unwrap()
    }

    fn stored_unknown(store: &MemoryStore) -> UnknownSet {
        serde_json::from_str(&store.get(UNKNOWN_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_rate_persists_full_review_blob() {
        let (mut controller, store, _clock) = create_test_controller(3);

        let outcome = controller.rate(1, true);
        assert!(outcome.persist.is_saved());
        controller.rate(2, false);

        let reviews = stored_reviews(&store);
        assert_eq!(reviews.len(), 2);
        assert_eq!(
            reviews.get(2),
            ReviewRecord {
                level: 1,
                next_review_at: T0 + 4 * HOUR
            }
        );
        // Plain ratings never write the unknown blob
        assert!(store.get(UNKNOWN_KEY).is_none());
    }

    #[test]
    fn test_level_five_failure_scenario() {
        let (mut controller, _store, clock) = create_test_controller(1);
        for _ in 0..5 {
            controller.rate(1, true);
        }
        assert_eq!(controller.state().reviews().get(1).level, 5);

        clock.set(T0 + 1_000);
        controller.rate(1, false);
        let record = controller.state().reviews().get(1);
        assert_eq!(record.level, 1);
        assert_eq!(record.next_review_at, T0 + 1_000 + 4 * 3_600_000);
    }

    #[test]
    fn test_toggle_writes_both_blobs() {
        let (mut controller, store, _clock) = create_test_controller(3);

        let outcome = controller.toggle_unknown(2);
        assert_eq!(outcome.changes.membership, Some(MembershipChange::Added));

        assert!(stored_unknown(&store).contains(2));
        assert_eq!(stored_reviews(&store).get(2).level, 1);

        controller.toggle_unknown(2);
        assert!(stored_unknown(&store).is_empty());
        assert_eq!(stored_reviews(&store).get(2).level, 2);
    }

    #[test]
    fn test_reopen_restores_state() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(T0);
        {
            let mut controller = StudyController::open(
                catalog(3),
                Box::new(store.clone()),
                Box::new(clock.clone()),
                IntervalTable::reference(),
            );
            controller.toggle_unknown(3);
            controller.rate(1, true);
        }

        let controller = StudyController::open(
            catalog(3),
            Box::new(store.clone()),
            Box::new(clock),
            IntervalTable::reference(),
        );
        assert!(controller.load_status().is_saved());
        assert!(controller.is_unknown(3));
        assert_eq!(controller.state().reviews().get(1).level, 1);
    }

    #[test]
    fn test_broken_storage_keeps_working_in_memory() {
        let mut controller = StudyController::open(
            catalog(2),
            Box::new(BrokenStore),
            Box::new(ManualClock::new(T0)),
            IntervalTable::reference(),
        );
        assert_eq!(controller.load_status(), PersistStatus::Unavailable);

        let outcome = controller.toggle_unknown(1);
        assert_eq!(outcome.persist, PersistStatus::Unavailable);
        assert!(controller.is_unknown(1));
        assert_eq!(controller.state().reviews().get(1).level, 1);
    }

    #[test]
    fn test_due_items_reads_clock_each_time() {
        let (mut controller, _store, clock) = create_test_controller(2);
        controller.rate(1, false);

        let ids: Vec<ItemId> = controller.due_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);

        clock.advance(4 * HOUR);
        let ids: Vec<ItemId> = controller.due_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_due_review_completes_and_stays_complete_on_reentry() {
        let (mut controller, _store, clock) = create_test_controller(3);

        let mut session = controller.start_due_review();
        assert_eq!(session.len(), 3);

        for expected in [Advance::Next(1), Advance::Next(2), Advance::Complete] {
            let answer = controller.answer(&mut session, true).unwrap();
            assert_eq!(answer.advance, PendingAdvance::Done(expected));
            assert_eq!(answer.outcome.changes.membership, None);
        }
        assert_eq!(session.status(), SessionStatus::Complete);
        assert!(controller.answer(&mut session, true).is_none());

        clock.advance(HOUR);
        let reentered = controller.start_due_review();
        assert!(reentered.is_empty());
        assert_eq!(reentered.status(), SessionStatus::Complete);
        assert!(controller.state().unknown().is_empty());
    }

    #[test]
    fn test_due_review_picks_items_up_again_when_due() {
        let (mut controller, _store, clock) = create_test_controller(2);
        let mut session = controller.start_due_review();
        controller.answer(&mut session, false);
        controller.answer(&mut session, true);

        clock.advance(4 * HOUR);
        let session = controller.start_due_review();
        assert_eq!(session.queue(), &[1, 2]);
    }

    #[test]
    fn test_free_study_answer_couples_to_unknown_set() {
        let (mut controller, store, _clock) = create_test_controller(5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session =
            controller.build_session(Selection::new(Scope::All, false), true, &mut rng);
        let first = session.current().unwrap();

        let answer = controller.answer(&mut session, false).unwrap();
        assert_eq!(answer.id, first);
        assert_eq!(answer.advance, PendingAdvance::After(DEFAULT_ADVANCE_DELAY));
        assert_eq!(answer.outcome.changes.membership, Some(MembershipChange::Added));
        assert!(stored_unknown(&store).contains(first));

        // Pointer moves only when the caller advances
        assert_eq!(session.current(), Some(first));
        assert_eq!(session.advance(), Advance::Next(1));
    }

    #[test]
    fn test_free_study_hit_on_unflagged_item_changes_nothing() {
        let (mut controller, store, _clock) = create_test_controller(2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session =
            controller.build_session(Selection::new(Scope::All, false), false, &mut rng);

        let answer = controller.answer(&mut session, true).unwrap();
        assert!(answer.outcome.changes.is_empty());
        assert!(store.get(REVIEWS_KEY).is_none());
        assert!(!controller.state().reviews().contains(1));
    }

    #[test]
    fn test_unknown_only_selection_with_nothing_flagged_is_empty() {
        let (controller, _store, _clock) = create_test_controller(30);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            controller.build_session(Selection::new(Scope::All, true), true, &mut rng);

        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(controller.current_item(&session).is_none());
        assert_eq!(session.advance(), Advance::Empty);
    }

    #[test]
    fn test_unknown_only_selection_after_flagging() {
        let (mut controller, _store, _clock) = create_test_controller(30);
        controller.toggle_unknown(22);
        controller.toggle_unknown(5);

        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            controller.build_session(Selection::new(Scope::Chunk(1), true), true, &mut rng);
        assert_eq!(session.queue(), &[22]);

        assert!(controller.reselect(&mut session, Selection::new(Scope::All, true), &mut rng));
        let mut ids = session.queue().to_vec();
        ids.sort_unstable();
        assert_eq!(ids, vec![5, 22]);
    }

    #[test]
    fn test_stats() {
        let (mut controller, _store, _clock) = create_test_controller(4);
        controller.toggle_unknown(1);
        controller.rate(2, true);

        let stats = controller.stats();
        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.new_items, 2);
        assert_eq!(stats.unknown_items, 1);
        assert_eq!(stats.due_items, 2);
        assert_eq!(stats.levels[1], 2);
    }

    #[test]
    fn test_custom_advance_delay_and_chunk_size() {
        let (controller, _store, _clock) = create_test_controller(10);
        let mut controller = controller
            .with_advance_delay(Duration::from_millis(0))
            .with_chunk_size(4);
        let mut rng = StdRng::seed_from_u64(9);

        let mut session =
            controller.build_session(Selection::new(Scope::Chunk(2), false), false, &mut rng);
        assert_eq!(session.queue(), &[9, 10]);

        let answer = controller.answer(&mut session, false).unwrap();
        assert_eq!(answer.advance, PendingAdvance::After(Duration::ZERO));
    }

    #[test]
    fn test_unknown_only_session_drops_learned_items() {
        let (mut controller, store, _clock) = create_test_controller(4);
        controller.toggle_unknown(1);
        controller.toggle_unknown(2);

        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            controller.build_session(Selection::new(Scope::All, true), false, &mut rng);
        assert_eq!(session.queue(), &[1, 2]);

        let answer = controller.answer(&mut session, true).unwrap();
        assert_eq!(answer.id, 1);
        assert_eq!(answer.outcome.changes.membership, Some(MembershipChange::Removed));
        assert_eq!(answer.advance, PendingAdvance::Done(Advance::Next(0)));
        assert_eq!(session.queue(), &[2]);
        assert_eq!(session.current(), Some(2));

        let answer = controller.answer(&mut session, true).unwrap();
        assert_eq!(answer.id, 2);
        assert_eq!(answer.advance, PendingAdvance::Done(Advance::Empty));
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(controller.current_item(&session).is_none());
        assert!(stored_unknown(&store).is_empty());
    }

    #[test]
    fn test_unknown_only_session_picks_up_new_flags() {
        let (mut controller, _store, _clock) = create_test_controller(30);
        controller.toggle_unknown(4);

        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            controller.build_session(Selection::new(Scope::Chunk(0), true), true, &mut rng);
        assert_eq!(session.queue(), &[4]);

        controller.toggle_unknown(9);
        controller.toggle_unknown(25);
        assert_eq!(controller.refresh(&mut session), None);
        assert_eq!(session.queue(), &[4, 9]);
        assert_eq!(session.current(), Some(4));
    }

    #[test]
    fn test_out_of_range_persisted_level_is_clamped() {
        let store = MemoryStore::new();
        store
            .save(REVIEWS_KEY, r#"{"1":{"level":18446744073709551615,"nextReviewAt":0}}"#)
            .unwrap();
        let mut controller = StudyController::open(
            catalog(1),
            Box::new(store.clone()),
            Box::new(ManualClock::new(T0)),
            IntervalTable::reference(),
        );
        assert!(controller.load_status().is_saved());
        assert_eq!(controller.state().reviews().get(1).level, 7);

        controller.rate(1, true);
        let record = controller.state().reviews().get(1);
        assert_eq!(record.level, 7);
        assert_eq!(record.next_review_at, T0 + 30 * 24 * HOUR);
    }

    #[test]
    fn test_levels_clamped_to_shorter_table() {
        let store = MemoryStore::new();
        store
            .save(REVIEWS_KEY, r#"{"1":{"level":6,"nextReviewAt":0},"2":{"level":1,"nextReviewAt":0}}"#)
            .unwrap();
        let table = IntervalTable::new(vec![0, HOUR, 2 * HOUR]).unwrap();
        let controller = StudyController::open(
            catalog(2),
            Box::new(store),
            Box::new(ManualClock::new(T0)),
            table,
        );
        assert_eq!(controller.state().reviews().get(1).level, 2);
        assert_eq!(controller.state().reviews().get(2).level, 1);
        assert_eq!(controller.stats().levels, vec![0, 1, 1]);
    }

    #[test]
    fn test_now_reads_injected_clock() {
        let (controller, _store, clock) = create_test_controller(1);
        assert_eq!(controller.now(), T0);
        clock.advance(HOUR);
        assert_eq!(controller.now(), T0 + HOUR);
    }
}
