//! Read-only queries over the catalog and review state

use super::algorithm::IntervalTable;
use super::models::{ReviewStats, ReviewStore, UnknownSet};
use crate::catalog::{Catalog, VocabularyItem};
use crate::clock::Timestamp;

/// Items that are due at `now`, in catalog order
///
/// Never-rated items are always due.
pub fn due_items<'a>(
    catalog: &'a Catalog,
    reviews: &ReviewStore,
    now: Timestamp,
) -> Vec<&'a VocabularyItem> {
    catalog
        .items()
        .iter()
        .filter(|item| reviews.is_due(item.id, now))
        .collect()
}

/// Count items by scheduling state
pub fn review_stats(
    catalog: &Catalog,
    reviews: &ReviewStore,
    unknown: &UnknownSet,
    table: &IntervalTable,
    now: Timestamp,
) -> ReviewStats {
    let mut stats = ReviewStats {
        total_items: catalog.len(),
        levels: vec![0; table.len()],
        ..Default::default()
    };

    for item in catalog.items() {
        if !reviews.contains(item.id) {
            stats.new_items += 1;
        } else {
            let level = reviews.get(item.id).level.min(table.max_level());
            stats.levels[level] += 1;
        }

        if reviews.is_due(item.id, now) {
            stats.due_items += 1;
        }
        if unknown.contains(item.id) {
            stats.unknown_items += 1;
        }
    }

    stats
}
