//! Data models for the vocabulary catalog

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stable, catalog-assigned item identifier
pub type ItemId = u32;

/// Default number of items in one study chunk
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// A single word with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: ItemId,
    /// Prompt side, e.g. the English word
    #[serde(alias = "en")]
    pub front: String,
    /// Answer side, e.g. the Turkish translation
    #[serde(alias = "tr")]
    pub back: String,
}

impl VocabularyItem {
    pub fn new(id: ItemId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
        }
    }
}

/// A contiguous slice of the catalog offered as one study unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkInfo {
    pub index: usize,
    /// 1-based position of the first item
    pub first: usize,
    /// 1-based position of the last slot (may be past the catalog end)
    pub last: usize,
    /// Items actually in the chunk
    pub len: usize,
}

impl ChunkInfo {
    /// Label such as `Part 2 (21-40)`
    pub fn label(&self) -> String {
        format!("Part {} ({}-{})", self.index + 1, self.first, self.last)
    }
}

/// Ordered, immutable list of vocabulary items
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<VocabularyItem>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    pub(crate) fn from_unique(items: Vec<VocabularyItem>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id, pos))
            .collect();
        Self { items, index }
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&VocabularyItem> {
        self.index.get(&id).map(|pos| &self.items[*pos])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of chunks of `size` items, rounding up
    pub fn chunk_count(&self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        self.items.len().div_ceil(size)
    }

    /// Items of chunk `index`; empty when the index is past the end
    pub fn chunk(&self, index: usize, size: usize) -> &[VocabularyItem] {
        let start = index.saturating_mul(size).min(self.items.len());
        let end = start.saturating_add(size).min(self.items.len());
        &self.items[start..end]
    }

    /// Describe every chunk for a picker
    pub fn chunks(&self, size: usize) -> Vec<ChunkInfo> {
        (0..self.chunk_count(size))
            .map(|index| ChunkInfo {
                index,
                first: index * size + 1,
                last: (index + 1) * size,
                len: self.chunk(index, size).len(),
            })
            .collect()
    }

    /// Case-insensitive substring match on either side, in catalog order
    pub fn search(&self, query: &str) -> Vec<&VocabularyItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item.front.to_lowercase().contains(&needle)
                    || item.back.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: u32) -> Catalog {
        Catalog::from_unique(
            (1..=n)
                .map(|i| VocabularyItem::new(i, format!("word{}", i), format!("kelime{}", i)))
                .collect(),
        )
    }

    #[test]
    fn test_chunks_round_up() {
        let catalog = sample(45);
        assert_eq!(catalog.chunk_count(20), 3);
        assert_eq!(catalog.chunk(0, 20).len(), 20);
        assert_eq!(catalog.chunk(2, 20).len(), 5);
        assert_eq!(catalog.chunk(2, 20)[0].id, 41);

        let chunks = catalog.chunks(20);
        assert_eq!(chunks[1].label(), "Part 2 (21-40)");
        assert_eq!(chunks[2].len, 5);
    }

    #[test]
    fn test_chunk_past_end_is_empty() {
        let catalog = sample(10);
        assert!(catalog.chunk(1, 20).is_empty());
        assert!(catalog.chunk(usize::MAX, 20).is_empty());
        assert_eq!(catalog.chunk_count(0), 0);
    }

    #[test]
    fn test_search_matches_either_side() {
        let catalog = Catalog::from_unique(vec![
            VocabularyItem::new(1, "Abandon", "terk etmek"),
            VocabularyItem::new(2, "Ability", "yetenek"),
            VocabularyItem::new(3, "Absent", "yok"),
        ]);

        let ids: Vec<ItemId> = catalog.search("ab").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let ids: Vec<ItemId> = catalog.search("YETE").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);

        assert_eq!(catalog.search("").len(), 3);
        assert!(catalog.search("zzz").is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = sample(3);
        assert_eq!(catalog.get(2).map(|i| i.front.as_str()), Some("word2"));
        assert!(catalog.get(99).is_none());
    }
}
