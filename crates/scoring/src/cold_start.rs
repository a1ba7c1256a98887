//! Cold-Start Scorer
//!
//! Bootstraps a brand-new requester from a declared set of preferred
//! categories. The score of an item is the share of preferred categories it
//! carries, compared case-insensitively.

use crate::ranking::rank_top_n;
use crate::types::ScoredItem;
use catalog::{CatalogStore, Item};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ColdStartScorer;

impl ColdStartScorer {
    pub fn new() -> Self {
        Self
    }

    /// Ranked `(item id, overlap / preferred)` pairs, best first
    #[instrument(skip(self, store, preferred_categories))]
    pub fn rank<S, L>(&self, store: &S, preferred_categories: &[L], limit: usize) -> Vec<ScoredItem>
    where
        S: CatalogStore + ?Sized,
        L: AsRef<str>,
    {
        let preferred = normalize_labels(preferred_categories);
        if preferred.is_empty() {
            warn!("No preferred categories given, no cold-start recommendations");
            return Vec::new();
        }

        let preferred_count = preferred.len() as f64;
        let scored: Vec<ScoredItem> = store
            .get_all_items(None)
            .into_iter()
            .filter_map(|item| {
                let overlap = item
                    .categories
                    .iter()
                    .map(|label| label.trim().to_lowercase())
                    .collect::<BTreeSet<_>>()
                    .intersection(&preferred)
                    .count();
                (overlap > 0).then(|| ScoredItem::new(item.id, overlap as f64 / preferred_count))
            })
            .collect();

        debug!("{} items overlap {} preferred categories", scored.len(), preferred.len());
        rank_top_n(scored, limit)
    }

    /// Top `limit` items for the preferred categories
    pub fn score<S, L>(&self, store: &S, preferred_categories: &[L], limit: usize) -> Vec<Item>
    where
        S: CatalogStore + ?Sized,
        L: AsRef<str>,
    {
        self.rank(store, preferred_categories, limit)
            .into_iter()
            .filter_map(|scored| store.get_item(scored.item_id).cloned())
            .collect()
    }
}

/// Lower-cased, trimmed and deduplicated labels; blanks are dropped
fn normalize_labels<L: AsRef<str>>(labels: &[L]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|label| label.as_ref().trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::CatalogIndex;

    fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        index.insert_item(Item::new(1, "Rush Hour").with_categories(["Action", "Comedy"]));
        index.insert_item(Item::new(2, "Little Miss Sunshine").with_categories(["Comedy", "Drama"]));
        index.insert_item(Item::new(3, "Alien").with_categories(["Horror", "Sci-Fi"]));
        index.insert_item(Item::new(4, "Airplane!").with_categories(["Comedy"]));
        index
    }

    #[test]
    fn test_overlap_share_and_order() {
        let index = create_test_index();
        let ranked = ColdStartScorer::new().rank(&index, &["comedy", "ACTION"], 10);

        let pairs: Vec<(u32, f64)> = ranked.iter().map(|s| (s.item_id, s.score)).collect();
        assert_eq!(pairs, vec![(1, 1.0), (2, 0.5), (4, 0.5)]);
    }

    #[test]
    fn test_duplicate_and_blank_labels() {
        let index = create_test_index();
        let ranked = ColdStartScorer::new().rank(&index, &["Comedy", " comedy ", ""], 10);
        assert!(ranked.iter().all(|s| s.score == 1.0));
        assert_eq!(ranked.len(), 3);

        let none: [&str; 0] = [];
        assert!(ColdStartScorer::new().score(&index, &none, 10).is_empty());
        assert!(ColdStartScorer::new().score(&index, &["  "], 10).is_empty());
    }

    #[test]
    fn test_returns_items() {
        let index = create_test_index();
        let items = ColdStartScorer::new().score(&index, &["sci-fi".to_string()], 5);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Alien");
    }
}
