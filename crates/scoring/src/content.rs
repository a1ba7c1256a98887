//! Tag-Similarity Scorer (content-based)
//!
//! "Items that share categories with the one you're looking at."
//!
//! ## Algorithm
//! 1. Look up the seed item; bail out with an empty list if it is missing or
//!    carries no categories
//! 2. Score every other categorised item by the Jaccard coefficient of the two
//!    category sets
//! 3. Drop zero overlaps, rank best-first with ascending-id tie breaks
//! 4. Attach a rationale naming the shared categories

use crate::ranking::best_first;
use crate::similarity::jaccard;
use crate::types::{Algorithm, Recommendation};
use catalog::{CatalogStore, Item, ItemId};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct TagSimilarityScorer;

impl TagSimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Recommend up to `limit` items whose categories overlap the seed's
    #[instrument(skip(self, store))]
    pub fn score<S>(&self, store: &S, seed_item_id: ItemId, limit: usize) -> Vec<Recommendation>
    where
        S: CatalogStore + ?Sized,
    {
        let Some(seed) = store.get_item(seed_item_id) else {
            warn!("Seed item {} not found, no content recommendations", seed_item_id);
            return Vec::new();
        };
        if seed.categories.is_empty() {
            warn!("Seed item {} has no categories, no content recommendations", seed_item_id);
            return Vec::new();
        }
        if limit == 0 {
            return Vec::new();
        }

        let candidates = store.get_all_items(None);
        let mut scored: Vec<(&Item, f64)> = candidates
            .par_iter()
            .filter(|item| item.id != seed.id && !item.categories.is_empty())
            .map(|&item| (item, jaccard(&seed.categories, &item.categories)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| best_first((a.1, a.0.id), (b.1, b.0.id)));
        scored.truncate(limit);

        debug!("Generated {} content recommendations", scored.len());

        scored
            .into_iter()
            .map(|(item, score)| Recommendation {
                rationale: shared_categories_rationale(seed, item),
                item: item.clone(),
                score,
                algorithm: Algorithm::Content,
            })
            .collect()
    }
}

fn shared_categories_rationale(seed: &Item, item: &Item) -> String {
    let shared: Vec<&str> = seed
        .categories
        .intersection(&item.categories)
        .map(String::as_str)
        .collect();
    format!("Shares genres: {}", shared.join(", "))
}
