//! Pattern-Similarity Scorer (collaborative filtering)
//!
//! "Requesters who rate like you also liked these items."
//!
//! ## Algorithm
//! 1. Build the interaction matrix from every current observation
//! 2. Cosine similarity between the target's row and every other row
//! 3. Keep the closest neighbors (ties by ascending requester id)
//! 4. Accumulate `similarity × rating` per item over each neighbor's liked
//!    observations
//! 5. Drop items the target already rated, rank, normalize by the top weight
//!
//! The matrix is rebuilt on every call so freshly recorded observations are
//! always taken into account.

use crate::matrix::InteractionMatrix;
use crate::ranking::{best_first, rank_top_n};
use crate::types::{Algorithm, Recommendation, ScoredItem};
use catalog::{CatalogStore, ItemId, RequesterId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

pub const DEFAULT_NEIGHBOR_COUNT: usize = 10;
pub const DEFAULT_LIKE_THRESHOLD: f32 = 4.0;
pub const COLLABORATIVE_RATIONALE: &str = "Based on similar users' preferences";

#[derive(Debug, Clone)]
pub struct PatternSimilarityScorer {
    /// How many nearest requesters contribute candidates
    neighbor_count: usize,

    /// Minimum rating for a neighbor's observation to count as a "like"
    like_threshold: f32,
}

impl Default for PatternSimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSimilarityScorer {
    pub fn new() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            like_threshold: DEFAULT_LIKE_THRESHOLD,
        }
    }

    /// Configure the neighborhood size (default: 10)
    pub fn with_neighbor_count(mut self, count: usize) -> Self {
        self.neighbor_count = count;
        self
    }

    /// Configure the "liked" threshold (default: 4.0)
    pub fn with_like_threshold(mut self, threshold: f32) -> Self {
        self.like_threshold = threshold;
        self
    }

    /// Recommend up to `limit` unrated items liked by the requester's neighbors
    #[instrument(skip(self, store))]
    pub fn score<S>(&self, store: &S, requester_id: RequesterId, limit: usize) -> Vec<Recommendation>
    where
        S: CatalogStore + ?Sized,
    {
        let ranked = self.rank(store, requester_id, limit);

        // Normalize against the best weight of the selected set
        let max_weight = ranked.first().map(|s| s.score).unwrap_or(0.0);
        if max_weight <= 0.0 {
            return Vec::new();
        }

        ranked
            .into_iter()
            .filter_map(|scored| {
                let item = store.get_item(scored.item_id)?;
                Some(Recommendation {
                    item: item.clone(),
                    score: scored.score / max_weight,
                    rationale: COLLABORATIVE_RATIONALE.to_string(),
                    algorithm: Algorithm::Collaborative,
                })
            })
            .collect()
    }

    /// Ranked, unnormalized accumulated weights for the requester's top `limit`
    /// candidates. Items missing from the catalog never make the cut.
    pub fn rank<S>(&self, store: &S, requester_id: RequesterId, limit: usize) -> Vec<ScoredItem>
    where
        S: CatalogStore + ?Sized,
    {
        let history = store.get_observations_for_requester(requester_id);
        if history.is_empty() {
            warn!("Requester {} has no observations", requester_id);
            return Vec::new();
        }
        if limit == 0 {
            return Vec::new();
        }

        let matrix = InteractionMatrix::from_observations(store.get_all_observations());
        let neighbors = self.nearest_neighbors(&matrix, requester_id);
        debug!("Found {} neighbors", neighbors.len());

        let rated: HashSet<ItemId> = history.iter().map(|obs| obs.item_id).collect();

        let mut weights: HashMap<ItemId, f64> = HashMap::new();
        for &(neighbor, similarity) in &neighbors {
            for obs in store.get_observations_for_requester(neighbor) {
                if obs.rating >= self.like_threshold && !rated.contains(&obs.item_id) {
                    *weights.entry(obs.item_id).or_insert(0.0) += similarity * f64::from(obs.rating);
                }
            }
        }

        let candidates: Vec<ScoredItem> = weights
            .into_iter()
            .filter(|&(item_id, weight)| weight > 0.0 && store.get_item(item_id).is_some())
            .map(|(item_id, weight)| ScoredItem::new(item_id, weight))
            .collect();

        debug!("Accumulated {} collaborative candidates", candidates.len());
        rank_top_n(candidates, limit)
    }

    /// The `neighbor_count` most similar requesters, best first
    fn nearest_neighbors(
        &self,
        matrix: &InteractionMatrix,
        requester_id: RequesterId,
    ) -> Vec<(RequesterId, f64)> {
        let mut similarities = matrix.similarities_to(requester_id);
        similarities.sort_by(|a, b| best_first((a.1, a.0), (b.1, b.0)));
        similarities.truncate(self.neighbor_count);
        similarities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogIndex, Item, Observation};

    fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for id in 1..=6 {
            index.insert_item(Item::new(id, format!("Movie {}", id)).with_categories(["Drama"]));
        }

        // Target requester
        index.insert_observation(Observation::new(1, 1, 5.0));
        index.insert_observation(Observation::new(1, 2, 4.0));

        // Close neighbor who also liked 3 and 4
        for (item, rating) in [(1, 5.0), (2, 5.0), (3, 4.0), (4, 5.0)] {
            index.insert_observation(Observation::new(2, item, rating));
        }

        // Distant neighbor, 5 is liked, 6 is not
        for (item, rating) in [(1, 1.0), (5, 5.0), (6, 2.0)] {
            index.insert_observation(Observation::new(3, item, rating));
        }

        index
    }

    #[test]
    fn test_never_recommends_rated_items() {
        let index = create_test_index();
        let recs = PatternSimilarityScorer::new().score(&index, 1, 10);

        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.item.id != 1 && r.item.id != 2));
        assert!(recs.iter().all(|r| r.item.id != 6));
        assert!(recs.iter().all(|r| r.rationale == COLLABORATIVE_RATIONALE));
    }

    #[test]
    fn test_scores_normalized_and_ordered() {
        let index = create_test_index();
        let recs = PatternSimilarityScorer::new().score(&index, 1, 10);

        assert_eq!(recs[0].item.id, 4);
        assert_eq!(recs[0].score, 1.0);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(recs.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
    }

    #[test]
    fn test_unknown_requester_is_empty() {
        let index = create_test_index();
        assert!(PatternSimilarityScorer::new().score(&index, 42, 10).is_empty());
    }

    #[test]
    fn test_neighbor_count_limits_contributors() {
        let index = create_test_index();
        let recs = PatternSimilarityScorer::new()
            .with_neighbor_count(1)
            .score(&index, 1, 10);

        // Only requester 2 contributes
        let ids: Vec<ItemId> = recs.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn test_tied_neighbors_prefer_lowest_requester_id() {
        let mut index = CatalogIndex::new();
        for id in 1..=5 {
            index.insert_item(Item::new(id, format!("Movie {}", id)).with_categories(["Drama"]));
        }
        index.insert_observation(Observation::new(1, 1, 5.0));

        // Three neighbors with identical rows apart from the extra item they
        // liked, inserted highest id first
        for (requester, extra) in [(5, 5), (4, 4), (3, 3)] {
            index.insert_observation(Observation::new(requester, 1, 5.0));
            index.insert_observation(Observation::new(requester, extra, 5.0));
        }

        let recs = PatternSimilarityScorer::new()
            .with_neighbor_count(1)
            .score(&index, 1, 10);

        let ids: Vec<ItemId> = recs.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![3]);

        let two = PatternSimilarityScorer::new()
            .with_neighbor_count(2)
            .score(&index, 1, 10);
        let ids: Vec<ItemId> = two.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_like_threshold_is_configurable() {
        let index = create_test_index();
        let recs = PatternSimilarityScorer::new()
            .with_like_threshold(5.0)
            .score(&index, 1, 10);

        let ids: Vec<ItemId> = recs.iter().map(|r| r.item.id).collect();
        assert!(!ids.contains(&3));
        assert!(ids.contains(&4));
    }
}
