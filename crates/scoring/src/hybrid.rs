//! Fusion Scorer (hybrid)
//!
//! Runs the content and collaborative scorers side by side and blends their
//! normalized scores with two weights.

use crate::collaborative::PatternSimilarityScorer;
use crate::content::TagSimilarityScorer;
use crate::error::{Result, ScoringError};
use crate::ranking::best_first;
use crate::types::{Algorithm, Recommendation};
use catalog::{CatalogStore, Item, ItemId, RequesterId};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

pub const DEFAULT_CONTENT_WEIGHT: f64 = 0.6;
pub const DEFAULT_COLLABORATIVE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct FusionScorer {
    content: TagSimilarityScorer,
    collaborative: PatternSimilarityScorer,
    content_weight: f64,
    collaborative_weight: f64,
}

impl Default for FusionScorer {
    fn default() -> Self {
        Self::new(TagSimilarityScorer::new(), PatternSimilarityScorer::new())
    }
}

/// Per-item accumulator while merging the two signals
#[derive(Default)]
struct Fused {
    item: Option<Item>,
    content_score: f64,
    collaborative_score: f64,
    content_rationale: Option<String>,
    collaborative_rationale: Option<String>,
}

impl FusionScorer {
    pub fn new(content: TagSimilarityScorer, collaborative: PatternSimilarityScorer) -> Self {
        Self {
            content,
            collaborative,
            content_weight: DEFAULT_CONTENT_WEIGHT,
            collaborative_weight: DEFAULT_COLLABORATIVE_WEIGHT,
        }
    }

    /// Configure the blend weights (defaults: 0.6 content, 0.4 collaborative)
    pub fn with_weights(mut self, content_weight: f64, collaborative_weight: f64) -> Self {
        self.content_weight = content_weight;
        self.collaborative_weight = collaborative_weight;
        self
    }

    pub fn weights(&self) -> (f64, f64) {
        (self.content_weight, self.collaborative_weight)
    }

    /// Blend content and collaborative recommendations.
    ///
    /// At least one of `seed_item_id` and `requester_id` must be given,
    /// otherwise the request is rejected with [`ScoringError::InvalidRequest`].
    #[instrument(skip(self, store))]
    pub fn score<S>(
        &self,
        store: &S,
        seed_item_id: Option<ItemId>,
        requester_id: Option<RequesterId>,
        limit: usize,
    ) -> Result<Vec<Recommendation>>
    where
        S: CatalogStore + ?Sized,
    {
        if seed_item_id.is_none() && requester_id.is_none() {
            return Err(ScoringError::InvalidRequest(
                "hybrid scoring needs a seed item id or a requester id".to_string(),
            ));
        }

        let (content_recs, collaborative_recs) = rayon::join(
            || match seed_item_id {
                Some(seed) => self.content.score(store, seed, limit),
                None => Vec::new(),
            },
            || match requester_id {
                Some(requester) => self.collaborative.score(store, requester, limit),
                None => Vec::new(),
            },
        );

        debug!(
            "Fusing {} content and {} collaborative recommendations",
            content_recs.len(),
            collaborative_recs.len()
        );

        let mut merged: BTreeMap<ItemId, Fused> = BTreeMap::new();
        for rec in content_recs {
            let entry = merged.entry(rec.item.id).or_default();
            entry.content_score = rec.score;
            entry.content_rationale = Some(rec.rationale);
            entry.item = Some(rec.item);
        }
        for rec in collaborative_recs {
            if Some(rec.item.id) == seed_item_id {
                continue;
            }
            let entry = merged.entry(rec.item.id).or_default();
            entry.collaborative_score = rec.score;
            entry.collaborative_rationale = Some(rec.rationale);
            if entry.item.is_none() {
                entry.item = Some(rec.item);
            }
        }

        let mut fused: Vec<Recommendation> = merged
            .into_values()
            .filter_map(|f| {
                let score = self.content_weight * f.content_score
                    + self.collaborative_weight * f.collaborative_score;
                let rationale = if f.content_score > 0.0 {
                    f.content_rationale
                } else {
                    f.collaborative_rationale.or(f.content_rationale)
                }
                .unwrap_or_default();
                Some(Recommendation {
                    item: f.item?,
                    score,
                    rationale,
                    algorithm: Algorithm::Hybrid,
                })
            })
            .collect();

        fused.sort_by(|a, b| best_first((a.score, a.item.id), (b.score, b.item.id)));
        fused.truncate(limit);
        Ok(fused)
    }
}
