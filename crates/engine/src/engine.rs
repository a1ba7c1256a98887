//! # Recommendation Engine
//!
//! The explicitly constructed entry point callers hold on to. It owns a handle
//! to the shared catalog and one instance of each scorer, configured from
//! `EngineConfig`.
//!
//! Every scoring call takes one read snapshot of the catalog and keeps it for
//! the whole call, so a concurrent `record_observation` is either fully
//! visible or not visible at all.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use catalog::{
    CatalogIndex, CatalogStatistics, Item, ItemId, Observation, RequesterId, RequesterProfile,
    SharedCatalog, build_requester_profile, compute_statistics,
};
use scoring::{
    ColdStartScorer, FusionScorer, PatternSimilarityScorer, Recommendation, TagSimilarityScorer,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<SharedCatalog>,
    config: EngineConfig,
    content: TagSimilarityScorer,
    collaborative: PatternSimilarityScorer,
    hybrid: FusionScorer,
    cold_start: ColdStartScorer,
}

impl RecommendationEngine {
    /// Create an engine over an already shared catalog
    pub fn new(catalog: Arc<SharedCatalog>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let content = TagSimilarityScorer::new();
        let collaborative = PatternSimilarityScorer::new()
            .with_neighbor_count(config.neighbor_count)
            .with_like_threshold(config.like_threshold);
        let hybrid = FusionScorer::new(content, collaborative.clone())
            .with_weights(config.content_weight, config.collaborative_weight);

        Ok(Self {
            catalog,
            config,
            content,
            collaborative,
            hybrid,
            cold_start: ColdStartScorer::new(),
        })
    }

    /// Wrap an in-memory index
    pub fn from_index(index: CatalogIndex, config: EngineConfig) -> Result<Self> {
        Self::new(Arc::new(SharedCatalog::new(index)), config)
    }

    /// Load the catalog files named in the config and build an engine over them
    pub fn load(config: EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let index = CatalogIndex::load_from_files(
            &config.data_dir,
            &config.items_file,
            &config.observations_file,
        )?;
        let (items, requesters, observations) = index.counts();
        info!(
            "Catalog ready in {:.2?}: {} items, {} requesters, {} observations",
            start.elapsed(),
            items,
            requesters,
            observations
        );
        Self::from_index(index, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared handle to the underlying catalog
    pub fn catalog(&self) -> Arc<SharedCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Items whose categories overlap the seed item's
    #[instrument(skip(self))]
    pub fn score_by_tag_similarity(&self, seed_item_id: ItemId, n: usize) -> Result<Vec<Recommendation>> {
        let start = Instant::now();
        let snapshot = self.catalog.snapshot()?;
        let recommendations = self.content.score(&*snapshot, seed_item_id, n);
        info!(
            "Content scoring for item {} returned {} results in {:.2?}",
            seed_item_id,
            recommendations.len(),
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Items liked by requesters who rate like this one
    #[instrument(skip(self))]
    pub fn score_by_pattern_similarity(
        &self,
        requester_id: RequesterId,
        n: usize,
    ) -> Result<Vec<Recommendation>> {
        let start = Instant::now();
        let snapshot = self.catalog.snapshot()?;
        let recommendations = self.collaborative.score(&*snapshot, requester_id, n);
        info!(
            "Collaborative scoring for requester {} returned {} results in {:.2?}",
            requester_id,
            recommendations.len(),
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Weighted blend of both signals; needs a seed, a requester, or both
    #[instrument(skip(self))]
    pub fn score_hybrid(
        &self,
        seed_item_id: Option<ItemId>,
        requester_id: Option<RequesterId>,
        n: usize,
    ) -> Result<Vec<Recommendation>> {
        let start = Instant::now();
        let snapshot = self.catalog.snapshot()?;
        let recommendations = self.hybrid.score(&*snapshot, seed_item_id, requester_id, n)?;
        info!(
            "Hybrid scoring returned {} results in {:.2?}",
            recommendations.len(),
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Items for a requester with no history yet, from declared categories
    #[instrument(skip(self, preferred_categories))]
    pub fn score_cold_start<L>(&self, preferred_categories: &[L], n: usize) -> Result<Vec<Item>>
    where
        L: AsRef<str>,
    {
        let snapshot = self.catalog.snapshot()?;
        Ok(self.cold_start.score(&*snapshot, preferred_categories, n))
    }

    /// Record a rating; the next collaborative call sees it
    pub fn record_observation(
        &self,
        requester_id: RequesterId,
        item_id: ItemId,
        rating: f32,
    ) -> Result<Observation> {
        if requester_id == 0 {
            return Err(EngineError::InvalidObservation(
                "requester id must be positive".to_string(),
            ));
        }
        if !catalog::is_valid_rating(rating) {
            return Err(EngineError::InvalidObservation(format!(
                "rating must be between {} and {}, got {}",
                catalog::MIN_RATING,
                catalog::MAX_RATING,
                rating
            )));
        }
        Ok(self.catalog.insert_observation(requester_id, item_id, rating)?)
    }

    pub fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let snapshot = self.catalog.snapshot()?;
        Ok(snapshot.get_item(item_id).cloned())
    }

    /// Case-insensitive title search
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        let snapshot = self.catalog.snapshot()?;
        Ok(snapshot.search_items(query, limit).into_iter().cloned().collect())
    }

    /// Every distinct category label, sorted
    pub fn categories(&self) -> Result<Vec<String>> {
        Ok(self.catalog.snapshot()?.categories())
    }

    pub fn requester_profile(&self, requester_id: RequesterId) -> Result<RequesterProfile> {
        let snapshot = self.catalog.snapshot()?;
        Ok(build_requester_profile(&*snapshot, requester_id))
    }

    pub fn statistics(&self) -> Result<CatalogStatistics> {
        let snapshot = self.catalog.snapshot()?;
        Ok(compute_statistics(&*snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoring::{Algorithm, ScoringError};

    fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        index.insert_item(Item::new(1, "Toy Story (1995)").with_categories(["Animation", "Comedy"]));
        index.insert_item(Item::new(2, "Shrek (2001)").with_categories(["Animation", "Comedy", "Fantasy"]));
        index.insert_item(Item::new(3, "Heat (1995)").with_categories(["Action", "Crime"]));
        index.insert_item(Item::new(4, "Up (2009)").with_categories(["Animation"]));

        index.insert_observation(Observation::new(1, 1, 5.0));
        index.insert_observation(Observation::new(2, 1, 5.0));
        index.insert_observation(Observation::new(2, 3, 4.5));
        index
    }

    fn create_engine() -> RecommendationEngine {
        RecommendationEngine::from_index(create_test_index(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_content_scoring() {
        let engine = create_engine();
        let recs = engine.score_by_tag_similarity(1, 10).unwrap();

        let ids: Vec<ItemId> = recs.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(recs.iter().all(|r| r.algorithm == Algorithm::Content));
    }

    #[test]
    fn test_hybrid_rejects_empty_request() {
        let engine = create_engine();
        let err = engine.score_hybrid(None, None, 5).unwrap_err();

        assert!(matches!(err, EngineError::Scoring(ScoringError::InvalidRequest(_))));
        assert!(err.is_invalid_request());
    }

    #[test]
    fn test_recorded_observation_is_visible_to_next_call() {
        let engine = create_engine();
        assert!(engine.score_by_pattern_similarity(3, 10).unwrap().is_empty());

        engine.record_observation(3, 1, 5.0).unwrap();
        let recs = engine.score_by_pattern_similarity(3, 10).unwrap();

        let ids: Vec<ItemId> = recs.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(recs[0].score, 1.0);
    }

    #[test]
    fn test_record_observation_rejects_bad_input() {
        let engine = create_engine();

        assert!(matches!(
            engine.record_observation(1, 1, 7.0),
            Err(EngineError::InvalidObservation(_))
        ));
        assert!(matches!(
            engine.record_observation(0, 1, 3.0),
            Err(EngineError::InvalidObservation(_))
        ));
        assert!(matches!(
            engine.record_observation(1, 999, 3.0),
            Err(EngineError::Catalog(catalog::CatalogError::MissingReference { .. }))
        ));
    }

    #[test]
    fn test_cold_start_and_lookups() {
        let engine = create_engine();

        let items = engine.score_cold_start(&["ANIMATION", "comedy"], 10).unwrap();
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        assert_eq!(engine.search("toy", 10).unwrap().len(), 1);
        assert_eq!(engine.get_item(3).unwrap().map(|i| i.title), Some("Heat (1995)".to_string()));
        assert!(engine.get_item(42).unwrap().is_none());
        assert!(engine.categories().unwrap().contains(&"Fantasy".to_string()));
    }

    #[test]
    fn test_profile_and_statistics() {
        let engine = create_engine();

        let profile = engine.requester_profile(2).unwrap();
        assert_eq!(profile.total_ratings, 2);

        let empty = engine.requester_profile(99).unwrap();
        assert_eq!(empty.total_ratings, 0);

        let stats = engine.statistics().unwrap();
        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.total_requesters, 2);
        assert_eq!(stats.total_observations, 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            neighbor_count: 0,
            ..EngineConfig::default()
        };
        let result = RecommendationEngine::from_index(create_test_index(), config);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }
}
