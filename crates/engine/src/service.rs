//! # Async Recommendation Service
//!
//! Thin async facade over `RecommendationEngine` for callers living on a tokio
//! runtime. Scoring is CPU-bound, so every request runs on the blocking pool
//! via `spawn_blocking` and the executor threads stay free.
//!
//! Result counts are resolved here: a missing count falls back to
//! `default_recommendations` and any count is capped at `max_recommendations`.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use catalog::{CatalogStatistics, Item, ItemId, Observation, RequesterId, RequesterProfile};
use scoring::Recommendation;

use crate::engine::RecommendationEngine;
use crate::error::Result;

/// A single request a caller can make of the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationRequest {
    Similar {
        item_id: ItemId,
        limit: Option<usize>,
    },
    ForRequester {
        requester_id: RequesterId,
        limit: Option<usize>,
    },
    Hybrid {
        item_id: Option<ItemId>,
        requester_id: Option<RequesterId>,
        limit: Option<usize>,
    },
    ColdStart {
        categories: Vec<String>,
        limit: Option<usize>,
    },
}

/// What came back for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "results", rename_all = "snake_case")]
pub enum RecommendationResponse {
    Scored(Vec<Recommendation>),
    Items(Vec<Item>),
}

impl RecommendationResponse {
    pub fn len(&self) -> usize {
        match self {
            RecommendationResponse::Scored(recs) => recs.len(),
            RecommendationResponse::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationService {
    engine: Arc<RecommendationEngine>,
}

impl RecommendationService {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Run one request on the blocking pool
    pub async fn handle(&self, request: RecommendationRequest) -> Result<RecommendationResponse> {
        let start = Instant::now();
        debug!("Handling {:?}", request);

        let engine = Arc::clone(&self.engine);
        let response = tokio::task::spawn_blocking(move || dispatch(&engine, request)).await??;

        info!(
            "Served {} results in {:.2?}",
            response.len(),
            start.elapsed()
        );
        Ok(response)
    }

    /// Record a rating without blocking the executor on the write lock
    pub async fn record_observation(
        &self,
        requester_id: RequesterId,
        item_id: ItemId,
        rating: f32,
    ) -> Result<Observation> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || engine.record_observation(requester_id, item_id, rating)).await?
    }

    pub async fn requester_profile(&self, requester_id: RequesterId) -> Result<RequesterProfile> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || engine.requester_profile(requester_id)).await?
    }

    pub async fn statistics(&self) -> Result<CatalogStatistics> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || engine.statistics()).await?
    }
}

fn dispatch(engine: &RecommendationEngine, request: RecommendationRequest) -> Result<RecommendationResponse> {
    let config = engine.config();
    match request {
        RecommendationRequest::Similar { item_id, limit } => engine
            .score_by_tag_similarity(item_id, config.result_count(limit))
            .map(RecommendationResponse::Scored),
        RecommendationRequest::ForRequester { requester_id, limit } => engine
            .score_by_pattern_similarity(requester_id, config.result_count(limit))
            .map(RecommendationResponse::Scored),
        RecommendationRequest::Hybrid {
            item_id,
            requester_id,
            limit,
        } => engine
            .score_hybrid(item_id, requester_id, config.result_count(limit))
            .map(RecommendationResponse::Scored),
        RecommendationRequest::ColdStart { categories, limit } => engine
            .score_cold_start(categories.as_slice(), config.result_count(limit))
            .map(RecommendationResponse::Items),
    }
}
