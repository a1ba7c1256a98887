//! Core domain types for the catalog and its interaction log.
//!
//! The `CatalogIndex` owns every item and every observation; all lookups hand
//! out borrows so scorers can work over a snapshot without copying.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a catalog item (always positive)
pub type ItemId = u32;

/// Identifier of the requester (rater) an observation belongs to
pub type RequesterId = u32;

/// Lowest rating value an observation may carry
pub const MIN_RATING: f32 = 1.0;

/// Highest rating value an observation may carry
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Item
// =============================================================================

/// A catalog entry (a movie).
///
/// Category labels are kept in a `BTreeSet` so that iteration order, and with it
/// every piece of text derived from the labels, is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Release year, either from its own column or a "(1995)" title suffix
    pub year: Option<u16>,
    pub categories: BTreeSet<String>,
    /// Average quality rating on a 0-10 scale, when the source provides one
    pub quality_rating: Option<f32>,
    pub imdb_url: Option<String>,

    // Enrichment fields, filled in by metadata collaborators after load
    pub poster_url: Option<String>,
    pub plot: Option<String>,
    pub director: Option<String>,
    pub runtime_minutes: Option<u32>,
}

impl Item {
    /// Create an item with no categories or optional metadata
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Replace the category set (builder style)
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the release year (builder style)
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Lower-cased copy of the category labels, for case-insensitive matching
    pub fn lowercase_categories(&self) -> BTreeSet<String> {
        self.categories.iter().map(|c| c.to_lowercase()).collect()
    }
}

// =============================================================================
// Observation
// =============================================================================

/// A single recorded rating by a requester for an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub requester_id: RequesterId,
    pub item_id: ItemId,
    /// Rating value from 1.0 to 5.0
    pub rating: f32,
    /// Unix timestamp (seconds) when the rating was made, if known
    pub timestamp: Option<i64>,
}

impl Observation {
    pub fn new(requester_id: RequesterId, item_id: ItemId, rating: f32) -> Self {
        Self {
            requester_id,
            item_id,
            rating,
            timestamp: None,
        }
    }
}

/// Check that a rating lies inside the supported scale
pub fn is_valid_rating(rating: f32) -> bool {
    rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
}

// =============================================================================
// CatalogIndex - The In-Memory Store
// =============================================================================

/// Holds the item table and the observation log, plus the secondary indices
/// used to answer store queries.
///
/// Items live in a `BTreeMap` so "all items" is naturally ordered by id.
/// The category index is keyed by the lower-cased label and its id lists are
/// kept sorted on every insert.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    pub(crate) items: BTreeMap<ItemId, Item>,

    /// Every observation in arrival order
    pub(crate) observations: Vec<Observation>,
    /// Observations grouped by requester, also in arrival order
    pub(crate) requester_observations: HashMap<RequesterId, Vec<Observation>>,

    /// Lower-cased category label -> ascending item ids
    pub(crate) category_index: HashMap<String, Vec<ItemId>>,
}

impl CatalogIndex {
    /// Creates a new, empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an item by id
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Every item, ascending by id
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Every observation in arrival order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// All observations made by a requester (empty slice if none)
    pub fn get_requester_observations(&self, requester_id: RequesterId) -> &[Observation] {
        self.requester_observations
            .get(&requester_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of the items carrying a category label, compared case-insensitively
    pub fn get_item_ids_by_category(&self, label: &str) -> &[ItemId] {
        self.category_index
            .get(&label.to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct requester ids with at least one observation
    pub fn requester_count(&self) -> usize {
        self.requester_observations.len()
    }

    /// Insert (or replace) an item and keep the category index in step
    pub fn insert_item(&mut self, item: Item) {
        if let Some(previous) = self.items.remove(&item.id) {
            for label in previous.lowercase_categories() {
                if let Some(ids) = self.category_index.get_mut(&label) {
                    ids.retain(|&id| id != previous.id);
                }
            }
        }

        for label in item.lowercase_categories() {
            let ids = self.category_index.entry(label).or_default();
            if let Err(pos) = ids.binary_search(&item.id) {
                ids.insert(pos, item.id);
            }
        }

        self.items.insert(item.id, item);
    }

    /// Append an observation to the log and the per-requester index
    pub fn insert_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
        self.requester_observations
            .entry(observation.requester_id)
            .or_default()
            .push(observation);
    }

    /// (items, requesters, observations) counts
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.items.len(),
            self.requester_observations.len(),
            self.observations.len(),
        )
    }
}
