//! Requester profiles and catalog-wide statistics.
//!
//! Both are computed on demand from a store snapshot; neither is cached.

use crate::store::CatalogStore;
use crate::types::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Average rating at or above which a category counts as a favorite
const FAVORITE_THRESHOLD: f64 = 4.0;
/// Average rating at or below which a category counts as disliked
const DISLIKED_THRESHOLD: f64 = 2.5;
const MAX_FAVORITES: usize = 5;
const POPULAR_CATEGORY_COUNT: usize = 10;

/// What a requester's rating history says about their taste
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequesterProfile {
    pub requester_id: RequesterId,
    /// Best-rated categories first, at most five
    pub favorite_categories: Vec<String>,
    pub disliked_categories: Vec<String>,
    pub average_rating: f64,
    pub total_ratings: usize,
    /// Average rating per category
    pub category_preferences: BTreeMap<String, f64>,
}

/// Catalog-wide counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_items: usize,
    pub total_requesters: usize,
    pub total_observations: usize,
    pub average_rating: f64,
    /// (category, item count), most common first
    pub popular_categories: Vec<(String, usize)>,
}

/// Build a profile from a requester's observations.
///
/// A requester without observations gets an empty profile rather than an error.
pub fn build_requester_profile<S: CatalogStore + ?Sized>(
    store: &S,
    requester_id: RequesterId,
) -> RequesterProfile {
    let observations = store.get_observations_for_requester(requester_id);

    let average_rating = if observations.is_empty() {
        0.0
    } else {
        observations.iter().map(|o| o.rating as f64).sum::<f64>() / observations.len() as f64
    };

    let category_preferences = compute_category_preferences(store, observations);

    // Sort by average DESC, label ASC so equal averages stay in a stable order
    let mut ranked: Vec<(&String, f64)> = category_preferences.iter().map(|(g, &r)| (g, r)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let favorite_categories = ranked
        .iter()
        .filter(|(_, avg)| *avg >= FAVORITE_THRESHOLD)
        .take(MAX_FAVORITES)
        .map(|(g, _)| (*g).clone())
        .collect();
    let disliked_categories = ranked
        .iter()
        .filter(|(_, avg)| *avg <= DISLIKED_THRESHOLD)
        .map(|(g, _)| (*g).clone())
        .collect();

    RequesterProfile {
        requester_id,
        favorite_categories,
        disliked_categories,
        average_rating,
        total_ratings: observations.len(),
        category_preferences,
    }
}

/// Average rating per category over a set of observations
fn compute_category_preferences<S: CatalogStore + ?Sized>(
    store: &S,
    observations: &[Observation],
) -> BTreeMap<String, f64> {
    let mut category_stats: HashMap<&str, (f64, u32)> = HashMap::new();
    for observation in observations {
        if let Some(item) = store.get_item(observation.item_id) {
            for category in &item.categories {
                let entry = category_stats.entry(category.as_str()).or_insert((0.0, 0));
                entry.0 += observation.rating as f64;
                entry.1 += 1;
            }
        }
    }

    category_stats
        .into_iter()
        .map(|(category, (sum, count))| (category.to_string(), sum / count as f64))
        .collect()
}

/// Totals across the whole catalog
pub fn compute_statistics<S: CatalogStore + ?Sized>(store: &S) -> CatalogStatistics {
    let items = store.get_all_items(None);
    let observations = store.get_all_observations();

    let category_counts = items
        .par_iter()
        .fold(
            || HashMap::new(),
            |mut local_counts, item| {
                for category in &item.categories {
                    *local_counts.entry(category.clone()).or_insert(0usize) += 1;
                }
                local_counts
            },
        )
        .reduce(
            || HashMap::new(),
            |mut acc, local_counts| {
                for (category, count) in local_counts {
                    *acc.entry(category).or_insert(0) += count;
                }
                acc
            },
        );

    let mut popular_categories: Vec<(String, usize)> = category_counts.into_iter().collect();
    popular_categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    popular_categories.truncate(POPULAR_CATEGORY_COUNT);

    let requesters: HashSet<RequesterId> = observations.iter().map(|o| o.requester_id).collect();
    let average_rating = if observations.is_empty() {
        0.0
    } else {
        observations.iter().map(|o| o.rating as f64).sum::<f64>() / observations.len() as f64
    };

    CatalogStatistics {
        total_items: items.len(),
        total_requesters: requesters.len(),
        total_observations: observations.len(),
        average_rating,
        popular_categories,
    }
}
