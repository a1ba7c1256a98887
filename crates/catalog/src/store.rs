//! The read interface scorers consume.
//!
//! Scorers are written against `CatalogStore` rather than `CatalogIndex`, so
//! any snapshot that can answer these five queries can be scored.

use crate::types::*;
use std::collections::BTreeSet;

/// Read-only view over items and observations.
///
/// Every method that returns a sequence of items orders it by ascending id.
/// `limit: None` means "no limit".
pub trait CatalogStore: Send + Sync {
    fn get_item(&self, id: ItemId) -> Option<&Item>;

    /// Items carrying `label`, compared case-insensitively
    fn get_items_by_category(&self, label: &str, limit: Option<usize>) -> Vec<&Item>;

    fn get_all_items(&self, limit: Option<usize>) -> Vec<&Item>;

    fn get_observations_for_requester(&self, id: RequesterId) -> &[Observation];

    fn get_all_observations(&self) -> &[Observation];
}

impl CatalogStore for CatalogIndex {
    fn get_item(&self, id: ItemId) -> Option<&Item> {
        CatalogIndex::get_item(self, id)
    }

    fn get_items_by_category(&self, label: &str, limit: Option<usize>) -> Vec<&Item> {
        self.get_item_ids_by_category(label)
            .iter()
            .filter_map(|id| self.items.get(id))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    fn get_all_items(&self, limit: Option<usize>) -> Vec<&Item> {
        self.items().take(limit.unwrap_or(usize::MAX)).collect()
    }

    fn get_observations_for_requester(&self, id: RequesterId) -> &[Observation] {
        self.get_requester_observations(id)
    }

    fn get_all_observations(&self) -> &[Observation] {
        self.observations()
    }
}

impl CatalogIndex {
    /// Case-insensitive title substring search, ascending by id
    pub fn search_items(&self, query: &str, limit: usize) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Sorted distinct category labels across the catalog
    pub fn categories(&self) -> Vec<String> {
        let labels: BTreeSet<&String> = self.items().flat_map(|item| &item.categories).collect();
        labels.into_iter().cloned().collect()
    }
}
