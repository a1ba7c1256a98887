//! Interaction Matrix
//!
//! A requester × item grid of ratings, built fresh from the observation slice
//! on every collaborative call. Only non-zero cells are stored: each row is a
//! list of `(column, rating)` pairs sorted by column, with its magnitude
//! precomputed so pairwise cosine similarity is a single merge pass.
//!
//! Several observations for the same (requester, item) cell are averaged.

use crate::similarity::{cosine_from_parts, sparse_dot};
use catalog::{ItemId, Observation, RequesterId};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    /// Row labels, ascending
    requesters: Vec<RequesterId>,
    /// Column labels, ascending
    items: Vec<ItemId>,
    rows: Vec<Vec<(usize, f64)>>,
    norms: Vec<f64>,
}

impl InteractionMatrix {
    /// Build the matrix over every requester and item present in `observations`
    pub fn from_observations(observations: &[Observation]) -> Self {
        // (requester, item) -> (sum, count)
        let mut cells: BTreeMap<(RequesterId, ItemId), (f64, u32)> = BTreeMap::new();
        for obs in observations {
            let cell = cells.entry((obs.requester_id, obs.item_id)).or_insert((0.0, 0));
            cell.0 += f64::from(obs.rating);
            cell.1 += 1;
        }

        let mut items: Vec<ItemId> = cells.keys().map(|&(_, item)| item).collect();
        items.sort_unstable();
        items.dedup();

        let mut requesters = Vec::new();
        let mut rows: Vec<Vec<(usize, f64)>> = Vec::new();
        for (&(requester, item), &(sum, count)) in &cells {
            if requesters.last() != Some(&requester) {
                requesters.push(requester);
                rows.push(Vec::new());
            }
            // BTreeMap order keeps each row sorted by item id, hence by column
            if let (Ok(column), Some(row)) = (items.binary_search(&item), rows.last_mut()) {
                row.push((column, sum / f64::from(count)));
            }
        }

        let norms = rows
            .iter()
            .map(|row| row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt())
            .collect();

        debug!(
            "Built interaction matrix: {} requesters x {} items ({} cells)",
            requesters.len(),
            items.len(),
            cells.len()
        );

        Self { requesters, items, rows, norms }
    }

    /// (requesters, items)
    pub fn shape(&self) -> (usize, usize) {
        (self.requesters.len(), self.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.requesters.is_empty()
    }

    pub fn requester_ids(&self) -> &[RequesterId] {
        &self.requesters
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.items
    }

    /// Cell value; absent cells are 0
    pub fn get(&self, requester: RequesterId, item: ItemId) -> f64 {
        let (Some(row), Ok(column)) = (self.row_index(requester), self.items.binary_search(&item))
        else {
            return 0.0;
        };
        self.rows[row]
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|pos| self.rows[row][pos].1)
            .unwrap_or(0.0)
    }

    fn row_index(&self, requester: RequesterId) -> Option<usize> {
        self.requesters.binary_search(&requester).ok()
    }

    /// Cosine similarity between two requesters' rows
    pub fn cosine_similarity(&self, a: RequesterId, b: RequesterId) -> f64 {
        match (self.row_index(a), self.row_index(b)) {
            (Some(i), Some(j)) => {
                cosine_from_parts(sparse_dot(&self.rows[i], &self.rows[j]), self.norms[i], self.norms[j])
            }
            _ => 0.0,
        }
    }

    /// Cosine similarity of `target` against every other requester, in
    /// ascending requester order. Unknown targets yield an empty list.
    pub fn similarities_to(&self, target: RequesterId) -> Vec<(RequesterId, f64)> {
        let Some(t) = self.row_index(target) else {
            return Vec::new();
        };
        let target_row = &self.rows[t];
        let target_norm = self.norms[t];

        // Indexed parallel iterators collect in source order
        self.requesters
            .par_iter()
            .enumerate()
            .filter(|&(i, _)| i != t)
            .map(|(i, &requester)| {
                let dot = sparse_dot(target_row, &self.rows[i]);
                (requester, cosine_from_parts(dot, target_norm, self.norms[i]))
            })
            .collect()
    }
}
