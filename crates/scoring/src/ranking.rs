//! Deterministic ordering: score descending, then id ascending.
//!
//! Every scorer goes through here so that equal scores never depend on hash
//! map iteration order or on the order rows arrived in.

use crate::types::ScoredItem;
use std::cmp::Ordering;

/// Compare two (score, id) pairs for a best-first ordering
pub fn best_first(a: (f64, u32), b: (f64, u32)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

/// Sort best-first and keep the top `limit`
pub fn rank_top_n(mut scored: Vec<ScoredItem>, limit: usize) -> Vec<ScoredItem> {
    scored.sort_by(|a, b| best_first((a.score, a.item_id), (b.score, b.item_id)));
    scored.truncate(limit);
    scored
}
