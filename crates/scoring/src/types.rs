//! Result types shared by every scorer.

use catalog::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which algorithm produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Category-overlap similarity to a seed item
    Content,
    /// Rating-pattern similarity between requesters
    Collaborative,
    /// Weighted blend of the two
    Hybrid,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Algorithm::Content => "content",
            Algorithm::Collaborative => "collaborative",
            Algorithm::Hybrid => "hybrid",
        };
        f.write_str(tag)
    }
}

/// A ranked suggestion, built once per call and never modified afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: Item,
    pub score: f64,
    /// Human-readable explanation of why the item was suggested
    pub rationale: String,
    pub algorithm: Algorithm,
}

/// An item id with its (possibly unnormalized) score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item_id: ItemId, score: f64) -> Self {
        Self { item_id, score }
    }
}
