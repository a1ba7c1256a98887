//! # Scoring Crate
//!
//! The recommendation scorers. Each one is a pure function over a catalog
//! snapshot (anything implementing `CatalogStore`) and returns a freshly built,
//! deterministically ordered list.
//!
//! ## Components
//!
//! ### Tag-Similarity (content)
//! Jaccard overlap between the seed item's categories and every other item's.
//!
//! ### Pattern-Similarity (collaborative)
//! Cosine similarity over the requester × item interaction matrix, then a
//! weighted vote from the nearest neighbors' liked items.
//!
//! ### Fusion (hybrid)
//! Both of the above run in parallel and are blended as
//! `0.6 × content + 0.4 × collaborative` by default.
//!
//! ### Cold start
//! Share of declared preferred categories an item carries.
//!
//! ## Example Usage
//!
//! ```ignore
//! use scoring::{FusionScorer, TagSimilarityScorer, PatternSimilarityScorer};
//! use catalog::CatalogIndex;
//!
//! let index = CatalogIndex::load_from_files(dir, "movies_cleaned.csv", "ratings_cleaned.csv")?;
//!
//! let similar = TagSimilarityScorer::new().score(&index, 1, 10);
//! let for_user = PatternSimilarityScorer::new().score(&index, 42, 10);
//! let blended = FusionScorer::default().score(&index, Some(1), Some(42), 10)?;
//! ```
//!
//! ## Ordering
//!
//! Every list is sorted by score descending, ties broken by ascending id, so
//! two calls against the same snapshot return identical output.

pub mod error;
pub mod types;
pub mod similarity;
pub mod matrix;
pub mod ranking;
pub mod content;
pub mod collaborative;
pub mod hybrid;
pub mod cold_start;

// Re-export commonly used types
pub use error::{Result, ScoringError};
pub use types::{Algorithm, Recommendation, ScoredItem};
pub use matrix::InteractionMatrix;
pub use content::TagSimilarityScorer;
pub use collaborative::{PatternSimilarityScorer, COLLABORATIVE_RATIONALE};
pub use hybrid::{FusionScorer, DEFAULT_COLLABORATIVE_WEIGHT, DEFAULT_CONTENT_WEIGHT};
pub use cold_start::ColdStartScorer;
