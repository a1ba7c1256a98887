//! # Catalog Crate
//!
//! The Catalog & Interaction Store: items with category labels, and the
//! requester → item rating observations recorded against them.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, Observation, CatalogIndex)
//! - **parser**: Parse the cleaned CSV exports into Rust structs
//! - **index**: Load, index and validate a catalog
//! - **store**: The `CatalogStore` read interface the scorers consume
//! - **shared**: `SharedCatalog`, the read-write wrapper for live inserts
//! - **profile**: Requester profiles and catalog statistics
//! - **error**: Error types for loading and mutation
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, CatalogStore};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(
//!     Path::new("cleaned_data"),
//!     "movies_cleaned.csv",
//!     "ratings_cleaned.csv",
//! )?;
//!
//! let item = index.get_item(1).unwrap();
//! let history = index.get_observations_for_requester(1);
//! println!("{} / requester 1 rated {} items", item.title, history.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod store;
pub mod shared;
pub mod profile;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    ItemId,
    RequesterId,
    // Core types
    Item,
    Observation,
    CatalogIndex,
    // Rating scale
    MAX_RATING,
    MIN_RATING,
    is_valid_rating,
};
pub use store::CatalogStore;
pub use shared::SharedCatalog;
pub use profile::{CatalogStatistics, RequesterProfile, build_requester_profile, compute_statistics};
