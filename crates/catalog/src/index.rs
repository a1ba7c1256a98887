//! CatalogIndex building and validation.
//!
//! Loading parses both files in parallel, inserts everything into a fresh
//! index (which maintains its own category index) and then validates the
//! result before handing it out.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

/// Earliest release year accepted for an item
pub(crate) const MIN_RELEASE_YEAR: u16 = 1888;
/// Latest release year accepted for an item
pub(crate) const MAX_RELEASE_YEAR: u16 = 2030;
/// Quality ratings are expressed on a 0-10 scale
const MAX_QUALITY_RATING: f32 = 10.0;

impl CatalogIndex {
    /// Load the catalog from a directory holding the items and observations files
    pub fn load_from_files(data_dir: &Path, items_file: &str, observations_file: &str) -> Result<Self> {
        info!("Loading catalog from {:?}", data_dir);

        let items_path = data_dir.join(items_file);
        let observations_path = data_dir.join(observations_file);

        let (items, observations) = rayon::join(
            || parser::parse_items(&items_path),
            || parser::parse_observations(&observations_path),
        );
        let items = items?;
        let observations = observations?;

        info!(
            "Loaded {} items, {} observations",
            items.len(),
            observations.len()
        );

        let index = Self::from_parts(items, observations);
        index.validate()?;

        info!("Catalog successfully built and validated");
        Ok(index)
    }

    /// Build an index from already-parsed records without validating them
    pub fn from_parts(
        items: impl IntoIterator<Item = Item>,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert_item(item);
        }
        for observation in observations {
            index.insert_observation(observation);
        }
        index
    }

    /// Validate data integrity
    ///
    /// Checks that:
    /// - item ids are positive, titles non-empty, years and quality ratings in range
    /// - every observation references an existing item
    /// - observation ratings are within 1.0 - 5.0
    pub fn validate(&self) -> Result<()> {
        for item in self.items.values() {
            validate_item(item)?;
        }

        for observation in &self.observations {
            if !self.items.contains_key(&observation.item_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Item".to_string(),
                    id: observation.item_id,
                });
            }
            if !is_valid_rating(observation.rating) {
                return Err(CatalogError::InvalidValue {
                    field: "rating".to_string(),
                    value: observation.rating.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Field-level checks for a single item
pub fn validate_item(item: &Item) -> Result<()> {
    if item.id == 0 {
        return Err(CatalogError::InvalidValue {
            field: "id".to_string(),
            value: item.id.to_string(),
        });
    }
    if item.title.trim().is_empty() {
        return Err(CatalogError::ValidationError(format!(
            "Item {} has an empty title",
            item.id
        )));
    }
    if let Some(year) = item.year {
        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
            return Err(CatalogError::InvalidValue {
                field: "release_year".to_string(),
                value: year.to_string(),
            });
        }
    }
    if let Some(quality) = item.quality_rating {
        if !quality.is_finite() || !(0.0..=MAX_QUALITY_RATING).contains(&quality) {
            return Err(CatalogError::InvalidValue {
                field: "quality_rating".to_string(),
                value: quality.to_string(),
            });
        }
    }
    if item.runtime_minutes == Some(0) {
        return Err(CatalogError::InvalidValue {
            field: "runtime".to_string(),
            value: "0".to_string(),
        });
    }
    Ok(())
}
