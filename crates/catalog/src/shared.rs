//! Read-write wrapper that lets observations arrive while scoring runs.
//!
//! Readers take a snapshot guard for the whole of a scoring call; inserts take
//! the write guard, so a reader never sees a half-applied observation.

use crate::error::{CatalogError, Result};
use crate::types::*;
use std::sync::{RwLock, RwLockReadGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// A `CatalogIndex` behind a `RwLock`
#[derive(Debug, Default)]
pub struct SharedCatalog {
    inner: RwLock<CatalogIndex>,
}

impl SharedCatalog {
    pub fn new(index: CatalogIndex) -> Self {
        Self {
            inner: RwLock::new(index),
        }
    }

    /// Point-in-time view; holds off writers until the guard is dropped
    pub fn snapshot(&self) -> Result<RwLockReadGuard<'_, CatalogIndex>> {
        self.inner.read().map_err(|_| CatalogError::LockPoisoned)
    }

    /// Record a new rating, stamped with the current time.
    ///
    /// The item must exist and the rating must be on the 1-5 scale.
    pub fn insert_observation(
        &self,
        requester_id: RequesterId,
        item_id: ItemId,
        rating: f32,
    ) -> Result<Observation> {
        if !is_valid_rating(rating) {
            return Err(CatalogError::InvalidValue {
                field: "rating".to_string(),
                value: rating.to_string(),
            });
        }

        let mut index = self.inner.write().map_err(|_| CatalogError::LockPoisoned)?;
        if index.get_item(item_id).is_none() {
            return Err(CatalogError::MissingReference {
                entity: "Item".to_string(),
                id: item_id,
            });
        }

        let observation = Observation {
            requester_id,
            item_id,
            rating,
            timestamp: Some(unix_now()),
        };
        index.insert_observation(observation);

        info!(
            "Added rating: requester={}, item={}, rating={}",
            requester_id, item_id, rating
        );
        Ok(observation)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
