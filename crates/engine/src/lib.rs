//! Engine crate for the Marquee recommendation service.
//!
//! This crate ties the catalog and the scorers together behind one explicitly
//! constructed `RecommendationEngine`, plus an async `RecommendationService`
//! facade and the environment-driven `EngineConfig`.

pub mod config;
pub mod error;
pub mod engine;
pub mod service;

pub use config::EngineConfig;
pub use engine::RecommendationEngine;
pub use error::{EngineError, Result};
pub use service::{RecommendationRequest, RecommendationResponse, RecommendationService};
