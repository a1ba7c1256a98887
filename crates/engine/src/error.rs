use catalog::CatalogError;
use scoring::ScoringError;
use thiserror::Error;

/// Errors surfaced to callers of the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Loading, locking or mutating the catalog failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A scorer rejected the request (e.g. hybrid with no inputs)
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// A blocking scoring task panicked or was cancelled
    #[error("Scoring task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Whether the caller sent a request that can never succeed as-is
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            EngineError::Scoring(ScoringError::InvalidRequest(_)) | EngineError::InvalidObservation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
