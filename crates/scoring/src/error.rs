use thiserror::Error;

/// Requests a scorer refuses to run.
///
/// Missing seeds or empty histories are not errors; they produce empty lists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, ScoringError>;
