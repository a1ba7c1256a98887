//! Error types for the catalog crate.
//!
//! Loading errors carry enough context (file, line, column) to point at the
//! offending record. Scoring never produces these; they only surface while the
//! store is being built or mutated.

use thiserror::Error;

/// Errors that can occur while loading, validating or mutating the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A record has a different number of fields than the header
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// A required column is absent from the header row
    #[error("Missing column in {file}: expected one of [{candidates}]")]
    MissingColumn { file: String, candidates: String },

    /// Referenced entity doesn't exist (e.g., observation for an unknown item)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A writer panicked while holding the store lock
    #[error("Catalog lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
