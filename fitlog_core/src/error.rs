//! Error types for the fitlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitlog_core operations
///
/// The estimator and aggregation engine never produce these; they only
/// come out of the persistence, configuration and input-validation edges.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A date key that is not `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Exercise key not present in the catalog
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// Negative or non-finite logged quantity
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Non-positive or non-finite body measurements
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Date outside the editable history window
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
