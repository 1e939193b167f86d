//! Error types for the gym_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gym_core operations
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

    /// Input failed validation (negative weight/reps, empty program name or rotation)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted in a state that forbids it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Referenced exercise/set/program no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store failure, surfaced to the caller unchanged
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
