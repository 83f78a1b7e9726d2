//! Error types for Smart Search
//!
//! Ranking, matching, suggestions and filtering are total and never fail.
//! These errors only come from the surfaces around them: loading
//! configuration and records, validating options, and writing history.

use thiserror::Error;

/// Smart Search error type
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Search options failed validation
    #[error("Invalid search options: {0}")]
    InvalidOptions(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Smart Search operations
pub type Result<T> = std::result::Result<T, Error>;
