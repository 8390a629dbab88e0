//! Error types for topic-model data handling.

use thiserror::Error;

/// Unified error type for loading and validating topic-model data.
#[derive(Debug, Error)]
pub enum TopicDiffError {
    /// I/O error while reading a data file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
