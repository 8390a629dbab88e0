//! Alignment error types.

use thiserror::Error;

/// Errors that can occur while aligning topics across models.
#[derive(Debug, Error)]
pub enum AlignError {
    /// Data loading or validation error
    #[error(transparent)]
    Data(#[from] topicdiff_types::TopicDiffError),

    /// Distance matrix is not square or has ragged rows
    #[error("Distance matrix must be square: {0}")]
    MatrixShape(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model sequence has no models
    #[error("Model sequence is empty")]
    EmptySequence,

    /// A model with topics follows a model without any
    #[error("Model {model} has topics but model {previous} has none to align them to")]
    EmptyPredecessor {
        /// Model whose topics could not be attached
        model: usize,
        /// Empty predecessor model
        previous: usize,
    },
}
