//! # topicdiff-types
//!
//! Shared domain types for comparing topic-model runs.
//!
//! This crate defines the data structures every other topicdiff crate consumes:
//! - Terms and Topics: discrete distributions over vocabulary terms
//! - Models: one run of a topic-modeling process, in experiment order
//! - Settings: layered configuration for the alignment tools
//!
//! ## Usage
//!
//! ```rust
//! use topicdiff_types::ModelSequence;
//!
//! let models = ModelSequence::from_json_str(r#"[{"topics": [[["a", 1.0]]]}]"#).unwrap();
//! assert_eq!(models.total_topics(), 1);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod topic;

pub use config::{AlignmentConfig, MatchStrategy, Settings};
pub use error::TopicDiffError;
pub use model::{Model, ModelSequence, TopicRef, MASS_TOLERANCE};
pub use topic::{Term, Topic};
