//! # topicdiff-align
//!
//! Topic alignment across a sequence of topic-model runs.
//!
//! Topics are compared with the Hellinger distance. Two ways of relating
//! consecutive models are provided:
//!
//! - Column matching: a one-to-one assignment between equal-size runs, used to
//!   reorder topics so matched topics line up
//! - Alignment forest: each topic attaches to its nearest topic in the previous
//!   model, forming one tree per topic of the first model
//!
//! ## Features
//! - Greedy matcher reproducing legacy output, plus an exhaustive reference matcher
//! - Term links along forest edges for drawing connecting lines
//! - Common-term ranking for colour coding

pub mod aligner;
pub mod common_terms;
pub mod error;
pub mod forest;
pub mod links;
pub mod matching;
pub mod reorder;
pub mod similarity;

pub use aligner::{AlignmentReport, TopicAligner};
pub use common_terms::top_terms;
pub use error::AlignError;
pub use forest::{build_forest, AlignmentEdge, AlignmentForest, ForestNode, NodeId};
pub use links::{term_links, TermLink};
pub use matching::{
    match_columns, match_columns_exhaustive, match_columns_greedy, ColumnMapping,
};
pub use reorder::{pair_distances, reorder_runs};
pub use similarity::{distance_matrix, hellinger, topic_distance};
