//! topicdiff CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (distance, match, reorder, forest, top-terms)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{execute, load_settings, run};
