//! topicdiff
//!
//! Aligns topics across a sequence of topic-model runs.
//!
//! # Usage
//!
//! ```bash
//! topicdiff forest data/topics.json --links
//! topicdiff match data/topics.json --strategy exhaustive
//! topicdiff distance data/topics.json 0-1 1-4
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/topicdiff/config.toml)
//! 3. Environment variables (TOPICDIFF_*)
//! 4. CLI flags

use anyhow::Result;

use topicdiff_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse_args())
}
