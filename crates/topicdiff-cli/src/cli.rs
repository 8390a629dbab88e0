//! CLI argument parsing for topicdiff.
//!
//! Global flags override the config file and environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use topicdiff_types::{MatchStrategy, TopicRef};

/// Topic-model comparison tools
///
/// Aligns topics across a sequence of topic-model runs and prints JSON.
#[derive(Parser, Debug)]
#[command(name = "topicdiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/topicdiff/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Print compact JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Alignment commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Hellinger distance between two topics
    Distance {
        /// Topic-model JSON document
        file: PathBuf,

        /// First topic (MODEL-TOPIC, e.g. 0-3)
        a: TopicRef,

        /// Second topic (MODEL-TOPIC)
        b: TopicRef,
    },

    /// Column mapping between each pair of equal-size consecutive models.
    /// A model's supplied diff is used when its shape fits, as in `reorder`.
    Match {
        /// Topic-model JSON document
        file: PathBuf,

        /// Matcher (greedy, exhaustive)
        #[arg(short, long)]
        strategy: Option<MatchStrategy>,
    },

    /// Reorder equal-size runs so matched topics line up
    Reorder {
        /// Topic-model JSON document
        file: PathBuf,

        /// Matcher (greedy, exhaustive)
        #[arg(short, long)]
        strategy: Option<MatchStrategy>,
    },

    /// Build the alignment forest
    Forest {
        /// Topic-model JSON document
        file: PathBuf,

        /// Include term links along edges
        #[arg(long)]
        links: bool,

        /// Minimum child-term probability for a link
        #[arg(long)]
        min_prob: Option<f64>,
    },

    /// Most common terms across all models
    TopTerms {
        /// Topic-model JSON document
        file: PathBuf,

        /// Number of terms
        #[arg(short, long)]
        n: Option<usize>,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_distance() {
        let cli = Cli::parse_from(["topicdiff", "distance", "topics.json", "0-1", "2-3"]);
        match cli.command {
            Commands::Distance { file, a, b } => {
                assert_eq!(file, PathBuf::from("topics.json"));
                assert_eq!(a, TopicRef::new(0, 1));
                assert_eq!(b, TopicRef::new(2, 3));
            }
            _ => panic!("Expected Distance command"),
        }
    }

    #[test]
    fn test_cli_distance_rejects_bad_ref() {
        let result = Cli::try_parse_from(["topicdiff", "distance", "topics.json", "0", "1-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_match_strategy() {
        let cli = Cli::parse_from(["topicdiff", "match", "topics.json", "-s", "exhaustive"]);
        match cli.command {
            Commands::Match { strategy, .. } => {
                assert_eq!(strategy, Some(MatchStrategy::Exhaustive))
            }
            _ => panic!("Expected Match command"),
        }
    }

    #[test]
    fn test_cli_forest_flags() {
        let cli = Cli::parse_from([
            "topicdiff",
            "forest",
            "topics.json",
            "--links",
            "--min-prob",
            "0.2",
        ]);
        match cli.command {
            Commands::Forest {
                links, min_prob, ..
            } => {
                assert!(links);
                assert_eq!(min_prob, Some(0.2));
            }
            _ => panic!("Expected Forest command"),
        }
    }

    #[test]
    fn test_cli_top_terms() {
        let cli = Cli::parse_from(["topicdiff", "top-terms", "topics.json", "-n", "5"]);
        assert!(matches!(cli.command, Commands::TopTerms { n: Some(5), .. }));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "topicdiff",
            "reorder",
            "topics.json",
            "--config",
            "/path/to/config.toml",
            "-l",
            "debug",
            "--compact",
        ]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(cli.compact);
    }
}
