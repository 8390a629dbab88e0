//! Configuration loading for topicdiff.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/topicdiff/config.toml`
//! (platform equivalent via `directories`).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TopicDiffError;

/// Strategy used to pair topics of equal-size consecutive models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Repeatedly take the globally smallest remaining distance (default).
    /// Reproduces the legacy ordering.
    #[default]
    Greedy,
    /// Enumerate every permutation and keep the cheapest. Small inputs only.
    Exhaustive,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Greedy => "greedy",
            MatchStrategy::Exhaustive => "exhaustive",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = TopicDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(MatchStrategy::Greedy),
            "exhaustive" => Ok(MatchStrategy::Exhaustive),
            other => Err(TopicDiffError::InvalidInput(format!(
                "unknown match strategy: {other}"
            ))),
        }
    }
}

/// Alignment settings shared by the matcher, forest builder and term links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Matcher used when reordering equal-size runs
    #[serde(default)]
    pub matcher: MatchStrategy,

    /// Minimum child-term probability for a term link between a parent and child topic.
    /// Range: 0.0-1.0
    #[serde(default = "default_min_link_probability")]
    pub min_link_probability: f64,

    /// Number of most common terms reported for colour coding
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,

    /// Reject documents whose probabilities fall outside [0, 1] or whose
    /// topics total more than 1
    #[serde(default = "default_true")]
    pub validate_probabilities: bool,
}

fn default_min_link_probability() -> f64 {
    0.1
}

fn default_top_terms() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            matcher: MatchStrategy::default(),
            min_link_probability: default_min_link_probability(),
            top_terms: default_top_terms(),
            validate_probabilities: default_true(),
        }
    }
}

impl AlignmentConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_link_probability) {
            return Err(format!(
                "min_link_probability must be 0.0-1.0, got {}",
                self.min_link_probability
            ));
        }
        if self.top_terms == 0 {
            return Err("top_terms must be > 0".to_string());
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pretty: default_true(),
            alignment: AlignmentConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/topicdiff/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (TOPICDIFF_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, TopicDiffError> {
        let config_dir = ProjectDirs::from("", "", "topicdiff")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");
        let defaults = AlignmentConfig::default();

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .set_default("pretty", true)
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .set_default("alignment.matcher", defaults.matcher.as_str())
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .set_default("alignment.min_link_probability", defaults.min_link_probability)
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .set_default("alignment.top_terms", defaults.top_terms as i64)
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .set_default(
                "alignment.validate_probabilities",
                defaults.validate_probabilities,
            )
            .map_err(|e| TopicDiffError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: TOPICDIFF_LOG_LEVEL, TOPICDIFF_ALIGNMENT__TOP_TERMS, etc.
        builder = builder.add_source(
            Environment::with_prefix("TOPICDIFF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TopicDiffError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| TopicDiffError::Config(e.to_string()))?;

        settings
            .alignment
            .validate()
            .map_err(TopicDiffError::Config)?;

        Ok(settings)
    }
}
