//! Command implementations for topicdiff.
//!
//! Every command loads a topic-model document, runs one alignment operation
//! and writes JSON to the given writer. Logs go to stderr.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use topicdiff_align::{
    match_columns, pair_distances, topic_distance, ColumnMapping, TopicAligner,
};
use topicdiff_types::{ModelSequence, Settings};

use crate::cli::{Cli, Commands};

/// Mapping between one pair of consecutive models.
#[derive(Debug, Serialize)]
struct PairMatch {
    previous: usize,
    current: usize,
    mapping: ColumnMapping,
    total_cost: f64,
}

/// Load settings, apply CLI overrides, install logging and run the command.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &settings, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Load configuration (defaults -> file -> env -> CLI).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }
    if cli.compact {
        settings.pretty = false;
    }
    Ok(settings)
}

fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn load_models(path: &Path) -> Result<ModelSequence> {
    let models = ModelSequence::from_path(path)
        .with_context(|| format!("Failed to read topic models from {}", path.display()))?;
    info!(
        path = %path.display(),
        models = models.len(),
        topics = models.total_topics(),
        "Loaded topic models"
    );
    Ok(models)
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Run a single command against already-loaded settings.
pub fn execute<W: Write>(command: &Commands, settings: &Settings, out: &mut W) -> Result<()> {
    let mut config = settings.alignment.clone();

    match command {
        Commands::Distance { file, a, b } => {
            let models = load_models(file)?;
            TopicAligner::new(config).check(&models)?;

            let topic_a = models
                .topic(*a)
                .ok_or_else(|| anyhow!("Topic {a} not found"))?;
            let topic_b = models
                .topic(*b)
                .ok_or_else(|| anyhow!("Topic {b} not found"))?;

            let distance = topic_distance(topic_a, topic_b);
            write_json(
                out,
                &serde_json::json!({ "a": a, "b": b, "distance": distance }),
                settings.pretty,
            )
        }
        Commands::Match { file, strategy } => {
            let models = load_models(file)?;
            let strategy = strategy.unwrap_or(config.matcher);
            TopicAligner::new(config).check(&models)?;

            let mut pairs = Vec::new();
            for (i, window) in models.models().windows(2).enumerate() {
                let (previous, current) = (&window[0], &window[1]);
                if previous.len() != current.len() {
                    debug!(previous = i, current = i + 1, "Skipping unequal pair");
                    continue;
                }
                let matrix = pair_distances(previous, current);
                let mapping = match_columns(&matrix, strategy)
                    .with_context(|| format!("Failed to match model {} to {}", i, i + 1))?;
                let total_cost = mapping
                    .total_cost(&matrix)
                    .ok_or_else(|| anyhow!("Mapping does not fit model {} to {}", i, i + 1))?;
                pairs.push(PairMatch {
                    previous: i,
                    current: i + 1,
                    mapping,
                    total_cost,
                });
            }
            write_json(out, &pairs, settings.pretty)
        }
        Commands::Reorder { file, strategy } => {
            let mut models = load_models(file)?;
            if let Some(strategy) = strategy {
                config.matcher = *strategy;
            }
            let mappings = TopicAligner::new(config)
                .reorder(&mut models)
                .context("Failed to reorder runs")?;
            info!(
                reordered = mappings.iter().filter(|m| m.is_some()).count(),
                "Reordered runs"
            );
            write_json(out, &models, settings.pretty)
        }
        Commands::Forest {
            file,
            links,
            min_prob,
        } => {
            let models = load_models(file)?;
            if let Some(min_prob) = min_prob {
                config.min_link_probability = *min_prob;
            }
            config.validate().map_err(|e| anyhow!(e))?;

            let mut report = TopicAligner::new(config)
                .report(&models)
                .context("Failed to build alignment forest")?;
            if !links {
                report.links.clear();
            }
            write_json(out, &report, settings.pretty)
        }
        Commands::TopTerms { file, n } => {
            let models = load_models(file)?;
            if let Some(n) = n {
                config.top_terms = *n;
            }
            config.validate().map_err(|e| anyhow!(e))?;
            write_json(
                out,
                &topicdiff_align::top_terms(&models, config.top_terms),
                settings.pretty,
            )
        }
    }
}
