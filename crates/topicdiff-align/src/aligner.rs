//! Configured entry point for aligning a model sequence.

use serde::Serialize;
use tracing::{info, instrument};

use topicdiff_types::{AlignmentConfig, ModelSequence, TopicRef};

use crate::common_terms::top_terms;
use crate::error::AlignError;
use crate::forest::{build_forest, AlignmentEdge, AlignmentForest};
use crate::links::{term_links, TermLink};
use crate::matching::ColumnMapping;
use crate::reorder::reorder_runs;

/// Everything a topic-diff view needs to draw a model sequence.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    /// Parent/child edges, breadth-first
    pub edges: Vec<AlignmentEdge>,
    /// Drawing order of each model's topics
    pub layers: Vec<Vec<TopicRef>>,
    /// Shared terms along the edges
    pub links: Vec<TermLink>,
    /// Most common terms, for colour coding
    pub top_terms: Vec<(String, f64)>,
}

/// Runs the alignment operations with one [`AlignmentConfig`].
#[derive(Debug, Clone, Default)]
pub struct TopicAligner {
    config: AlignmentConfig,
}

impl TopicAligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Validate probabilities when the config asks for it.
    pub fn check(&self, models: &ModelSequence) -> Result<(), AlignError> {
        if self.config.validate_probabilities {
            models.validate(true)?;
        }
        Ok(())
    }

    /// Build the forest for a sequence.
    pub fn forest(&self, models: &ModelSequence) -> Result<AlignmentForest, AlignError> {
        self.check(models)?;
        build_forest(models)
    }

    /// Reorder equal-size runs with the configured matcher.
    pub fn reorder(
        &self,
        models: &mut ModelSequence,
    ) -> Result<Vec<Option<ColumnMapping>>, AlignError> {
        self.check(models)?;
        reorder_runs(models.models_mut(), self.config.matcher)
    }

    /// Forest, drawing order, term links and common terms in one pass.
    #[instrument(skip(self, models))]
    pub fn report(&self, models: &ModelSequence) -> Result<AlignmentReport, AlignError> {
        let forest = self.forest(models)?;
        let layers = (0..models.len()).map(|m| forest.layer(m)).collect();
        let links = term_links(&forest, models, self.config.min_link_probability);

        info!(
            models = models.len(),
            topics = forest.len(),
            links = links.len(),
            "Aligned model sequence"
        );

        Ok(AlignmentReport {
            edges: forest.edges(),
            layers,
            links,
            top_terms: top_terms(models, self.config.top_terms),
        })
    }
}
