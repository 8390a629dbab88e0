//! Model types and topic-model document loading.
//!
//! A data document is a JSON array of models in experiment order. Each model
//! carries its topics and, optionally, a precomputed distance matrix against
//! the previous model.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TopicDiffError;
use crate::topic::Topic;

/// Rounding slack allowed on a topic's total probability.
pub const MASS_TOLERANCE: f64 = 1e-6;

/// Address of a topic within a model sequence.
///
/// Displays as `"{model}-{topic}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicRef {
    /// Position of the model in the sequence
    pub model: usize,
    /// Position of the topic within its model
    pub topic: usize,
}

impl TopicRef {
    pub fn new(model: usize, topic: usize) -> Self {
        Self { model, topic }
    }
}

impl std::fmt::Display for TopicRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.model, self.topic)
    }
}

impl FromStr for TopicRef {
    type Err = TopicDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (model, topic) = s.split_once('-').ok_or_else(|| {
            TopicDiffError::InvalidInput(format!("topic reference must be MODEL-TOPIC, got {s}"))
        })?;
        let parse = |part: &str| {
            part.trim().parse::<usize>().map_err(|_| {
                TopicDiffError::InvalidInput(format!("invalid topic reference: {s}"))
            })
        };
        Ok(Self::new(parse(model)?, parse(topic)?))
    }
}

/// One run of the topic-modeling process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Topics in upstream order
    pub topics: Vec<Topic>,

    /// Precomputed distances from the previous model's topics (rows)
    /// to this model's topics (columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<Vec<f64>>>,
}

impl Model {
    /// Create a model without a precomputed distance matrix.
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics, diff: None }
    }

    /// Attach a precomputed distance matrix
    pub fn with_diff(mut self, diff: Vec<Vec<f64>>) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// An ordered sequence of models, as found in a topic-model data document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSequence {
    models: Vec<Model>,
}

impl ModelSequence {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    /// Parse a data document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TopicDiffError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a data document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TopicDiffError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a data document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TopicDiffError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Check that every probability is usable by the distance metric.
    ///
    /// Probabilities must always be finite and non-negative. With `strict`,
    /// they must also not exceed 1, and each topic's total over distinct terms
    /// must not exceed 1 (plus [`MASS_TOLERANCE`]).
    pub fn validate(&self, strict: bool) -> Result<(), TopicDiffError> {
        for (m, model) in self.models.iter().enumerate() {
            for (t, topic) in model.topics.iter().enumerate() {
                for term in &topic.terms {
                    let p = term.probability;
                    let in_range = if strict {
                        (0.0..=1.0).contains(&p)
                    } else {
                        p.is_finite() && p >= 0.0
                    };
                    if !in_range {
                        return Err(TopicDiffError::InvalidInput(format!(
                            "topic {} term '{}' has invalid probability {}",
                            TopicRef::new(m, t),
                            term.name,
                            p
                        )));
                    }
                }
                if strict {
                    let mass = topic.mass();
                    if mass > 1.0 + MASS_TOLERANCE {
                        return Err(TopicDiffError::InvalidInput(format!(
                            "topic {} has total probability {} above 1",
                            TopicRef::new(m, t),
                            mass
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a topic by reference.
    pub fn topic(&self, topic_ref: TopicRef) -> Option<&Topic> {
        self.models
            .get(topic_ref.model)
            .and_then(|m| m.topics.get(topic_ref.topic))
    }

    /// Sum of topic counts over all models.
    pub fn total_topics(&self) -> usize {
        self.models.iter().map(Model::len).sum()
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut [Model] {
        &mut self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }
}
