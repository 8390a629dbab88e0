//! Term and topic types.
//!
//! A topic is an ordered list of weighted terms. Upstream analysis drops
//! low-probability terms, so the listed probabilities rarely sum to 1.

use std::collections::HashSet;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A single vocabulary term and its probability within a topic.
///
/// On the wire a term is the tuple `[name, probability]` or
/// `[name, probability, colorHint]`. The object form
/// `{"name": .., "probability": .., "color": ..}` is also accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Vocabulary entry
    pub name: String,
    /// Probability of the term in its topic
    pub probability: f64,
    /// Optional display color hint
    pub color: Option<String>,
}

impl Term {
    /// Create a term without a color hint.
    pub fn new(name: impl Into<String>, probability: f64) -> Self {
        Self {
            name: name.into(),
            probability,
            color: None,
        }
    }

    /// Attach a color hint
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TermRepr {
    Pair(String, f64),
    Triple(String, f64, Option<String>),
    Object {
        name: String,
        probability: f64,
        #[serde(default)]
        color: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match TermRepr::deserialize(deserializer)? {
            TermRepr::Pair(name, probability) => Term {
                name,
                probability,
                color: None,
            },
            TermRepr::Triple(name, probability, color)
            | TermRepr::Object {
                name,
                probability,
                color,
            } => Term {
                name,
                probability,
                color,
            },
        })
    }
}

impl Serialize for Term {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.color.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.name)?;
        seq.serialize_element(&self.probability)?;
        if let Some(color) = &self.color {
            seq.serialize_element(color)?;
        }
        seq.end()
    }
}

/// A topic: a discrete probability distribution over a subset of the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic {
    /// Terms in upstream order (usually descending probability)
    pub terms: Vec<Term>,
}

impl Topic {
    /// Create a topic from a list of terms.
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// Build a topic from `(name, probability)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self {
            terms: pairs
                .into_iter()
                .map(|(name, probability)| Term::new(name, probability))
                .collect(),
        }
    }

    /// Number of listed terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the topic lists no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Probability of a term, if listed. The last occurrence wins on duplicates.
    pub fn probability_of(&self, name: &str) -> Option<f64> {
        self.terms
            .iter()
            .rev()
            .find(|t| t.name == name)
            .map(|t| t.probability)
    }

    /// Total probability over distinct term names, each at its last occurrence.
    pub fn mass(&self) -> f64 {
        let mut seen = HashSet::new();
        self.terms
            .iter()
            .filter(|t| seen.insert(t.name.as_str()))
            .filter_map(|t| self.probability_of(&t.name))
            .sum()
    }

    /// Iterate over the terms.
    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }
}
