//! Topic dissimilarity functions.
//!
//! Topics are compared with the Hellinger distance over the union of their
//! listed terms. Inputs are not validated here; see
//! [`ModelSequence::validate`](topicdiff_types::ModelSequence::validate).

use std::collections::HashMap;

use topicdiff_types::Topic;

/// Calculate the Hellinger distance between two aligned discrete distributions.
///
/// Returns a value in [0.0, 1.0] when both inputs are probability vectors
/// summing to at most 1. Negative entries yield `NaN`.
///
/// # Panics
/// Panics if vectors have different lengths.
pub fn hellinger(p: &[f64], q: &[f64]) -> f64 {
    assert_eq!(p.len(), q.len(), "Distributions must have same length");

    let sum: f64 = p
        .iter()
        .zip(q.iter())
        .map(|(a, b)| (a.sqrt() - b.sqrt()).powi(2))
        .sum();

    (0.5 * sum).sqrt()
}

/// Compare two topics using the Hellinger distance.
///
/// Both topics are projected onto the union of their term names (first
/// appearance order, `a` before `b`); a term missing from a topic counts as
/// probability 0. When a name repeats inside one topic, its last probability wins.
pub fn topic_distance(a: &Topic, b: &Topic) -> f64 {
    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    for term in a.iter().chain(b.iter()) {
        let next = vocabulary.len();
        vocabulary.entry(term.name.as_str()).or_insert(next);
    }

    let p = to_vector(a, &vocabulary);
    let q = to_vector(b, &vocabulary);
    hellinger(&p, &q)
}

fn to_vector(topic: &Topic, vocabulary: &HashMap<&str, usize>) -> Vec<f64> {
    let mut vector = vec![0.0; vocabulary.len()];
    for term in topic.iter() {
        if let Some(&i) = vocabulary.get(term.name.as_str()) {
            vector[i] = term.probability;
        }
    }
    vector
}

/// Calculate the distance matrix between two topic sets.
///
/// Rows follow `previous`, columns follow `current`.
pub fn distance_matrix(previous: &[Topic], current: &[Topic]) -> Vec<Vec<f64>> {
    previous
        .iter()
        .map(|p| current.iter().map(|c| topic_distance(p, c)).collect())
        .collect()
}
