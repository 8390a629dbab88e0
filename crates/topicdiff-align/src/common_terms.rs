//! Most common terms across a model sequence.
//!
//! Views colour-code these terms so the same word can be followed from
//! model to model.

use std::collections::HashMap;

use topicdiff_types::ModelSequence;

/// Sum each term's probability over every topic of every model and return
/// the `n` largest totals, descending. Ties keep first-seen order.
pub fn top_terms(models: &ModelSequence, n: usize) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();

    for term in models
        .iter()
        .flat_map(|m| m.topics.iter())
        .flat_map(|t| t.iter())
    {
        match index.get(term.name.as_str()) {
            Some(&i) => totals[i].1 += term.probability,
            None => {
                index.insert(term.name.as_str(), totals.len());
                totals.push((term.name.as_str(), term.probability));
            }
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
        .into_iter()
        .take(n)
        .map(|(name, total)| (name.to_string(), total))
        .collect()
}
