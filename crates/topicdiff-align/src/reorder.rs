//! Topic reordering across runs with equal topic counts.
//!
//! Each run's topics are permuted so that position `k` holds the topic matched
//! to position `k` of the previous (already reordered) run. A run whose topic
//! count differs from its predecessor keeps its upstream order.

use std::mem;

use tracing::{debug, instrument};

use topicdiff_types::{MatchStrategy, Model, Topic};

use crate::error::AlignError;
use crate::matching::{match_columns, ColumnMapping};
use crate::similarity::distance_matrix;

/// Reorder topics in place; returns the mapping applied to each run.
///
/// The first run, and every run whose size differs from its predecessor,
/// gets `None`. A run's precomputed `diff` is used when its shape fits; its
/// rows are first permuted to follow the previous run's new order, and it is
/// rewritten to match the new order of both runs.
#[instrument(skip(models), fields(runs = models.len()))]
pub fn reorder_runs(
    models: &mut [Model],
    strategy: MatchStrategy,
) -> Result<Vec<Option<ColumnMapping>>, AlignError> {
    let mut mappings: Vec<Option<ColumnMapping>> = Vec::with_capacity(models.len());
    if models.is_empty() {
        return Ok(mappings);
    }
    mappings.push(None);

    for i in 1..models.len() {
        let (head, tail) = models.split_at_mut(i);
        let previous = &head[i - 1];
        let current = &mut tail[0];

        if previous.len() != current.len() {
            debug!(
                run = i,
                previous = previous.len(),
                current = current.len(),
                "Topic counts differ, keeping upstream order"
            );
            mappings.push(None);
            continue;
        }

        let supplied = supplied_diff(previous, current)
            .map(|diff| permute_rows(diff, mappings[i - 1].as_ref()));
        let rewrite_diff = supplied.is_some();
        let matrix =
            supplied.unwrap_or_else(|| distance_matrix(&previous.topics, &current.topics));

        let mapping = match_columns(&matrix, strategy)?;

        let mut old: Vec<Option<Topic>> = mem::take(&mut current.topics)
            .into_iter()
            .map(Some)
            .collect();
        current.topics = mapping.iter().filter_map(|j| old[j].take()).collect();

        if rewrite_diff {
            current.diff = Some(
                matrix
                    .iter()
                    .map(|row| mapping.iter().map(|j| row[j]).collect())
                    .collect(),
            );
        }

        debug!(run = i, mapping = ?mapping.as_slice(), "Reordered run");
        mappings.push(Some(mapping));
    }

    Ok(mappings)
}

/// Distances from `previous` to `current` in their upstream order.
///
/// Uses `current`'s precomputed `diff` when its shape fits, and computes the
/// matrix from the topics otherwise.
pub fn pair_distances(previous: &Model, current: &Model) -> Vec<Vec<f64>> {
    match supplied_diff(previous, current) {
        Some(diff) => diff.clone(),
        None => distance_matrix(&previous.topics, &current.topics),
    }
}

fn supplied_diff<'a>(previous: &Model, current: &'a Model) -> Option<&'a Vec<Vec<f64>>> {
    current
        .diff
        .as_ref()
        .filter(|diff| fits(diff, previous.len(), current.len()))
}

fn fits(diff: &[Vec<f64>], rows: usize, cols: usize) -> bool {
    diff.len() == rows && diff.iter().all(|row| row.len() == cols)
}

/// Rows follow the previous run's new order when it was reordered.
fn permute_rows(diff: &[Vec<f64>], mapping: Option<&ColumnMapping>) -> Vec<Vec<f64>> {
    match mapping {
        Some(mapping) => mapping.iter().map(|old| diff[old].clone()).collect(),
        None => diff.to_vec(),
    }
}
