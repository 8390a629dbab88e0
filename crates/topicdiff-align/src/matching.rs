//! Column matching between equal-size topic sets.
//!
//! Given a square distance matrix (rows = previous model's topics,
//! columns = current model's topics), find a one-to-one assignment so the
//! current topics can be drawn under their closest previous topics.
//!
//! ## Strategies
//!
//! - **Greedy**: repeatedly fix the globally smallest remaining cell. Ties go to
//!   the first cell in row-major order. Not optimal, but reproduces legacy output.
//! - **Exhaustive**: enumerate every permutation and keep the cheapest total.
//!   Used as a reference on small inputs.

use serde::Serialize;
use tracing::debug;

use topicdiff_types::MatchStrategy;

use crate::error::AlignError;

/// Largest matrix accepted by the exhaustive matcher (9! permutations).
pub const MAX_EXHAUSTIVE_SIZE: usize = 9;

/// Assignment from new position (row) to old column index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping(Vec<usize>);

impl ColumnMapping {
    pub fn new(mapping: Vec<usize>) -> Self {
        Self(mapping)
    }

    /// Old column index for a new position.
    pub fn get(&self, new_index: usize) -> Option<usize> {
        self.0.get(new_index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Check that every old index appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &old in &self.0 {
            match seen.get_mut(old) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Sum of the matrix cells selected by this mapping.
    ///
    /// Returns `None` if the matrix lacks a selected cell.
    pub fn total_cost(&self, matrix: &[Vec<f64>]) -> Option<f64> {
        self.0
            .iter()
            .enumerate()
            .map(|(row, &col)| matrix.get(row).and_then(|r| r.get(col)).copied())
            .sum()
    }
}

/// Check that a matrix is square with comparable entries; returns its size.
fn validate_square(matrix: &[Vec<f64>]) -> Result<usize, AlignError> {
    let n = matrix.len();
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(AlignError::MatrixShape(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if let Some(j) = row.iter().position(|v| v.is_nan()) {
            return Err(AlignError::InvalidInput(format!(
                "distance at ({i}, {j}) is NaN"
            )));
        }
    }
    Ok(n)
}

/// Match columns with the given strategy.
pub fn match_columns(
    matrix: &[Vec<f64>],
    strategy: MatchStrategy,
) -> Result<ColumnMapping, AlignError> {
    match strategy {
        MatchStrategy::Greedy => match_columns_greedy(matrix),
        MatchStrategy::Exhaustive => match_columns_exhaustive(matrix),
    }
}

/// Greedy matching: pick the lowest distance, fix that pair, then pick the
/// next lowest that involves neither, and so on.
///
/// The last row and column left over are paired without a search.
pub fn match_columns_greedy(matrix: &[Vec<f64>]) -> Result<ColumnMapping, AlignError> {
    let n = validate_square(matrix)?;
    let mut rows: Vec<usize> = (0..n).collect();
    let mut cols: Vec<usize> = (0..n).collect();
    let mut mapping = vec![0; n];

    for _ in 1..n {
        // (position in rows, position in cols, value)
        let mut best: Option<(usize, usize, f64)> = None;
        for (ri, &r) in rows.iter().enumerate() {
            for (ci, &c) in cols.iter().enumerate() {
                let value = matrix[r][c];
                if best.map_or(true, |(_, _, min)| value < min) {
                    best = Some((ri, ci, value));
                }
            }
        }

        let Some((ri, ci, value)) = best else {
            return Err(AlignError::InvalidInput(
                "no unassigned cells left".to_string(),
            ));
        };
        let row = rows.remove(ri);
        let col = cols.remove(ci);
        mapping[row] = col;
        debug!(row, col, value, "Fixed greedy pair");
    }

    if let (Some(&row), Some(&col)) = (rows.first(), cols.first()) {
        debug_assert_eq!(rows.len(), 1);
        debug_assert_eq!(cols.len(), 1);
        mapping[row] = col;
    }

    Ok(ColumnMapping(mapping))
}

/// Exhaustive matching: the permutation with the smallest total distance.
///
/// Permutations are visited in lexicographic order and the first minimum wins.
pub fn match_columns_exhaustive(matrix: &[Vec<f64>]) -> Result<ColumnMapping, AlignError> {
    let n = validate_square(matrix)?;
    if n > MAX_EXHAUSTIVE_SIZE {
        return Err(AlignError::InvalidInput(format!(
            "exhaustive matching supports at most {MAX_EXHAUSTIVE_SIZE} topics, got {n}"
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut best = permutation.clone();
    let mut best_cost = cost(matrix, &permutation);

    while next_permutation(&mut permutation) {
        let c = cost(matrix, &permutation);
        if c < best_cost {
            best_cost = c;
            best.clone_from(&permutation);
        }
    }

    debug!(n, cost = best_cost, "Exhaustive matching finished");
    Ok(ColumnMapping(best))
}

fn cost(matrix: &[Vec<f64>], permutation: &[usize]) -> f64 {
    permutation
        .iter()
        .enumerate()
        .map(|(row, &col)| matrix[row][col])
        .sum()
}

/// Advance to the next lexicographic permutation; false once the last one is reached.
fn next_permutation(values: &mut [usize]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = values
        .iter()
        .rposition(|&v| v > values[pivot])
        .unwrap_or(pivot + 1);
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(rng: &mut StdRng, n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| (0..n).map(|_| rng.random::<f64>()).collect())
            .collect()
    }

    #[test]
    fn test_greedy_clear_minimum() {
        let matrix = vec![vec![0.0, 5.0], vec![5.0, 0.0]];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_greedy_single() {
        let mapping = match_columns_greedy(&[vec![0.7]]).unwrap();
        assert_eq!(mapping.as_slice(), &[0]);
    }

    #[test]
    fn test_greedy_empty() {
        let mapping = match_columns_greedy(&[]).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_greedy_swaps_columns() {
        let matrix = vec![vec![2.0, 0.0], vec![0.0, 2.0]];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_greedy_all_ties_row_major() {
        let matrix = vec![vec![1.0; 3]; 3];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_greedy_tie_break_first_in_scan() {
        // (0,1) and (1,0) both hold the minimum; (0,1) is scanned first
        let matrix = vec![
            vec![5.0, 1.0, 9.0],
            vec![1.0, 8.0, 7.0],
            vec![6.0, 4.0, 2.0],
        ];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[1, 0, 2]);
    }

    #[test]
    fn test_greedy_last_pair_uses_remaining_row() {
        // The leftover row is 1, not the last row
        let matrix = vec![
            vec![5.0, 5.0, 5.0],
            vec![5.0, 5.0, 5.0],
            vec![0.0, 5.0, 5.0],
        ];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[1, 2, 0]);
        assert!(mapping.is_bijection());
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0, 10.0]];
        let greedy = match_columns_greedy(&matrix).unwrap();
        let optimal = match_columns_exhaustive(&matrix).unwrap();
        assert_eq!(greedy.as_slice(), &[0, 1]);
        assert_eq!(optimal.as_slice(), &[1, 0]);
        assert!(optimal.total_cost(&matrix).unwrap() < greedy.total_cost(&matrix).unwrap());
    }

    #[test]
    fn test_greedy_handles_infinite_distances() {
        let matrix = vec![vec![f64::INFINITY; 2]; 2];
        let mapping = match_columns_greedy(&matrix).unwrap();
        assert_eq!(mapping.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_rejects_non_square() {
        let matrix = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 2.0]];
        assert!(matches!(
            match_columns_greedy(&matrix),
            Err(AlignError::MatrixShape(_))
        ));
        assert!(matches!(
            match_columns_exhaustive(&matrix),
            Err(AlignError::MatrixShape(_))
        ));
    }

    #[test]
    fn test_rejects_ragged() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(
            match_columns_greedy(&matrix),
            Err(AlignError::MatrixShape(_))
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let matrix = vec![vec![0.0, f64::NAN], vec![1.0, 0.0]];
        assert!(matches!(
            match_columns_greedy(&matrix),
            Err(AlignError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exhaustive_rejects_large() {
        let matrix = vec![vec![0.0; MAX_EXHAUSTIVE_SIZE + 1]; MAX_EXHAUSTIVE_SIZE + 1];
        assert!(matches!(
            match_columns_exhaustive(&matrix),
            Err(AlignError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_greedy_totality_and_determinism() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..12 {
            let matrix = random_matrix(&mut rng, n);
            let first = match_columns_greedy(&matrix).unwrap();
            let second = match_columns_greedy(&matrix).unwrap();
            assert_eq!(first.len(), n);
            assert!(first.is_bijection(), "not a bijection: {first:?}");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_exhaustive_never_worse_than_greedy() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 1..7 {
            let matrix = random_matrix(&mut rng, n);
            let greedy = match_columns_greedy(&matrix).unwrap();
            let optimal = match_columns_exhaustive(&matrix).unwrap();
            assert!(optimal.is_bijection());
            assert!(
                optimal.total_cost(&matrix).unwrap()
                    <= greedy.total_cost(&matrix).unwrap() + 1e-12
            );
        }
    }

    #[test]
    fn test_match_columns_dispatch() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0, 10.0]];
        assert_eq!(
            match_columns(&matrix, MatchStrategy::Greedy).unwrap().as_slice(),
            &[0, 1]
        );
        assert_eq!(
            match_columns(&matrix, MatchStrategy::Exhaustive)
                .unwrap()
                .as_slice(),
            &[1, 0]
        );
    }

    #[test]
    fn test_next_permutation_order() {
        let mut values = vec![0, 1, 2];
        let mut seen = vec![values.clone()];
        while next_permutation(&mut values) {
            seen.push(values.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_is_bijection() {
        assert!(ColumnMapping::new(vec![2, 0, 1]).is_bijection());
        assert!(!ColumnMapping::new(vec![0, 0, 1]).is_bijection());
        assert!(!ColumnMapping::new(vec![0, 3]).is_bijection());
    }

    #[test]
    fn test_total_cost_short_matrix() {
        let mapping = ColumnMapping::new(vec![1, 0]);
        let matrix = vec![vec![0.5, 0.25], vec![0.75, 0.5]];
        assert_eq!(mapping.total_cost(&matrix), Some(1.0));
        assert_eq!(mapping.total_cost(&matrix[..1]), None);
        assert_eq!(mapping.total_cost(&[vec![0.5], vec![0.5]]), None);
    }
}
