//! Optimal assignment between the instances of two frames.

use ndarray::{Array2, Axis};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_rows: Vec<usize>,
    pub unmatched_cols: Vec<usize>,
}

/// Solve the assignment that maximizes the total weight of matched pairs.
///
/// The matrix may be rectangular; it is padded to a square with zero-weight
/// entries, and pairs landing on padding are reported as unmatched. Every row
/// and column appears in exactly one of `matches` or the unmatched lists.
/// Ties are resolved by the solver's row/column order, so results are
/// reproducible for identical inputs.
pub fn max_weight_assignment(weights: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = weights.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_rows: (0..num_rows).collect(),
            unmatched_cols: (0..num_cols).collect(),
        };
    }

    if num_rows == 1 && num_cols == 1 {
        return AssignmentResult {
            matches: vec![(0, 0)],
            ..Default::default()
        };
    }

    let max_weight = weights.iter().copied().fold(0.0_f64, f64::max);
    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), max_weight);

    for ((i, j), &w) in weights.indexed_iter() {
        padded[[i, j]] = max_weight - w;
    }

    let mut matches = vec![];
    let mut unmatched_rows = vec![];
    let mut unmatched_cols_mask: Vec<bool> = vec![true; num_cols];

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx >= num_cols {
                    unmatched_rows.push(row_idx);
                } else {
                    matches.push((row_idx, col_idx));
                    unmatched_cols_mask[col_idx] = false;
                }
            }
        }
        Err(e) => {
            warn!(
                rows = num_rows,
                cols = num_cols,
                error = ?e,
                "assignment solver failed; leaving all rows unmatched"
            );
            unmatched_rows = (0..num_rows).collect();
        }
    }

    let unmatched_cols: Vec<usize> = unmatched_cols_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { Some(i) } else { None })
        .collect();

    AssignmentResult {
        matches,
        unmatched_rows,
        unmatched_cols,
    }
}

/// Turn an overlap matrix into one-step links under `threshold`.
///
/// Columns whose best overlap with any row is below `threshold` (or zero) are
/// removed before solving, so they can never absorb a forced low-quality
/// match. Solved pairs are kept only if their overlap is positive and at least
/// `threshold`. Rows without an accepted pair map to `None`.
///
/// `threshold` is assumed to be in `[0, 1]`; [`LinkerConfig`] guarantees it.
///
/// [`LinkerConfig`]: crate::linking::LinkerConfig
pub fn link_by_weights(weights: &Array2<f64>, threshold: f64) -> Vec<Option<usize>> {
    let (num_rows, num_cols) = weights.dim();
    let mut links = vec![None; num_rows];

    let candidates: Vec<usize> = (0..num_cols)
        .filter(|&j| {
            let best = weights.column(j).iter().copied().fold(0.0_f64, f64::max);
            best > 0.0 && best >= threshold
        })
        .collect();

    if num_rows == 0 || candidates.is_empty() {
        debug!(
            rows = num_rows,
            cols = num_cols,
            "empty candidate pool; no links for this pair"
        );
        return links;
    }

    let pruned = weights.select(Axis(1), &candidates);
    for (i, k) in max_weight_assignment(&pruned).matches {
        let j = candidates[k];
        let w = weights[[i, j]];
        if w > 0.0 && w >= threshold {
            links[i] = Some(j);
        }
    }
    links
}
