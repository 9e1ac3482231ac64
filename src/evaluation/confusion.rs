//! Per-track accuracy from a frame-level confusion matrix.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linking::{TrackingInfo, max_weight_assignment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionEvaluation {
    /// `N x max(N, N_)` frame co-occurrence counts; columns past `N_` are padding
    pub confusion: Array2<usize>,
    /// Predicted track assigned to each ground-truth track
    pub track_match: Vec<Option<usize>>,
    /// Frames on which each ground-truth track agrees with its assigned track
    pub num_matched: Vec<usize>,
    /// `num_matched / lifetime length` per ground-truth track
    pub track_rate: Vec<f64>,
    /// Mean of `track_rate`
    pub track_score: f64,
}

/// Score predicted tracks against ground-truth tracks.
///
/// Cell `(u, k)` counts the frames where ground-truth track `u` and predicted
/// track `k` are present on the same instance. Ground-truth tracks are then
/// assigned to predicted tracks so that the total count is maximal; when
/// there are fewer predicted tracks, the surplus ground-truth tracks are
/// assigned to zero padding columns.
///
/// Scoring a table against itself gives `track_score == 1.0` only when the
/// table has at least one track and every track is present in some frame;
/// an empty table, or a track that is never present, contributes `0.0`.
pub fn confusion(pred: &TrackingInfo, gt: &TrackingInfo) -> Result<ConfusionEvaluation> {
    if pred.num_frames() != gt.num_frames() {
        return Err(Error::ShapeMismatch {
            what: "frame count",
            expected: gt.num_frames(),
            got: pred.num_frames(),
        });
    }

    let n_gt = gt.num_tracks();
    let n_pred = pred.num_tracks();
    let mut confusion = Array2::<usize>::zeros((n_gt, n_pred.max(n_gt)));

    for t in 0..gt.num_frames() {
        for u in 0..n_gt {
            let Some(instance) = gt.get(t, u) else { continue };
            for k in 0..n_pred {
                if pred.get(t, k) == Some(instance) {
                    confusion[[u, k]] += 1;
                }
            }
        }
    }

    let weights = confusion.mapv(|c| c as f64);
    let mut track_match = vec![None; n_gt];
    for (u, k) in max_weight_assignment(&weights).matches {
        if k < n_pred {
            track_match[u] = Some(k);
        }
    }

    let num_matched: Vec<usize> = track_match
        .iter()
        .enumerate()
        .map(|(u, k)| k.map_or(0, |k| confusion[[u, k]]))
        .collect();

    let track_rate: Vec<f64> = num_matched
        .iter()
        .enumerate()
        .map(|(u, &matched)| match gt.lifetime_len(u) {
            0 => 0.0,
            len => matched as f64 / len as f64,
        })
        .collect();

    let track_score = if track_rate.is_empty() {
        0.0
    } else {
        track_rate.iter().sum::<f64>() / track_rate.len() as f64
    };

    Ok(ConfusionEvaluation {
        confusion,
        track_match,
        num_matched,
        track_rate,
        track_score,
    })
}
