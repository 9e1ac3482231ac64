//! Track-count mismatch.

use serde::{Deserialize, Serialize};

use crate::linking::TrackingInfo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MismatchRate {
    /// Number of ground-truth tracks (`N`)
    pub n_gt: usize,
    /// Number of predicted tracks (`N_`)
    pub n_pred: usize,
    /// `max(0, N - N_) / N`
    pub unmatched_rate: f64,
    /// `max(0, N_ - N) / N`
    pub fake_new_rate: f64,
}

/// Relative shortfall or surplus of predicted tracks.
///
/// Both rates are `0.0` when the ground truth has no tracks.
pub fn mismatch_rate(pred: &TrackingInfo, gt: &TrackingInfo) -> MismatchRate {
    let n_gt = gt.num_tracks();
    let n_pred = pred.num_tracks();

    let rate = |count: usize| {
        if n_gt > 0 {
            count as f64 / n_gt as f64
        } else {
            0.0
        }
    };

    MismatchRate {
        n_gt,
        n_pred,
        unmatched_rate: rate(n_gt.saturating_sub(n_pred)),
        fake_new_rate: rate(n_pred.saturating_sub(n_gt)),
    }
}
