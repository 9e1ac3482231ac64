//! Scoring of linked series against ground truth.
//!
//! The three scores are independent reads of frozen structures;
//! [`TrackingEvaluation::evaluate`] computes all of them at once.

mod confusion;
mod link;
mod mismatch;

pub use confusion::{ConfusionEvaluation, confusion};
pub use link::{LinkEvaluation, evaluate_link};
pub use mismatch::{MismatchRate, mismatch_rate};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::linking::{LinkInfo, TrackingInfo};

/// Every tracking score for one predicted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvaluation {
    pub link: LinkEvaluation,
    pub mismatch: MismatchRate,
    pub confusion: ConfusionEvaluation,
}

impl TrackingEvaluation {
    /// Score predicted links and tracks against their ground-truth
    /// counterparts.
    ///
    /// With the `parallel` feature the link and track scores run
    /// concurrently.
    pub fn evaluate(
        pred_li: &LinkInfo,
        pred_ti: &TrackingInfo,
        gt_li: &LinkInfo,
        gt_ti: &TrackingInfo,
    ) -> Result<Self> {
        let (link, tracks) = run_pair(
            || evaluate_link(pred_li, gt_li),
            || confusion(pred_ti, gt_ti),
        );

        Ok(Self {
            link: link?,
            mismatch: mismatch_rate(pred_ti, gt_ti),
            confusion: tracks?,
        })
    }
}

#[cfg(feature = "parallel")]
fn run_pair<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn run_pair<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}
