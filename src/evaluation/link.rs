//! One-step link agreement.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linking::LinkInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkEvaluation {
    /// Fraction of instances whose link agrees with the ground truth
    pub score: f64,
    /// Instances per frame transition
    pub num_insts: Vec<usize>,
    /// Agreeing instances per frame transition
    pub num_matched: Vec<usize>,
}

/// Compare predicted links with ground-truth links instance by instance.
///
/// Both link tables must index the instances of every frame identically:
/// instance `i` of frame `t` is the same mask in prediction and ground truth.
/// Frame counts and per-frame instance counts are checked; the identity of
/// the instances themselves cannot be and is the caller's responsibility.
///
/// The score is `0.0` when there are no instances at all.
pub fn evaluate_link(pred: &LinkInfo, gt: &LinkInfo) -> Result<LinkEvaluation> {
    if pred.len() != gt.len() {
        return Err(Error::ShapeMismatch {
            what: "frame transitions",
            expected: gt.len(),
            got: pred.len(),
        });
    }

    let mut num_insts = Vec::with_capacity(gt.len());
    let mut num_matched = Vec::with_capacity(gt.len());
    for (p, g) in pred.transitions().iter().zip(gt.transitions()) {
        if p.len() != g.len() {
            return Err(Error::ShapeMismatch {
                what: "instances in frame",
                expected: g.len(),
                got: p.len(),
            });
        }
        num_insts.push(g.len());
        num_matched.push(p.iter().zip(g).filter(|(a, b)| a == b).count());
    }

    let total: usize = num_insts.iter().sum();
    let matched: usize = num_matched.iter().sum();
    let score = if total > 0 {
        matched as f64 / total as f64
    } else {
        0.0
    };

    Ok(LinkEvaluation {
        score,
        num_insts,
        num_matched,
    })
}
