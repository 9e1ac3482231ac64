//! Pairwise overlap scores between two frames' instance masks.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linking::mask::MaskStack;

/// Overlap score used as the edge weight between instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlapMode {
    /// Intersection over union.
    #[default]
    #[serde(rename = "IOU", alias = "iou")]
    Iou,
    /// Intersection over the area of the first (earlier) operand.
    #[serde(rename = "IOS", alias = "ios")]
    Ios,
}

impl FromStr for OverlapMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IOU" => Ok(Self::Iou),
            "IOS" => Ok(Self::Ios),
            other => Err(Error::Configuration(format!(
                "unsupported overlap mode {other:?}, expected IOU or IOS"
            ))),
        }
    }
}

impl fmt::Display for OverlapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iou => write!(f, "IOU"),
            Self::Ios => write!(f, "IOS"),
        }
    }
}

/// Both overlap matrices for one pair of frames, shape `(n1, n2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlaps {
    pub iou: Array2<f64>,
    pub ios: Array2<f64>,
}

impl Overlaps {
    /// Compute IoU and IoS between every mask of `first` and every mask of
    /// `second` in a single pass over the intersections.
    pub fn compute(first: &MaskStack, second: &MaskStack) -> Result<Self> {
        let counts = PairCounts::new(first, second)?;
        counts.require_nonempty_first()?;
        Ok(Self {
            iou: counts.iou(),
            ios: counts.ios(),
        })
    }

    /// The matrix for `mode`.
    pub fn get(&self, mode: OverlapMode) -> &Array2<f64> {
        match mode {
            OverlapMode::Iou => &self.iou,
            OverlapMode::Ios => &self.ios,
        }
    }
}

/// Compute the `(n1, n2)` overlap matrix for `mode` only.
///
/// A frame without instances yields a zero-sized matrix. In `Ios` mode every
/// mask of `first` must be non-empty.
pub fn overlap_matrix(
    mode: OverlapMode,
    first: &MaskStack,
    second: &MaskStack,
) -> Result<Array2<f64>> {
    let counts = PairCounts::new(first, second)?;
    match mode {
        OverlapMode::Iou => Ok(counts.iou()),
        OverlapMode::Ios => {
            counts.require_nonempty_first()?;
            Ok(counts.ios())
        }
    }
}

/// Areas and intersection counts shared by both scores.
struct PairCounts {
    areas1: Vec<usize>,
    areas2: Vec<usize>,
    inter: Array2<usize>,
}

impl PairCounts {
    fn new(first: &MaskStack, second: &MaskStack) -> Result<Self> {
        if first.height() != second.height() {
            return Err(Error::ShapeMismatch {
                what: "frame height",
                expected: first.height(),
                got: second.height(),
            });
        }
        if first.width() != second.width() {
            return Err(Error::ShapeMismatch {
                what: "frame width",
                expected: first.width(),
                got: second.width(),
            });
        }

        // Single pass over the pixels; each pixel adds one to every (i, j)
        // pair of instances covering it.
        let mut inter = Array2::<usize>::zeros((first.len(), second.len()));
        let mut covering_first = Vec::new();
        Zip::from(first.as_array().lanes(Axis(2)))
            .and(second.as_array().lanes(Axis(2)))
            .for_each(|a, b| {
                covering_first.clear();
                covering_first.extend(a.iter().enumerate().filter(|&(_, &v)| v).map(|(i, _)| i));
                if covering_first.is_empty() {
                    return;
                }
                for (j, _) in b.iter().enumerate().filter(|&(_, &v)| v) {
                    for &i in &covering_first {
                        inter[[i, j]] += 1;
                    }
                }
            });

        Ok(Self {
            areas1: first.areas(),
            areas2: second.areas(),
            inter,
        })
    }

    fn require_nonempty_first(&self) -> Result<()> {
        match self.areas1.iter().position(|&a| a == 0) {
            Some(i) => Err(Error::DegenerateInput(format!(
                "instance {i} has an empty mask; intersection over self is undefined"
            ))),
            None => Ok(()),
        }
    }

    fn iou(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.inter.dim(), |(i, j)| {
            let inter = self.inter[[i, j]];
            let union = self.areas1[i] + self.areas2[j] - inter;
            if union > 0 {
                inter as f64 / union as f64
            } else {
                0.0
            }
        })
    }

    fn ios(&self) -> Array2<f64> {
        Array2::from_shape_fn(self.inter.dim(), |(i, j)| {
            self.inter[[i, j]] as f64 / self.areas1[i] as f64
        })
    }
}
