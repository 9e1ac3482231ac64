//! One-step links between consecutive frames.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linking::lineage::TrackingInfo;

/// Links for every consecutive frame pair of a series.
///
/// `transition(t)[i] == Some(j)` means instance `i` of frame `t` continues as
/// instance `j` of frame `t + 1`. A series of `T` frames has `T - 1`
/// transitions. Within a transition the targets are pairwise distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    transitions: Vec<Vec<Option<usize>>>,
}

impl LinkInfo {
    /// Validate raw transitions against per-frame instance counts.
    ///
    /// `num_insts` holds one count per frame, so it must be one longer than
    /// `transitions`.
    pub fn new(transitions: Vec<Vec<Option<usize>>>, num_insts: &[usize]) -> Result<Self> {
        let expected_frames = transitions.len() + 1;
        let no_frames = transitions.is_empty() && num_insts.is_empty();
        if num_insts.len() != expected_frames && !no_frames {
            return Err(Error::ShapeMismatch {
                what: "frame count",
                expected: expected_frames,
                got: num_insts.len(),
            });
        }

        for (t, links) in transitions.iter().enumerate() {
            if links.len() != num_insts[t] {
                return Err(Error::ShapeMismatch {
                    what: "instances in frame",
                    expected: num_insts[t],
                    got: links.len(),
                });
            }

            let mut taken = vec![false; num_insts[t + 1]];
            for (i, target) in links.iter().enumerate() {
                let Some(j) = *target else { continue };
                if j >= taken.len() {
                    return Err(Error::InvalidLinks(format!(
                        "frame {t} instance {i} links to {j}, but frame {} has {} instances",
                        t + 1,
                        taken.len()
                    )));
                }
                if taken[j] {
                    return Err(Error::InvalidLinks(format!(
                        "frame {t} links two instances to instance {j} of frame {}",
                        t + 1
                    )));
                }
                taken[j] = true;
            }
        }

        Ok(Self { transitions })
    }

    /// Parse the `-1` sentinel form used for externally supplied ground truth.
    pub fn from_sentinel(raw: Vec<Vec<i64>>, num_insts: &[usize]) -> Result<Self> {
        let transitions = raw
            .into_iter()
            .enumerate()
            .map(|(t, links)| {
                links
                    .into_iter()
                    .map(|j| match j {
                        -1 => Ok(None),
                        j if j >= 0 => Ok(Some(j as usize)),
                        j => Err(Error::InvalidLinks(format!(
                            "frame {t} has link value {j}; only -1 marks a missing link"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(transitions, num_insts)
    }

    /// Rebuild links from a track table by reading consecutive active pairs
    /// out of every track.
    ///
    /// A track that is absent at `t + 1` contributes no link at `t`, so a
    /// bridged gap does not reappear as a link.
    pub fn from_tracking_info(ti: &TrackingInfo, num_insts: &[usize]) -> Result<Self> {
        if ti.num_frames() != num_insts.len() {
            return Err(Error::ShapeMismatch {
                what: "frame count",
                expected: num_insts.len(),
                got: ti.num_frames(),
            });
        }

        let mut transitions: Vec<Vec<Option<usize>>> = num_insts
            .iter()
            .take(num_insts.len().saturating_sub(1))
            .map(|&n| vec![None; n])
            .collect();

        for k in 0..ti.num_tracks() {
            for t in 0..transitions.len() {
                if let (Some(i), Some(j)) = (ti.get(t, k), ti.get(t + 1, k)) {
                    let slot = transitions[t].get_mut(i).ok_or_else(|| {
                        Error::InvalidLinks(format!(
                            "track {k} uses instance {i} at frame {t}, which has {} instances",
                            num_insts[t]
                        ))
                    })?;
                    if slot.is_some() {
                        return Err(Error::InvalidLinks(format!(
                            "more than one track uses instance {i} at frame {t}"
                        )));
                    }
                    *slot = Some(j);
                }
            }
        }

        Self::new(transitions, num_insts)
    }

    /// Number of frame transitions (`T - 1`).
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn transition(&self, t: usize) -> &[Option<usize>] {
        &self.transitions[t]
    }

    pub fn transitions(&self) -> &[Vec<Option<usize>>] {
        &self.transitions
    }

    /// Link of instance `i` at frame `t`, if any.
    pub fn get(&self, t: usize, i: usize) -> Option<usize> {
        self.transitions.get(t)?.get(i).copied().flatten()
    }

    /// Whether instance `j` of frame `t` is the target of some link from `t - 1`.
    pub fn has_predecessor(&self, t: usize, j: usize) -> bool {
        t > 0
            && self
                .transitions
                .get(t - 1)
                .is_some_and(|links| links.contains(&Some(j)))
    }

    /// Links in the `-1` sentinel form.
    pub fn to_sentinel(&self) -> Vec<Vec<i64>> {
        self.transitions
            .iter()
            .map(|links| {
                links
                    .iter()
                    .map(|l| l.map_or(-1, |j| j as i64))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_round_trip() {
        let raw = vec![vec![1, -1, 0], vec![-1, 0]];
        let li = LinkInfo::from_sentinel(raw.clone(), &[3, 2, 1]).unwrap();
        assert_eq!(li.len(), 2);
        assert_eq!(li.get(0, 0), Some(1));
        assert_eq!(li.get(0, 1), None);
        assert!(li.has_predecessor(1, 0));
        assert!(li.has_predecessor(1, 1));
        assert!(li.has_predecessor(2, 0));
        assert!(!li.has_predecessor(0, 0));
        assert_eq!(li.to_sentinel(), raw);
    }

    #[test]
    fn test_rejects_duplicate_targets() {
        let result = LinkInfo::from_sentinel(vec![vec![0, 0]], &[2, 2]);
        assert!(matches!(result, Err(Error::InvalidLinks(_))));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let result = LinkInfo::from_sentinel(vec![vec![2]], &[1, 2]);
        assert!(matches!(result, Err(Error::InvalidLinks(_))));
        let result = LinkInfo::from_sentinel(vec![vec![-2]], &[1, 2]);
        assert!(matches!(result, Err(Error::InvalidLinks(_))));
    }

    #[test]
    fn test_rejects_wrong_counts() {
        let result = LinkInfo::from_sentinel(vec![vec![0, -1]], &[3, 2]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
        let result = LinkInfo::from_sentinel(vec![vec![0]], &[1]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_from_tracking_info_rejects_shared_instance() {
        let ti = TrackingInfo::unchecked(ndarray::array![[0, 0], [0, 1]]);
        assert!(matches!(
            LinkInfo::from_tracking_info(&ti, &[1, 2]),
            Err(Error::InvalidLinks(_))
        ));
    }

    #[test]
    fn test_single_frame_has_no_transitions() {
        let li = LinkInfo::new(vec![], &[4]).unwrap();
        assert!(li.is_empty());
    }
}
