//! Persistent tracks built from one-step links.

use std::ops::RangeFrom;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::linking::link_info::LinkInfo;
use crate::linking::track::{Track, TrackId};

/// Registry of every track in a series.
///
/// Tracks are kept in ascending `(emergence_frame, instance at emergence)`
/// order, which is also the order their ids were handed out. The position of
/// a track in that order is its display index, dense over `[0, len)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSeries {
    num_frames: usize,
    tracks: Vec<Track>,
}

impl LinkSeries {
    /// Follow the links forward from every emergent instance.
    ///
    /// Every instance at frame 0, and every later instance that no link
    /// points to, starts a new track. Each track then follows its links until
    /// one is missing or the series ends.
    pub fn build(link_info: &LinkInfo, num_insts: &[usize]) -> Result<Self> {
        let num_frames = num_insts.len();
        if num_frames != link_info.len() + 1 && !(num_frames == 0 && link_info.is_empty()) {
            return Err(Error::ShapeMismatch {
                what: "frame count",
                expected: link_info.len() + 1,
                got: num_frames,
            });
        }
        for (t, links) in link_info.transitions().iter().enumerate() {
            if links.len() != num_insts[t] {
                return Err(Error::ShapeMismatch {
                    what: "instances in frame",
                    expected: num_insts[t],
                    got: links.len(),
                });
            }
        }

        let mut series = Self {
            num_frames,
            tracks: Vec::new(),
        };
        let mut unique_id_iter = 0u64..;

        for (t, &n) in num_insts.iter().enumerate() {
            let mut has_predecessor = vec![false; n];
            if t > 0 {
                for &j in link_info.transition(t - 1).iter().flatten() {
                    let slot = has_predecessor.get_mut(j).ok_or_else(|| {
                        Error::InvalidLinks(format!(
                            "frame {} links to instance {j}, but frame {t} has {n} instances",
                            t - 1
                        ))
                    })?;
                    *slot = true;
                }
            }

            for j in (0..n).filter(|&j| !has_predecessor[j]) {
                let track = series.emerge(&mut unique_id_iter, t, j, link_info);
                series.tracks.push(track);
            }
        }

        debug!(
            frames = num_frames,
            tracks = series.tracks.len(),
            "built link series"
        );
        Ok(series)
    }

    fn emerge(
        &self,
        ids: &mut RangeFrom<u64>,
        t: usize,
        instance: usize,
        link_info: &LinkInfo,
    ) -> Track {
        let id = TrackId(ids.next().unwrap_or(u64::MAX));
        let mut track = Track::new(id, t, self.num_frames);
        track.lifetime[t] = Some(instance);

        let mut current = instance;
        for s in t..self.num_frames.saturating_sub(1) {
            match link_info.get(s, current) {
                Some(next) => {
                    track.lifetime[s + 1] = Some(next);
                    current = next;
                }
                None => break,
            }
        }
        track
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in display order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.display_index(id).map(|k| &self.tracks[k])
    }

    /// Dense position of a track in emergence order.
    pub fn display_index(&self, id: TrackId) -> Option<usize> {
        self.tracks.binary_search_by_key(&id, |t| t.id).ok()
    }

    /// Tracks that emerged at frame `t`.
    pub fn emerging_at(&self, t: usize) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |track| track.emergence_frame == t)
    }

    /// Tracks whose last present frame is `t`.
    pub fn terminating_at(&self, t: usize) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |track| track.terminates_at(t))
    }

    /// Merge `absorbed` into `survivor` from frame `from` onward and drop
    /// `absorbed` from the registry.
    ///
    /// The frame before `from` is recorded as a bridged gap on the survivor.
    /// Fails without touching the registry if either id is unknown, both ids
    /// are the same, or `from` is outside the series.
    pub(crate) fn splice(
        &mut self,
        survivor: TrackId,
        absorbed: TrackId,
        from: usize,
    ) -> Result<()> {
        let missing = |id: TrackId| Error::InvalidLinks(format!("track {id} is not in the series"));
        if survivor == absorbed {
            return Err(Error::InvalidLinks(format!(
                "track {survivor} cannot absorb itself"
            )));
        }
        let s_idx = self.display_index(survivor).ok_or_else(|| missing(survivor))?;
        let a_idx = self.display_index(absorbed).ok_or_else(|| missing(absorbed))?;
        if from == 0 || from >= self.num_frames {
            return Err(Error::ShapeMismatch {
                what: "splice frame",
                expected: self.num_frames,
                got: from,
            });
        }

        let tail = self.tracks[a_idx].lifetime[from..].to_vec();
        let track = &mut self.tracks[s_idx];
        track.lifetime[from..].copy_from_slice(&tail);
        track.bridged_gaps.push(from - 1);
        self.tracks.remove(a_idx);
        Ok(())
    }

    /// The `T x K` track table in display order.
    pub fn tracking_info(&self) -> TrackingInfo {
        let matrix = Array2::from_shape_fn((self.num_frames, self.tracks.len()), |(t, k)| {
            self.tracks[k].lifetime[t].map_or(-1, |i| i as i64)
        });
        TrackingInfo { matrix }
    }
}

/// `T x K` table whose column `k` is track `k`'s lifetime, `-1` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    matrix: Array2<i64>,
}

impl TrackingInfo {
    /// Validate an externally supplied table.
    ///
    /// Besides `-1`, entries must be instance indices, and no two tracks may
    /// hold the same instance in the same frame.
    pub fn from_sentinel(matrix: Array2<i64>) -> Result<Self> {
        if let Some(((t, k), v)) = matrix.indexed_iter().find(|&(_, &v)| v < -1) {
            return Err(Error::InvalidLinks(format!(
                "track {k} has value {v} at frame {t}; only -1 marks absence"
            )));
        }
        for (t, row) in matrix.rows().into_iter().enumerate() {
            let mut present: Vec<i64> = row.iter().copied().filter(|&v| v >= 0).collect();
            present.sort_unstable();
            if let Some(pair) = present.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(Error::InvalidLinks(format!(
                    "two tracks hold instance {} at frame {t}",
                    pair[0]
                )));
            }
        }
        Ok(Self { matrix })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(matrix: Array2<i64>) -> Self {
        Self { matrix }
    }

    pub fn num_frames(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn num_tracks(&self) -> usize {
        self.matrix.ncols()
    }

    /// Instance index of track `k` at frame `t`.
    pub fn get(&self, t: usize, k: usize) -> Option<usize> {
        match self.matrix.get((t, k)) {
            Some(&v) if v >= 0 => Some(v as usize),
            _ => None,
        }
    }

    pub fn column(&self, k: usize) -> ArrayView1<'_, i64> {
        self.matrix.column(k)
    }

    /// Number of frames in which track `k` is present.
    pub fn lifetime_len(&self, k: usize) -> usize {
        self.matrix.column(k).iter().filter(|&&v| v >= 0).count()
    }

    pub fn as_array(&self) -> &Array2<i64> {
        &self.matrix
    }
}
