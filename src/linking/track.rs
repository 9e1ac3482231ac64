//! Persistent identity of one object across frames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable track identifier.
///
/// Assigned once at emergence and never reused or renumbered, including after
/// gap bridging removes other tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One object's local instance index in every frame of the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,
    /// First frame where the object has no predecessor
    pub emergence_frame: usize,
    /// `lifetime[t]` is the instance index at frame `t`, `None` when absent
    pub lifetime: Vec<Option<usize>>,
    /// Frames skipped by gap bridging, in ascending order
    pub bridged_gaps: Vec<usize>,
}

impl Track {
    pub(crate) fn new(id: TrackId, emergence_frame: usize, num_frames: usize) -> Self {
        Self {
            id,
            emergence_frame,
            lifetime: vec![None; num_frames],
            bridged_gaps: Vec::new(),
        }
    }

    pub fn first_frame(&self) -> Option<usize> {
        self.lifetime.iter().position(Option::is_some)
    }

    pub fn last_frame(&self) -> Option<usize> {
        self.lifetime.iter().rposition(Option::is_some)
    }

    /// Instance index at the last frame the track is present.
    pub fn current_id(&self) -> Option<usize> {
        self.lifetime[self.last_frame()?]
    }

    pub fn instance_at(&self, t: usize) -> Option<usize> {
        self.lifetime.get(t).copied().flatten()
    }

    pub fn is_active_at(&self, t: usize) -> bool {
        self.instance_at(t).is_some()
    }

    /// Number of frames in which the track is present.
    pub fn active_frames(&self) -> usize {
        self.lifetime.iter().filter(|l| l.is_some()).count()
    }

    /// Whether the track ends at frame `t`, i.e. is present at `t` and at no
    /// later frame.
    pub fn terminates_at(&self, t: usize) -> bool {
        self.last_frame() == Some(t)
    }
}
