//! End-to-end linking of a mask time series.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::linking::gap_bridge::bridge_gaps;
use crate::linking::lineage::{LinkSeries, TrackingInfo};
use crate::linking::link_info::LinkInfo;
use crate::linking::mask::MaskStack;
use crate::linking::matching::link_by_weights;
use crate::linking::overlap::{OverlapMode, overlap_matrix};

/// Configuration for the [`TimeSeriesLinker`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Overlap score used to compare instances
    pub mode: OverlapMode,
    /// Minimum overlap for two instances to be linked, in `[0, 1]`
    pub threshold: f64,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            mode: OverlapMode::Iou,
            threshold: 0.2,
        }
    }
}

impl LinkerConfig {
    pub fn new(mode: OverlapMode, threshold: f64) -> Result<Self> {
        let config = Self { mode, threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Configuration(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a YAML document such as
    ///
    /// ```yaml
    /// mode: IOS
    /// threshold: 0.35
    /// ```
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: LinkerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}

/// Output of [`TimeSeriesLinker::link`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedSeries {
    /// One-step links produced for every consecutive frame pair
    pub link_info: LinkInfo,
    /// Tracks after gap bridging
    pub series: LinkSeries,
    /// Instance count of every frame
    pub num_insts: Vec<usize>,
}

impl LinkedSeries {
    pub fn tracking_info(&self) -> TrackingInfo {
        self.series.tracking_info()
    }
}

/// Assigns persistent identities to instance masks across a time series.
///
/// # Example
///
/// ```rust
/// use instance_linker::{LinkerConfig, MaskStackBuilder, OverlapMode, TimeSeriesLinker};
///
/// let config = LinkerConfig::new(OverlapMode::Iou, 0.2).unwrap();
/// let linker = TimeSeriesLinker::new(config).unwrap();
///
/// let frames = vec![
///     MaskStackBuilder::new(16, 16).rect(0, 0, 8, 8).build(),
///     MaskStackBuilder::new(16, 16).rect(1, 1, 9, 9).build(),
/// ];
/// let linked = linker.link(&frames).unwrap();
/// assert_eq!(linked.series.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesLinker {
    config: LinkerConfig,
}

impl TimeSeriesLinker {
    pub fn new(config: LinkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Link one frame pair: instance `i` of `current` to instance `j` of `next`.
    pub fn link_pair(&self, current: &MaskStack, next: &MaskStack) -> Result<Vec<Option<usize>>> {
        let weights = overlap_matrix(self.config.mode, current, next)?;
        Ok(link_by_weights(&weights, self.config.threshold))
    }

    /// Link every consecutive frame pair.
    ///
    /// Pairs are independent; with the `parallel` feature they run on the
    /// rayon thread pool and are gathered once all have finished.
    pub fn link_frames(&self, frames: &[MaskStack]) -> Result<LinkInfo> {
        check_plane_dims(frames)?;
        let num_insts: Vec<usize> = frames.iter().map(MaskStack::len).collect();

        let transitions = self.link_transitions(frames)?;
        for (t, links) in transitions.iter().enumerate() {
            debug!(
                frame = t,
                instances = links.len(),
                linked = links.iter().flatten().count(),
                "linked frame pair"
            );
        }
        LinkInfo::new(transitions, &num_insts)
    }

    #[cfg(feature = "parallel")]
    fn link_transitions(&self, frames: &[MaskStack]) -> Result<Vec<Vec<Option<usize>>>> {
        use rayon::prelude::*;

        frames
            .par_windows(2)
            .map(|pair| self.link_pair(&pair[0], &pair[1]))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn link_transitions(&self, frames: &[MaskStack]) -> Result<Vec<Vec<Option<usize>>>> {
        frames
            .windows(2)
            .map(|pair| self.link_pair(&pair[0], &pair[1]))
            .collect()
    }

    /// Link all frame pairs, build tracks and bridge one-frame gaps.
    pub fn link(&self, frames: &[MaskStack]) -> Result<LinkedSeries> {
        let link_info = self.link_frames(frames)?;
        let num_insts: Vec<usize> = frames.iter().map(MaskStack::len).collect();

        let series = LinkSeries::build(&link_info, &num_insts)?;
        let initial_tracks = series.len();
        let series = bridge_gaps(series, frames, &self.config)?;

        info!(
            frames = frames.len(),
            mode = %self.config.mode,
            threshold = self.config.threshold,
            tracks = series.len(),
            bridged = initial_tracks - series.len(),
            "linked time series"
        );

        Ok(LinkedSeries {
            link_info,
            series,
            num_insts,
        })
    }
}

fn check_plane_dims(frames: &[MaskStack]) -> Result<()> {
    let Some(first) = frames.first() else {
        return Ok(());
    };
    let (height, width) = first.plane_dim();
    for frame in frames {
        if frame.height() != height {
            return Err(Error::ShapeMismatch {
                what: "frame height",
                expected: height,
                got: frame.height(),
            });
        }
        if frame.width() != width {
            return Err(Error::ShapeMismatch {
                what: "frame width",
                expected: width,
                got: frame.width(),
            });
        }
    }
    Ok(())
}
