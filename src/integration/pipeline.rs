//! LinkingPipeline for combining segmentation with linking.

use thiserror::Error;
use tracing::debug;

use crate::error::Error;
use crate::linking::{LinkedSeries, LinkerConfig, MaskStack, TimeSeriesLinker};

use super::MaskSource;

/// Failure of either the mask source or the linker.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("mask source failed on frame {frame}: {error}")]
    Source { frame: usize, error: E },

    #[error(transparent)]
    Linking(#[from] Error),
}

/// A combined linker that bundles a mask source with the time-series linker.
///
/// This struct provides a convenient way to run end-to-end linking by
/// combining any `MaskSource` with the `TimeSeriesLinker`.
pub struct LinkingPipeline<S: MaskSource> {
    source: S,
    linker: TimeSeriesLinker,
}

impl<S: MaskSource> LinkingPipeline<S> {
    /// Create a new linking pipeline with the given source and linker config.
    pub fn new(source: S, config: LinkerConfig) -> Result<Self, Error> {
        Ok(Self {
            source,
            linker: TimeSeriesLinker::new(config)?,
        })
    }

    /// Create a new linking pipeline with default linker configuration.
    pub fn with_default_config(source: S) -> Self {
        Self {
            source,
            linker: TimeSeriesLinker::default(),
        }
    }

    /// Load every frame from the source and link the whole series.
    pub fn run(&mut self) -> Result<LinkedSeries, PipelineError<S::Error>> {
        let num_frames = self.source.num_frames();
        let frames = (0..num_frames)
            .map(|frame| {
                self.source
                    .masks(frame)
                    .map_err(|error| PipelineError::Source { frame, error })
            })
            .collect::<Result<Vec<MaskStack>, _>>()?;

        debug!(frames = frames.len(), "loaded mask series");
        Ok(self.linker.link(&frames)?)
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get a reference to the underlying linker.
    pub fn linker(&self) -> &TimeSeriesLinker {
        &self.linker
    }
}
