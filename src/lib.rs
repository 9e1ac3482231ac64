//! Instance time-series linking.
//!
//! Given per-frame stacks of segmented instance masks (for example leaves
//! segmented independently in every frame of a time-lapse), this crate
//! assigns persistent track identities across frames, bridges one-frame
//! occlusion gaps, and scores the result against ground truth.
//!
//! The flow is: overlap matrices between consecutive frames, optimal one-step
//! assignment per frame pair ([`LinkInfo`]), forward lineage construction
//! ([`LinkSeries`]), gap bridging, and finally evaluation
//! ([`TrackingEvaluation`]).

pub mod error;
pub mod evaluation;
pub mod integration;
pub mod linking;

pub use error::{Error, Result};
pub use evaluation::{
    ConfusionEvaluation, LinkEvaluation, MismatchRate, TrackingEvaluation, confusion,
    evaluate_link, mismatch_rate,
};
pub use integration::{IntoMaskStack, LinkingPipeline, MaskSource, MaskStackBuilder, PipelineError};
pub use linking::{
    LinkInfo, LinkSeries, LinkedSeries, LinkerConfig, MaskStack, OverlapMode, Overlaps,
    TimeSeriesLinker, Track, TrackId, TrackingInfo, bridge_gaps, overlap_matrix,
};
