//! Integration module for connecting segmentation backends with the linker.
//!
//! This module provides traits and utilities for feeding instance masks from
//! any segmentation source (label images, model outputs, files on disk) into
//! the [`TimeSeriesLinker`](crate::linking::TimeSeriesLinker).

mod builder;
mod pipeline;
mod source;

pub use builder::MaskStackBuilder;
pub use pipeline::{LinkingPipeline, PipelineError};
pub use source::{IntoMaskStack, MaskSource};
