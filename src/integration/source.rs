//! Trait for instance segmentation backends.

use std::convert::Infallible;

use ndarray::{Array2, Array3};

use crate::linking::MaskStack;

/// Trait for anything that can supply one frame of instance masks at a time.
///
/// Implement this trait to connect a segmentation model or a directory of
/// label images to the linker.
///
/// # Example
///
/// ```ignore
/// use instance_linker::{MaskSource, MaskStack};
///
/// struct LabelDirectory {
///     // Paths to label images, one per frame
/// }
///
/// impl MaskSource for LabelDirectory {
///     type Error = std::io::Error;
///
///     fn num_frames(&self) -> usize {
///         // Number of label images
///     }
///
///     fn masks(&mut self, frame: usize) -> Result<MaskStack, Self::Error> {
///         // Decode the label image and split it into masks
///     }
/// }
/// ```
pub trait MaskSource {
    /// Error type for segmentation or loading failures.
    type Error;

    /// Number of frames in the series.
    fn num_frames(&self) -> usize;

    /// Instance masks of frame `frame`, for `frame < num_frames()`.
    fn masks(&mut self, frame: usize) -> Result<MaskStack, Self::Error>;
}

impl MaskSource for Vec<MaskStack> {
    type Error = Infallible;

    fn num_frames(&self) -> usize {
        self.len()
    }

    fn masks(&mut self, frame: usize) -> Result<MaskStack, Self::Error> {
        Ok(self[frame].clone())
    }
}

/// Helper trait for converting segmentation outputs to a `MaskStack`.
pub trait IntoMaskStack {
    /// Convert the output into a stack of instance masks.
    fn into_mask_stack(self) -> MaskStack;
}

impl IntoMaskStack for MaskStack {
    fn into_mask_stack(self) -> MaskStack {
        self
    }
}

/// `(H, W, n)` boolean masks.
impl IntoMaskStack for Array3<bool> {
    fn into_mask_stack(self) -> MaskStack {
        MaskStack::new(self)
    }
}

/// Label image with `0` as background.
impl IntoMaskStack for Array2<u32> {
    fn into_mask_stack(self) -> MaskStack {
        MaskStack::from_labels(&self)
    }
}
