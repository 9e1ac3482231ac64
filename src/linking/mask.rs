//! Binary instance mask stacks.

use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stack of `n` binary instance masks sharing one `(height, width)` plane.
///
/// Stored with shape `(H, W, n)`: `masks[[y, x, i]]` is `true` when pixel
/// `(y, x)` belongs to instance `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStack {
    masks: Array3<bool>,
}

impl MaskStack {
    /// Wrap an `(H, W, n)` boolean array.
    pub fn new(masks: Array3<bool>) -> Self {
        Self { masks }
    }

    /// An `(H, W)` frame with no instances.
    pub fn empty(height: usize, width: usize) -> Self {
        Self {
            masks: Array3::from_elem((height, width, 0), false),
        }
    }

    /// Build a stack from individual `(H, W)` planes.
    ///
    /// `height` and `width` are needed so that an empty plane list still has
    /// a well-defined frame size.
    pub fn from_planes(height: usize, width: usize, planes: &[Array2<bool>]) -> Result<Self> {
        for plane in planes {
            let (h, w) = plane.dim();
            if h != height {
                return Err(Error::ShapeMismatch {
                    what: "mask plane height",
                    expected: height,
                    got: h,
                });
            }
            if w != width {
                return Err(Error::ShapeMismatch {
                    what: "mask plane width",
                    expected: width,
                    got: w,
                });
            }
        }

        let mut masks = Array3::from_elem((height, width, planes.len()), false);
        for (i, plane) in planes.iter().enumerate() {
            masks.index_axis_mut(Axis(2), i).assign(plane);
        }
        Ok(Self { masks })
    }

    /// Split a label image into one mask per label.
    ///
    /// Label `0` is background; labels `1..=max` become instances `0..max`.
    /// Labels absent from the image still produce (empty) masks so that
    /// instance indices stay equal to `label - 1`.
    pub fn from_labels(labels: &Array2<u32>) -> Self {
        let (height, width) = labels.dim();
        let num_instances = labels.iter().copied().max().unwrap_or(0) as usize;

        let mut masks = Array3::from_elem((height, width, num_instances), false);
        for ((y, x), &label) in labels.indexed_iter() {
            if label > 0 {
                masks[[y, x, label as usize - 1]] = true;
            }
        }
        Self { masks }
    }

    pub fn height(&self) -> usize {
        self.masks.dim().0
    }

    pub fn width(&self) -> usize {
        self.masks.dim().1
    }

    /// Number of instances in this frame.
    pub fn len(&self) -> usize {
        self.masks.dim().2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(height, width)` of every plane.
    pub fn plane_dim(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// View of instance `index`'s mask.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn plane(&self, index: usize) -> ArrayView2<'_, bool> {
        self.masks.index_axis(Axis(2), index)
    }

    /// Pixel count of every instance mask.
    pub fn areas(&self) -> Vec<usize> {
        self.masks
            .axis_iter(Axis(2))
            .map(|plane| plane.iter().filter(|&&p| p).count())
            .collect()
    }

    /// New stack holding only the given instances, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(Error::ShapeMismatch {
                what: "selected instance index",
                expected: self.len(),
                got: bad,
            });
        }
        Ok(Self {
            masks: self.masks.select(Axis(2), indices),
        })
    }

    pub fn as_array(&self) -> &Array3<bool> {
        &self.masks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_labels() {
        let labels = array![[0, 1, 1], [0, 0, 3], [2, 0, 3]];
        let stack = MaskStack::from_labels(&labels);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.plane_dim(), (3, 3));
        assert_eq!(stack.areas(), vec![2, 1, 2]);
        assert!(stack.plane(2)[[1, 2]]);
        assert!(!stack.plane(0)[[1, 2]]);
    }

    #[test]
    fn test_from_planes_rejects_wrong_size() {
        let good = Array2::from_elem((4, 4), false);
        let bad = Array2::from_elem((4, 5), false);
        let result = MaskStack::from_planes(4, 4, &[good, bad]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_frame() {
        let stack = MaskStack::from_planes(8, 6, &[]).unwrap();
        assert!(stack.is_empty());
        assert_eq!(stack.plane_dim(), (8, 6));
        assert!(stack.areas().is_empty());
    }

    #[test]
    fn test_select() {
        let labels = array![[1, 2, 3]];
        let stack = MaskStack::from_labels(&labels);
        let sub = stack.select(&[2, 0]).unwrap();
        assert_eq!(sub.len(), 2);
        assert!(sub.plane(0)[[0, 2]]);
        assert!(sub.plane(1)[[0, 0]]);
        assert!(stack.select(&[3]).is_err());
    }
}
