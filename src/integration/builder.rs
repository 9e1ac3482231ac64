//! Builder for creating mask stacks from simple shapes.

use ndarray::Array3;

use crate::linking::MaskStack;

/// Builder for creating a [`MaskStack`] one instance at a time.
///
/// Every call to [`rect`](Self::rect) or [`pixels`](Self::pixels) adds one
/// instance. Coordinates outside the frame are clipped.
#[derive(Debug, Clone)]
pub struct MaskStackBuilder {
    height: usize,
    width: usize,
    instances: Vec<Vec<(usize, usize)>>,
}

impl MaskStackBuilder {
    /// Create a builder for `height x width` frames.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            instances: Vec::new(),
        }
    }

    /// Add an instance covering rows `y0..y1` and columns `x0..x1`.
    pub fn rect(mut self, y0: usize, x0: usize, y1: usize, x1: usize) -> Self {
        let (y1, x1) = (y1.min(self.height), x1.min(self.width));
        let pixels = (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (y, x)))
            .collect();
        self.instances.push(pixels);
        self
    }

    /// Add an instance made of the given `(y, x)` pixels.
    pub fn pixels(mut self, pixels: &[(usize, usize)]) -> Self {
        let pixels = pixels
            .iter()
            .copied()
            .filter(|&(y, x)| y < self.height && x < self.width)
            .collect();
        self.instances.push(pixels);
        self
    }

    /// Build the final `MaskStack`.
    pub fn build(self) -> MaskStack {
        let mut masks = Array3::from_elem((self.height, self.width, self.instances.len()), false);
        for (i, pixels) in self.instances.iter().enumerate() {
            for &(y, x) in pixels {
                masks[[y, x, i]] = true;
            }
        }
        MaskStack::new(masks)
    }
}
