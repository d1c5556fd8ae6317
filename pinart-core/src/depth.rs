//! Dense per-frame depth buffers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An immutable, row-major view of one frame's depth samples.
///
/// Depth values carry no unit; only their relative ordering matters. A buffer
/// is never mutated after construction, a newer frame replaces it instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDepthBuffer")]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

#[derive(Deserialize)]
struct RawDepthBuffer {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl TryFrom<RawDepthBuffer> for DepthBuffer {
    type Error = Error;

    fn try_from(raw: RawDepthBuffer) -> Result<Self> {
        Self::new(raw.width, raw.height, raw.samples)
    }
}

impl DepthBuffer {
    /// Create a depth buffer, rejecting sample vectors that do not match
    /// `width * height`.
    ///
    /// # Example
    /// ```rust
    /// use pinart_core::DepthBuffer;
    ///
    /// let buffer = DepthBuffer::new(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(buffer.get(1, 1), Some(3.0));
    ///
    /// assert!(DepthBuffer::new(2, 2, vec![0.0; 3]).is_err());
    /// ```
    pub fn new(width: usize, height: usize, samples: Vec<f32>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or_else(|| Error::Shape {
            width,
            height,
            expected: usize::MAX,
            actual: samples.len(),
        })?;

        if samples.len() != expected {
            return Err(Error::Shape {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a buffer with no samples and zero dimensions
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            samples: Vec::new(),
        }
    }

    /// Build a buffer by evaluating `f(x, y)` at every pixel
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw samples in row-major order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at pixel `(x, y)`, or `None` outside the buffer
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(y * self.width + x).copied()
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.samples.get(start..start + self.width)
    }

    /// Consume the buffer, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl Default for DepthBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_matching_shape() {
        let buffer = DepthBuffer::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.get(2, 1), Some(5.0));
        assert_eq!(buffer.get(0, 1), Some(3.0));
    }

    #[test]
    fn test_new_rejects_shape_mismatch() {
        let result = DepthBuffer::new(4, 4, vec![0.0; 15]);
        match result {
            Err(Error::Shape { expected, actual, .. }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("expected shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_samples_without_dimensions() {
        assert!(DepthBuffer::new(0, 0, vec![1.0]).is_err());
        assert!(DepthBuffer::new(0, 5, vec![1.0; 5]).is_err());
    }

    #[test]
    fn test_zero_sized_buffer_is_constructible() {
        let buffer = DepthBuffer::new(0, 0, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer, DepthBuffer::empty());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(DepthBuffer::new(usize::MAX, 2, Vec::new()).is_err());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let buffer = DepthBuffer::from_fn(2, 2, |x, y| (x + y) as f32);
        assert_eq!(buffer.get(2, 0), None);
        assert_eq!(buffer.get(0, 2), None);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let buffer = DepthBuffer::from_fn(4, 3, |x, y| (y * 4 + x) as f32);
        let expected: Vec<f32> = (0..12).map(|i| i as f32).collect();
        assert_eq!(buffer.samples(), expected.as_slice());
        assert_eq!(buffer.row(1), Some(&[4.0, 5.0, 6.0, 7.0][..]));
        assert_eq!(buffer.row(3), None);
    }

    #[test]
    fn test_deserialize_rejects_shape_mismatch() {
        let raw = RawDepthBuffer {
            width: 4,
            height: 4,
            samples: vec![0.0, 1.0, 2.0, 3.0],
        };
        match DepthBuffer::try_from(raw) {
            Err(Error::Shape { expected, actual, .. }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 4);
            }
            other => panic!("expected shape error, got {:?}", other),
        }

        let err = toml::from_str::<DepthBuffer>("width = 4\nheight = 4\nsamples = [0.0, 1.0, 2.0, 3.0]\n")
            .unwrap_err();
        assert!(err.to_string().contains("shape mismatch"));
    }

    #[test]
    fn test_deserialize_accepts_matching_shape() {
        let buffer: DepthBuffer =
            toml::from_str("width = 2\nheight = 2\nsamples = [0.0, 1.0, 2.0, 3.0]\n").unwrap();
        assert_eq!(buffer.get(1, 1), Some(3.0));
    }
}
