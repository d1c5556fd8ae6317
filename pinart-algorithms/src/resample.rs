//! Quadratic (second-order Lagrange) resampling of depth buffers
//!
//! The depth field is evaluated at continuous coordinates by fitting a
//! quadratic through each row of a 3x3 neighborhood and then a quadratic
//! through the three row results. This is exact for any field that is at
//! most quadratic in each axis and, unlike bilinear interpolation, has a
//! continuous slope inside each neighborhood. It is not convexity preserving:
//! results may overshoot the neighborhood's own min/max.

use pinart_core::{DepthBuffer, SampleCoordinate};

/// Evaluate the quadratic through `(0, y0)`, `(1, y1)`, `(2, y2)` at `t`.
///
/// # Example
/// ```rust
/// use pinart_algorithms::lagrange;
///
/// // y = t^2
/// assert_eq!(lagrange(0.0, 1.0, 4.0, 1.5), 2.25);
/// ```
#[inline]
pub fn lagrange(y0: f32, y1: f32, y2: f32, t: f32) -> f32 {
    let l0 = (t - 1.0) * (t - 2.0) * 0.5;
    let l1 = -t * (t - 2.0);
    let l2 = t * (t - 1.0) * 0.5;
    y0 * l0 + y1 * l1 + y2 * l2
}

/// Quadratic sampler over one depth buffer.
///
/// Needs a buffer of at least 3x3 so that a full neighborhood always exists.
#[derive(Debug, Clone, Copy)]
pub struct QuadraticResampler<'a> {
    buffer: &'a DepthBuffer,
    max_u: f32,
    max_v: f32,
}

impl<'a> QuadraticResampler<'a> {
    /// Smallest width or height that has a 3x3 neighborhood
    pub const MIN_DIMENSION: usize = 3;

    /// Wrap a buffer, or `None` if it is narrower or shorter than 3 samples
    pub fn new(buffer: &'a DepthBuffer) -> Option<Self> {
        if buffer.width() < Self::MIN_DIMENSION || buffer.height() < Self::MIN_DIMENSION {
            return None;
        }
        Some(Self {
            buffer,
            max_u: (buffer.width() - 2) as f32,
            max_v: (buffer.height() - 2) as f32,
        })
    }

    pub fn buffer(&self) -> &'a DepthBuffer {
        self.buffer
    }

    /// Pull a coordinate into `[1, width-2] x [1, height-2]`.
    ///
    /// Edge and out-of-range coordinates move inward to the nearest position
    /// with a full neighborhood. NaN maps to the lower bound.
    pub fn clamp(&self, u: f32, v: f32) -> (f32, f32) {
        // f32::max/min discard a NaN operand
        (u.max(1.0).min(self.max_u), v.max(1.0).min(self.max_v))
    }

    /// Interpolated depth at `(u, v)` in pixel space
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let (u, v) = self.clamp(u, v);

        // u, v >= 1 after clamping, so the neighborhood starts at >= 0
        let x0 = u.floor() as usize - 1;
        let y0 = v.floor() as usize - 1;
        let fx = u - x0 as f32;
        let fy = v - y0 as f32;

        let width = self.buffer.width();
        let samples = self.buffer.samples();
        let row = |y: usize| {
            let start = y * width + x0;
            lagrange(samples[start], samples[start + 1], samples[start + 2], fx)
        };

        lagrange(row(y0), row(y0 + 1), row(y0 + 2), fy)
    }

    /// Interpolated depth at a sample coordinate
    pub fn sample_at(&self, coordinate: SampleCoordinate) -> f32 {
        self.sample(coordinate.u, coordinate.v)
    }
}

/// One-off quadratic sample; `None` for buffers smaller than 3x3
pub fn sample_depth_quadratic(buffer: &DepthBuffer, u: f32, v: f32) -> Option<f32> {
    QuadraticResampler::new(buffer).map(|resampler| resampler.sample(u, v))
}
