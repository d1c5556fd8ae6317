//! Depth range scanning and normalization

use crate::parallel::Parallelism;
use pinart_core::DepthBuffer;

/// Observed minimum and maximum of one frame's depth samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl DepthRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the range
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// True when every sample had the same value
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Map a raw value into `[0, 1]` relative to this range
    pub fn normalize(&self, value: f32) -> f32 {
        normalize(value, self.min, self.max)
    }
}

/// `(value - min) / (max - min)`, or `0` when the range is empty.
///
/// Values outside `[min, max]` (e.g. quadratic overshoot) map outside `[0, 1]`.
///
/// # Example
/// ```rust
/// use pinart_algorithms::normalize;
///
/// assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
/// assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
/// ```
#[inline]
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range == 0.0 {
        return 0.0;
    }
    (value - min) / range
}

/// Scan a buffer for its minimum and maximum in a single pass.
///
/// NaN samples are skipped. Returns `None` when there is nothing to scan:
/// an empty buffer or one without a single comparable sample.
pub fn compute_range(buffer: &DepthBuffer) -> Option<DepthRange> {
    fold_range(buffer.samples().iter().copied())
}

/// [`compute_range`] split across threads for large buffers
pub fn compute_range_with(buffer: &DepthBuffer, parallelism: &Parallelism) -> Option<DepthRange> {
    parallelism.reduce(
        buffer.samples(),
        None,
        |value| if value.is_nan() { None } else { Some(DepthRange::new(*value, *value)) },
        merge_ranges,
    )
}

fn fold_range<I: Iterator<Item = f32>>(values: I) -> Option<DepthRange> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut seen = false;

    for value in values {
        if value.is_nan() {
            continue;
        }
        seen = true;
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    seen.then(|| DepthRange::new(min, max))
}

fn merge_ranges(a: Option<DepthRange>, b: Option<DepthRange>) -> Option<DepthRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(DepthRange::new(a.min.min(b.min), a.max.max(b.max))),
        (a, None) => a,
        (None, b) => b,
    }
}
