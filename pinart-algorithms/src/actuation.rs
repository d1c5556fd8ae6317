//! Per-frame pin actuation
//!
//! One pass turns a depth buffer into one height per pin:
//!
//! 1. scan the buffer for its depth range (the only sequential step),
//! 2. for every pin, map its index to a buffer coordinate, resample the depth
//!    there, normalize it against the range and scale it,
//! 3. hand all heights to the sink at once.
//!
//! Frames that cannot be processed are skipped and the sink keeps whatever it
//! last received.

use crate::hex_grid::HexGridMapper;
use crate::normalize::{compute_range_with, DepthRange};
use crate::parallel::{Parallelism, ThreadPoolConfig};
use crate::resample::QuadraticResampler;
use pinart_core::{DepthBuffer, GridSpec, PinArtConfig, PinIndex, PinSink, Result};
use std::fmt;
use tracing::debug;

/// Why a frame produced no heights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No samples at all
    Empty,
    /// Narrower or shorter than the 3x3 resampling neighborhood
    TooSmall { width: usize, height: usize },
    /// Every sample was NaN
    NoFiniteSamples,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty depth buffer"),
            SkipReason::TooSmall { width, height } => {
                write!(f, "depth buffer {}x{} is smaller than 3x3", width, height)
            }
            SkipReason::NoFiniteSamples => write!(f, "depth buffer has no usable samples"),
        }
    }
}

/// Result of running a pass on one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Heights were written to the sink
    Applied { range: DepthRange, pins: usize },
    /// The sink was left untouched
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FrameOutcome::Applied { .. })
    }
}

/// Everything a pin needs from its frame: the sampler and the depth range
#[derive(Debug, Clone, Copy)]
pub struct FramePlan<'a> {
    resampler: QuadraticResampler<'a>,
    range: DepthRange,
}

impl<'a> FramePlan<'a> {
    /// Validate a buffer and scan its range
    pub fn prepare(buffer: &'a DepthBuffer, parallelism: &Parallelism) -> std::result::Result<Self, SkipReason> {
        if buffer.is_empty() {
            return Err(SkipReason::Empty);
        }
        let resampler = QuadraticResampler::new(buffer).ok_or(SkipReason::TooSmall {
            width: buffer.width(),
            height: buffer.height(),
        })?;
        let range = compute_range_with(buffer, parallelism).ok_or(SkipReason::NoFiniteSamples)?;

        Ok(Self { resampler, range })
    }

    pub fn range(&self) -> DepthRange {
        self.range
    }

    /// Height of one pin.
    ///
    /// Depends only on the pin's index and this frame, never on other pins.
    /// A non-finite sample (a NaN in the neighborhood) leaves the pin at rest.
    pub fn pin_height(&self, index: PinIndex, mapper: &HexGridMapper, scale: f32) -> f32 {
        let buffer = self.resampler.buffer();
        let coordinate = mapper.sample_coordinate(index, buffer.width(), buffer.height());
        let raw = self.resampler.sample_at(coordinate);
        let height = self.range.normalize(raw) * scale;
        if height.is_finite() {
            height
        } else {
            0.0
        }
    }
}

/// Height of a single pin computed straight from a buffer.
///
/// Scans the whole buffer for its range on every call; use a
/// [`PinActuationPass`] for full frames.
pub fn pin_height(index: PinIndex, buffer: &DepthBuffer, grid: &GridSpec, scale: f32) -> Option<f32> {
    if !grid.contains(index) {
        return None;
    }
    let plan = FramePlan::prepare(buffer, &Parallelism::sequential()).ok()?;
    Some(plan.pin_height(index, &HexGridMapper::new(*grid), scale))
}

/// Converts depth buffers into pin heights for a fixed grid
#[derive(Debug, Clone)]
pub struct PinActuationPass {
    mapper: HexGridMapper,
    max_displacement: f32,
    parallelism: Parallelism,
}

impl PinActuationPass {
    /// Create a pass using rayon's global pool for large grids
    pub fn new(grid: GridSpec, max_displacement: f32) -> Self {
        Self {
            mapper: HexGridMapper::new(grid),
            max_displacement,
            parallelism: Parallelism::default(),
        }
    }

    /// Build a pass from session configuration
    pub fn from_config(config: &PinArtConfig) -> Result<Self> {
        let parallelism = Parallelism::from_config(&ThreadPoolConfig::from(&config.parallel))?;
        Ok(Self::new(config.grid_spec()?, config.max_displacement).with_parallelism(parallelism))
    }

    /// Replace how per-pin work is scheduled
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn grid(&self) -> &GridSpec {
        self.mapper.grid()
    }

    pub fn mapper(&self) -> &HexGridMapper {
        &self.mapper
    }

    pub fn max_displacement(&self) -> f32 {
        self.max_displacement
    }

    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    /// Whether a full frame fans out to the rayon pool
    pub fn is_parallel(&self) -> bool {
        self.parallelism.is_parallel_for(self.grid().pin_count())
    }

    /// Heights for every pin in row-major order, plus the frame's depth range
    pub fn compute_heights(&self, buffer: &DepthBuffer) -> std::result::Result<(Vec<f32>, DepthRange), SkipReason> {
        let plan = FramePlan::prepare(buffer, &self.parallelism)?;
        let grid = *self.mapper.grid();
        let scale = self.max_displacement;

        let heights = self.parallelism.map_range(grid.pin_count(), |slot| {
            let index = PinIndex::new(slot / grid.cols(), slot % grid.cols());
            plan.pin_height(index, &self.mapper, scale)
        });

        Ok((heights, plan.range()))
    }

    /// Process one frame into `sink`.
    ///
    /// The sink receives exactly one `apply` call when the frame is usable and
    /// none otherwise.
    pub fn run<S: PinSink + ?Sized>(&self, buffer: &DepthBuffer, sink: &mut S) -> FrameOutcome {
        match self.compute_heights(buffer) {
            Ok((heights, range)) => {
                sink.apply(&heights);
                FrameOutcome::Applied {
                    range,
                    pins: heights.len(),
                }
            }
            Err(reason) => {
                debug!(
                    width = buffer.width(),
                    height = buffer.height(),
                    %reason,
                    "Skipping depth frame"
                );
                FrameOutcome::Skipped(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pinart_core::PinHeights;

    fn ramp(width: usize, height: usize) -> DepthBuffer {
        DepthBuffer::from_fn(width, height, |x, y| (y * width + x) as f32)
    }

    #[test]
    fn test_prepare_rejects_unusable_buffers() {
        let sequential = Parallelism::sequential();
        assert_eq!(
            FramePlan::prepare(&DepthBuffer::empty(), &sequential).err(),
            Some(SkipReason::Empty)
        );
        assert_eq!(
            FramePlan::prepare(&ramp(2, 8), &sequential).err(),
            Some(SkipReason::TooSmall { width: 2, height: 8 })
        );
        let nan = DepthBuffer::from_fn(3, 3, |_, _| f32::NAN);
        assert_eq!(
            FramePlan::prepare(&nan, &sequential).err(),
            Some(SkipReason::NoFiniteSamples)
        );
    }

    #[test]
    fn test_pin_height_matches_pass() {
        let buffer = ramp(9, 7);
        let grid = GridSpec::new(4, 5, 1.0, 1.0).unwrap();
        let pass = PinActuationPass::new(grid, 3.0);
        let (heights, _) = pass.compute_heights(&buffer).unwrap();

        for index in grid.indices() {
            let slot = grid.slot(index).unwrap();
            assert_eq!(pin_height(index, &buffer, &grid, 3.0), Some(heights[slot]));
        }
        assert_eq!(pin_height(PinIndex::new(4, 0), &buffer, &grid, 3.0), None);
    }

    #[test]
    fn test_heights_stay_within_scale_for_linear_field() {
        let buffer = ramp(20, 20);
        let grid = GridSpec::new(6, 6, 1.0, 1.0).unwrap();
        let pass = PinActuationPass::new(grid, 10.0);
        let (heights, range) = pass.compute_heights(&buffer).unwrap();
        assert_eq!(range, DepthRange::new(0.0, 399.0));
        for height in heights {
            assert!((0.0..=10.0).contains(&height));
        }
    }

    #[test]
    fn test_constant_frame_rests_all_pins() {
        let buffer = DepthBuffer::from_fn(8, 8, |_, _| 42.0);
        let grid = GridSpec::new(3, 3, 1.0, 1.0).unwrap();
        let mut sink = PinHeights::new(grid);
        let outcome = PinActuationPass::new(grid, 10.0).run(&buffer, &mut sink);
        assert!(outcome.is_applied());
        assert!(sink.as_slice().iter().all(|h| *h == 0.0));
        assert_eq!(sink.frames_applied(), 1);
    }

    #[test]
    fn test_nan_neighborhood_rests_pin() {
        let mut samples: Vec<f32> = (0..25).map(|i| i as f32).collect();
        samples[12] = f32::NAN;
        let buffer = DepthBuffer::new(5, 5, samples).unwrap();
        let grid = GridSpec::new(1, 1, 1.0, 1.0).unwrap();
        let (heights, _) = PinActuationPass::new(grid, 10.0).compute_heights(&buffer).unwrap();
        assert_eq!(heights, vec![0.0]);
    }

    #[test]
    fn test_parallel_and_sequential_agree_bitwise() {
        let buffer = DepthBuffer::from_fn(64, 48, |x, y| ((x as f32) * 0.37).sin() + (y as f32 * 0.11).cos());
        let grid = GridSpec::hexagonal(40, 40, 0.2).unwrap();

        let parallel = PinActuationPass::new(grid, 10.0).with_parallelism(
            Parallelism::from_config(&ThreadPoolConfig::default().with_threads(4).with_min_parallel_len(1))
                .unwrap(),
        );
        let sequential = PinActuationPass::new(grid, 10.0).with_parallelism(Parallelism::sequential());

        let (a, range_a) = parallel.compute_heights(&buffer).unwrap();
        let (b, range_b) = sequential.compute_heights(&buffer).unwrap();
        assert_eq!(range_a, range_b);
        let a_bits: Vec<u32> = a.iter().map(|h| h.to_bits()).collect();
        let b_bits: Vec<u32> = b.iter().map(|h| h.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_from_config() {
        let config = PinArtConfig::from_toml_str(
            "max_displacement = 2.5\n[grid]\nrows = 4\ncols = 6\n[parallel]\nenabled = false\n",
        )
        .unwrap();
        let pass = PinActuationPass::from_config(&config).unwrap();
        assert_eq!(pass.grid().pin_count(), 24);
        assert_relative_eq!(pass.max_displacement(), 2.5);
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::TooSmall { width: 2, height: 1 }.to_string(),
            "depth buffer 2x1 is smaller than 3x3"
        );
    }
}
