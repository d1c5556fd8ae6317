//! Integration tests for pinart-algorithms
//!
//! These tests drive whole frames through the actuation pass and check the
//! heights that reach a sink.

use approx::assert_relative_eq;
use pinart_algorithms::*;
use pinart_core::{DepthBuffer, GridSpec, PinHeights, PinIndex, PinSink};

/// 4x4 ramp with values 0..=15 in row-major order
fn create_ramp_4x4() -> DepthBuffer {
    DepthBuffer::new(
        4,
        4,
        vec![
            0.0, 1.0, 2.0, 3.0, //
            4.0, 5.0, 6.0, 7.0, //
            8.0, 9.0, 10.0, 11.0, //
            12.0, 13.0, 14.0, 15.0,
        ],
    )
    .unwrap()
}

/// Sink that records every call
#[derive(Default)]
struct RecordingSink {
    frames: Vec<Vec<f32>>,
}

impl PinSink for RecordingSink {
    fn apply(&mut self, heights: &[f32]) {
        self.frames.push(heights.to_vec());
    }
}

#[test]
fn test_end_to_end_ramp_4x4() {
    let buffer = create_ramp_4x4();
    let grid = GridSpec::new(2, 2, 1.0, 1.0).unwrap();
    let pass = PinActuationPass::new(grid, 10.0);
    let mapper = pass.mapper();

    // Cell centers sit at 2 and 6 along each axis; the interior of a 4x4
    // buffer is [1, 2], so every pin resamples at (2, 2)
    assert_eq!(
        mapper.sample_coordinate(PinIndex::new(0, 0), 4, 4),
        pinart_core::SampleCoordinate::new(2.0, 2.0)
    );
    assert_eq!(
        mapper.sample_coordinate(PinIndex::new(0, 1), 4, 4),
        pinart_core::SampleCoordinate::new(6.0, 2.0)
    );

    let mut sink = PinHeights::new(grid);
    let outcome = pass.run(&buffer, &mut sink);
    assert_eq!(
        outcome,
        FrameOutcome::Applied {
            range: DepthRange::new(0.0, 15.0),
            pins: 4
        }
    );

    // Sample (2, 2) of the ramp is 10
    let expected = 10.0_f32 / 15.0 * 10.0;
    for height in sink.as_slice() {
        assert_relative_eq!(*height, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_degenerate_frame_keeps_previous_heights() {
    let grid = GridSpec::new(2, 2, 1.0, 1.0).unwrap();
    let pass = PinActuationPass::new(grid, 10.0);
    let mut sink = PinHeights::new(grid);

    assert!(pass.run(&create_ramp_4x4(), &mut sink).is_applied());
    let before = sink.clone();

    let empty = DepthBuffer::new(0, 0, Vec::new()).unwrap();
    let outcome = pass.run(&empty, &mut sink);
    assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::Empty));
    assert_eq!(sink, before);
    assert_eq!(sink.frames_applied(), 1);
}

#[test]
fn test_skipped_frames_never_reach_sink() {
    let grid = GridSpec::new(3, 3, 1.0, 1.0).unwrap();
    let pass = PinActuationPass::new(grid, 1.0);
    let mut sink = RecordingSink::default();

    pass.run(&DepthBuffer::empty(), &mut sink);
    pass.run(&DepthBuffer::from_fn(2, 2, |x, y| (x + y) as f32), &mut sink);
    pass.run(&DepthBuffer::from_fn(3, 3, |_, _| f32::NAN), &mut sink);
    assert!(sink.frames.is_empty());

    pass.run(&DepthBuffer::from_fn(3, 3, |x, y| (x * y) as f32), &mut sink);
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].len(), 9);
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let buffer = DepthBuffer::from_fn(37, 29, |x, y| {
        let (x, y) = (x as f32, y as f32);
        (x * 0.3).sin() * 4.0 + (y * 0.2).cos() * 2.0 + 0.01 * x * y
    });
    let grid = GridSpec::hexagonal(24, 24, 0.2).unwrap();
    let pass = PinActuationPass::new(grid, 10.0);

    let mut sink = RecordingSink::default();
    for _ in 0..5 {
        pass.run(&buffer, &mut sink);
    }

    let first: Vec<u32> = sink.frames[0].iter().map(|h| h.to_bits()).collect();
    for frame in &sink.frames[1..] {
        let bits: Vec<u32> = frame.iter().map(|h| h.to_bits()).collect();
        assert_eq!(bits, first);
    }
}

#[test]
fn test_resolution_change_keeps_pin_count() {
    let grid = GridSpec::hexagonal(16, 12, 0.2).unwrap();
    let pass = PinActuationPass::new(grid, 10.0);
    let mut sink = PinHeights::new(grid);

    for size in [3usize, 4, 17, 64, 252, 504] {
        let buffer = DepthBuffer::from_fn(size, size, |x, y| (x + 2 * y) as f32);
        let outcome = pass.run(&buffer, &mut sink);
        assert_eq!(
            outcome,
            FrameOutcome::Applied {
                range: DepthRange::new(0.0, (3 * (size - 1)) as f32),
                pins: 192
            }
        );
        assert_eq!(sink.len(), 192);
        assert!(sink.as_slice().iter().all(|h| h.is_finite()));
    }
}

#[test]
fn test_linear_gradient_heights_increase_along_rows() {
    // Depth grows with x only, so heights should be non-decreasing per row
    let buffer = DepthBuffer::from_fn(120, 90, |x, _| x as f32);
    let grid = GridSpec::new(5, 8, 1.0, 1.0).unwrap();
    let (heights, _) = PinActuationPass::new(grid, 10.0).compute_heights(&buffer).unwrap();

    for row in heights.chunks(grid.cols()) {
        for pair in row.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        for (height, first) in row.iter().zip(&heights[..grid.cols()]) {
            assert_relative_eq!(*height, *first, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_hex_layout_and_sampling_agree_on_slots() {
    let grid = GridSpec::new(3, 3, 2.0, 1.5).unwrap();
    let mapper = HexGridMapper::new(grid);
    let positions = mapper.positions();

    for (slot, index) in grid.indices().enumerate() {
        assert_eq!(grid.slot(index), Some(slot));
        assert_eq!(positions[slot], mapper.pin_position(index));
    }
    assert_relative_eq!(positions[3].x - positions[0].x, 1.0);
}
