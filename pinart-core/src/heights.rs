//! Flat pin height buffers

use crate::error::{Error, Result};
use crate::grid::{GridSpec, PinIndex};
use crate::traits::PinSink;
use serde::{Deserialize, Serialize};

/// Row-major pin heights for one grid.
///
/// Acts as the in-process sink: the buffer keeps the last applied frame, so a
/// skipped frame leaves the previous heights in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPinHeights")]
pub struct PinHeights {
    grid: GridSpec,
    heights: Vec<f32>,
    frames_applied: u64,
}

#[derive(Deserialize)]
struct RawPinHeights {
    grid: GridSpec,
    heights: Vec<f32>,
    #[serde(default)]
    frames_applied: u64,
}

impl TryFrom<RawPinHeights> for PinHeights {
    type Error = Error;

    fn try_from(raw: RawPinHeights) -> Result<Self> {
        if raw.heights.len() != raw.grid.pin_count() {
            return Err(Error::Shape {
                width: raw.grid.cols(),
                height: raw.grid.rows(),
                expected: raw.grid.pin_count(),
                actual: raw.heights.len(),
            });
        }
        Ok(Self {
            grid: raw.grid,
            heights: raw.heights,
            frames_applied: raw.frames_applied,
        })
    }
}

impl PinHeights {
    /// All pins at rest (height zero)
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            heights: vec![0.0; grid.pin_count()],
            frames_applied: 0,
        }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Heights in row-major order
    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    /// Heights as raw bytes, ready for a GPU instance buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.heights)
    }

    /// Height of a single pin
    pub fn get(&self, index: PinIndex) -> Option<f32> {
        self.grid
            .slot(index)
            .and_then(|slot| self.heights.get(slot).copied())
    }

    /// Number of frames written so far
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Iterate `(index, height)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (PinIndex, f32)> + '_ {
        self.grid.indices().zip(self.heights.iter().copied())
    }
}

impl PinSink for PinHeights {
    fn apply(&mut self, heights: &[f32]) {
        // A frame for a different grid would scramble the slot mapping
        if heights.len() != self.heights.len() {
            return;
        }
        self.heights.copy_from_slice(heights);
        self.frames_applied += 1;
    }
}
