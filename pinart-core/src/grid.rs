//! Pin grid topology types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Static description of the pin array.
///
/// The pin count `rows * cols` is fixed for the lifetime of a session and is
/// independent of the resolution of incoming depth buffers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGridSpec")]
pub struct GridSpec {
    rows: usize,
    cols: usize,
    spacing_x: f32,
    spacing_y: f32,
}

#[derive(Deserialize)]
struct RawGridSpec {
    rows: usize,
    cols: usize,
    spacing_x: f32,
    spacing_y: f32,
}

impl TryFrom<RawGridSpec> for GridSpec {
    type Error = Error;

    fn try_from(raw: RawGridSpec) -> Result<Self> {
        Self::new(raw.rows, raw.cols, raw.spacing_x, raw.spacing_y)
    }
}

impl GridSpec {
    /// Create a validated grid description
    pub fn new(rows: usize, cols: usize, spacing_x: f32, spacing_y: f32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(Error::InvalidConfig(format!(
                "grid {}x{} is too large",
                rows, cols
            )));
        }
        if !(spacing_x.is_finite() && spacing_x > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "spacing_x must be positive, got {}",
                spacing_x
            )));
        }
        if !(spacing_y.is_finite() && spacing_y > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "spacing_y must be positive, got {}",
                spacing_y
            )));
        }

        Ok(Self {
            rows,
            cols,
            spacing_x,
            spacing_y,
        })
    }

    /// Honeycomb packing for pins of the given pitch.
    ///
    /// Columns are `sqrt(3) * pitch` apart and rows `1.5 * pitch` apart.
    pub fn hexagonal(rows: usize, cols: usize, pitch: f32) -> Result<Self> {
        Self::new(rows, cols, 3.0_f32.sqrt() * pitch, 1.5 * pitch)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance between adjacent pin centers within a row
    pub fn spacing_x(&self) -> f32 {
        self.spacing_x
    }

    /// Distance between adjacent rows
    pub fn spacing_y(&self) -> f32 {
        self.spacing_y
    }

    /// Total number of pins
    pub fn pin_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Linear slot of a pin in row-major order
    pub fn slot(&self, index: PinIndex) -> Option<usize> {
        if self.contains(index) {
            Some(index.row * self.cols + index.col)
        } else {
            None
        }
    }

    /// Pin index for a linear slot
    pub fn index_of(&self, slot: usize) -> Option<PinIndex> {
        if slot < self.pin_count() {
            Some(PinIndex::new(slot / self.cols, slot % self.cols))
        } else {
            None
        }
    }

    /// Check whether an index lies inside the grid
    pub fn contains(&self, index: PinIndex) -> bool {
        index.row < self.rows && index.col < self.cols
    }

    /// Iterate every pin index in row-major order
    pub fn indices(&self) -> impl Iterator<Item = PinIndex> + '_ {
        (0..self.pin_count()).map(move |slot| PinIndex::new(slot / self.cols, slot % self.cols))
    }
}

/// A pin's `(row, col)` position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinIndex {
    pub row: usize,
    pub col: usize,
}

impl PinIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Odd rows carry the half-spacing hex offset
    pub fn is_odd_row(&self) -> bool {
        self.row % 2 == 1
    }
}

/// Continuous coordinate in depth-buffer pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleCoordinate {
    pub u: f32,
    pub v: f32,
}

impl SampleCoordinate {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}
