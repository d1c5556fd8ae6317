//! Hexagonal pin topology and the pin-to-buffer sampling map

use nalgebra::Point2;
use pinart_core::{GridSpec, PinIndex, SampleCoordinate};

/// Maps pin indices to physical positions and to depth-buffer coordinates.
///
/// Physically, odd rows are shifted by half the column spacing (honeycomb
/// packing). The sampling map ignores that shift: pins are spread evenly over
/// the buffer so a fixed pin count can sample buffers of any resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGridMapper {
    grid: GridSpec,
}

impl HexGridMapper {
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Physical pin center, with the grid's first pin at the origin
    pub fn pin_position(&self, index: PinIndex) -> Point2<f32> {
        let hx = self.grid.spacing_x();
        let offset = if index.is_odd_row() { hx / 2.0 } else { 0.0 };
        Point2::new(
            index.col as f32 * hx + offset,
            index.row as f32 * self.grid.spacing_y(),
        )
    }

    /// Extent `(width, height)` covered by pin centers, including the odd-row shift.
    ///
    /// This is the exact span of the centers, not `(n - 1) * spacing + pitch`;
    /// pin radius is left to the enclosure border.
    pub fn footprint(&self) -> (f32, f32) {
        let hx = self.grid.spacing_x();
        let shift = if self.grid.rows() > 1 { hx / 2.0 } else { 0.0 };
        (
            self.grid.cols().saturating_sub(1) as f32 * hx + shift,
            self.grid.rows().saturating_sub(1) as f32 * self.grid.spacing_y(),
        )
    }

    /// Pin center relative to the footprint's center
    pub fn centered_position(&self, index: PinIndex) -> Point2<f32> {
        let (width, height) = self.footprint();
        let position = self.pin_position(index);
        Point2::new(position.x - width / 2.0, position.y - height / 2.0)
    }

    /// All physical positions in row-major order
    pub fn positions(&self) -> Vec<Point2<f32>> {
        self.grid.indices().map(|index| self.pin_position(index)).collect()
    }

    /// Buffer-space distance between neighbouring pins.
    ///
    /// The buffer extent is divided by `cols - 1` and `rows - 1`; a single
    /// column or row takes the whole extent as its step.
    pub fn sample_step(&self, width: usize, height: usize) -> (f32, f32) {
        let intervals_x = self.grid.cols().saturating_sub(1).max(1);
        let intervals_y = self.grid.rows().saturating_sub(1).max(1);
        (
            width as f32 / intervals_x as f32,
            height as f32 / intervals_y as f32,
        )
    }

    /// Buffer coordinate sampled for a pin: the center of its cell.
    ///
    /// Coordinates for the last row/column can land past the buffer edge;
    /// the resampler clamps them back in.
    pub fn sample_coordinate(&self, index: PinIndex, width: usize, height: usize) -> SampleCoordinate {
        let (step_x, step_y) = self.sample_step(width, height);
        SampleCoordinate::new(
            (index.col as f32 + 0.5) * step_x,
            (index.row as f32 + 0.5) * step_y,
        )
    }
}
