//! Physical layout of the pin array and its enclosure

use crate::hex_grid::HexGridMapper;
use nalgebra::{Point2, Point3};
use pinart_core::{EnclosureConfig, PinIndex};

/// Base plate and corner pillars framing the pin footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enclosure {
    /// Base plate extent along x
    pub width: f32,
    /// Base plate extent along the row axis
    pub depth: f32,
    /// Margin between the footprint and the plate edge
    pub border: f32,
}

impl Enclosure {
    /// Size an enclosure around a grid's footprint
    pub fn around(mapper: &HexGridMapper, border: f32) -> Self {
        let (width, depth) = mapper.footprint();
        Self {
            width: width + border * 2.0,
            depth: depth + border * 2.0,
            border,
        }
    }

    /// Corner pillar centers, inset by half the border, centered on the origin
    pub fn pillar_positions(&self) -> [Point2<f32>; 4] {
        let x = self.width / 2.0 - self.border / 2.0;
        let z = self.depth / 2.0 - self.border / 2.0;
        [
            Point2::new(-x, -z),
            Point2::new(-x, z),
            Point2::new(x, -z),
            Point2::new(x, z),
        ]
    }
}

/// Places pins in a y-up world with the array centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinLayout {
    mapper: HexGridMapper,
    enclosure: Enclosure,
    mirror_x: bool,
}

impl PinLayout {
    pub fn new(mapper: HexGridMapper, config: &EnclosureConfig) -> Self {
        Self {
            enclosure: Enclosure::around(&mapper, config.border),
            mapper,
            mirror_x: config.mirror_x,
        }
    }

    pub fn enclosure(&self) -> &Enclosure {
        &self.enclosure
    }

    pub fn mapper(&self) -> &HexGridMapper {
        &self.mapper
    }

    /// Ground-plane position `(x, z)` of a pin
    pub fn ground_position(&self, index: PinIndex) -> Point2<f32> {
        let centered = self.mapper.centered_position(index);
        let x = if self.mirror_x { -centered.x } else { centered.x };
        Point2::new(x, centered.y)
    }

    /// World positions for a frame of heights given in row-major order.
    ///
    /// Extra heights past the pin count are ignored, missing ones leave the
    /// pin at rest.
    pub fn world_positions(&self, heights: &[f32]) -> Vec<Point3<f32>> {
        self.mapper
            .grid()
            .indices()
            .enumerate()
            .map(|(slot, index)| {
                let ground = self.ground_position(index);
                let height = heights.get(slot).copied().unwrap_or(0.0);
                Point3::new(ground.x, height, ground.y)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pinart_core::GridSpec;

    fn mapper() -> HexGridMapper {
        HexGridMapper::new(GridSpec::new(3, 4, 2.0, 1.5).unwrap())
    }

    #[test]
    fn test_enclosure_adds_border() {
        let enclosure = Enclosure::around(&mapper(), 2.0);
        assert_relative_eq!(enclosure.width, 11.0);
        assert_relative_eq!(enclosure.depth, 7.0);

        let pillars = enclosure.pillar_positions();
        assert_eq!(pillars[0], Point2::new(-4.5, -2.5));
        assert_eq!(pillars[3], Point2::new(4.5, 2.5));
    }

    #[test]
    fn test_mirrored_layout() {
        let config = EnclosureConfig {
            border: 1.0,
            mirror_x: true,
        };
        let layout = PinLayout::new(mapper(), &config);
        let first = layout.ground_position(PinIndex::new(0, 0));
        assert_relative_eq!(first.x, 3.5);
        assert_relative_eq!(first.y, -1.5);

        let plain = PinLayout::new(
            mapper(),
            &EnclosureConfig {
                border: 1.0,
                mirror_x: false,
            },
        );
        assert_relative_eq!(plain.ground_position(PinIndex::new(0, 0)).x, -3.5);
    }

    #[test]
    fn test_world_positions_carry_heights() {
        let layout = PinLayout::new(mapper(), &EnclosureConfig::default());
        let heights: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let positions = layout.world_positions(&heights);
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[5].y, 5.0);

        let short = layout.world_positions(&heights[..2]);
        assert_eq!(short[11].y, 0.0);
    }
}
