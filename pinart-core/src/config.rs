//! Session configuration
//!
//! Configuration is read once at startup, typically from a TOML file. Every
//! field has a default matching a 120x120 honeycomb display, so an empty file
//! is a valid configuration.
//!
//! ```toml
//! max_displacement = 10.0
//! input_resolution = 504
//!
//! [grid]
//! rows = 120
//! cols = 120
//! pitch = 0.2
//!
//! [parallel]
//! num_threads = 4
//! ```

use crate::error::{Error, Result};
use crate::grid::GridSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a pin art session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinArtConfig {
    pub grid: GridConfig,
    /// Height of a pin at the far end of the depth range
    pub max_displacement: f32,
    /// Square input resolution requested from the depth estimator
    pub input_resolution: u32,
    /// Period of the inference task in milliseconds
    pub inference_interval_ms: u64,
    /// Period of the actuation task in milliseconds
    pub actuation_interval_ms: u64,
    pub parallel: ParallelConfig,
    pub enclosure: EnclosureConfig,
}

/// Pin array dimensions and spacing.
///
/// Either give an explicit `spacing_x`/`spacing_y` pair or a `pitch`, from
/// which honeycomb spacings are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub pitch: f32,
    pub spacing_x: Option<f32>,
    pub spacing_y: Option<f32>,
}

/// Per-pin parallelism settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Disable to run every pass on the calling thread
    pub enabled: bool,
    /// Worker count (None = one per core)
    pub num_threads: Option<usize>,
    /// Grids with fewer pins than this are processed sequentially
    pub min_parallel_pins: usize,
}

/// Frame around the pin array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclosureConfig {
    /// Extra base plate margin on each side of the pin footprint
    pub border: f32,
    /// Mirror the array horizontally to match a mirrored video preview
    pub mirror_x: bool,
}

impl Default for PinArtConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            max_displacement: 10.0,
            input_resolution: 504,
            inference_interval_ms: 16,
            actuation_interval_ms: 16,
            parallel: ParallelConfig::default(),
            enclosure: EnclosureConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 120,
            cols: 120,
            pitch: 0.2,
            spacing_x: None,
            spacing_y: None,
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None,
            min_parallel_pins: 1024,
        }
    }
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            border: 2.0,
            mirror_x: true,
        }
    }
}

impl GridConfig {
    /// Resolve the grid description
    pub fn grid_spec(&self) -> Result<GridSpec> {
        match (self.spacing_x, self.spacing_y) {
            (Some(spacing_x), Some(spacing_y)) => {
                GridSpec::new(self.rows, self.cols, spacing_x, spacing_y)
            }
            (None, None) => GridSpec::hexagonal(self.rows, self.cols, self.pitch),
            _ => Err(Error::InvalidConfig(
                "spacing_x and spacing_y must be given together".to_string(),
            )),
        }
    }
}

impl PinArtConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every field, including that the grid resolves
    pub fn validate(&self) -> Result<()> {
        self.grid.grid_spec()?;

        if !(self.max_displacement.is_finite() && self.max_displacement >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_displacement must be a non-negative number, got {}",
                self.max_displacement
            )));
        }
        if self.input_resolution == 0 {
            return Err(Error::InvalidConfig(
                "input_resolution must be greater than 0".to_string(),
            ));
        }
        if self.inference_interval_ms == 0 || self.actuation_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "task intervals must be greater than 0".to_string(),
            ));
        }
        if self.parallel.num_threads == Some(0) {
            return Err(Error::InvalidConfig(
                "parallel.num_threads must be greater than 0".to_string(),
            ));
        }
        if !(self.enclosure.border.is_finite() && self.enclosure.border >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "enclosure.border must be a non-negative number, got {}",
                self.enclosure.border
            )));
        }

        Ok(())
    }

    /// Grid description for this session
    pub fn grid_spec(&self) -> Result<GridSpec> {
        self.grid.grid_spec()
    }
}
