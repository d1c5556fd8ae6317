//! Live control of the inference input resolution

use pinart_core::{Error, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared, operator-adjustable input resolution.
///
/// Clones share the same value. A change only affects the size of future
/// depth buffers; the pin grid is never touched.
#[derive(Debug, Clone)]
pub struct ResolutionControl {
    value: Arc<AtomicU32>,
}

impl ResolutionControl {
    pub fn new(initial: u32) -> Self {
        Self {
            value: Arc::new(AtomicU32::new(initial.max(1))),
        }
    }

    /// Resolution the next inference request will use
    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Change the resolution for subsequent requests
    pub fn set(&self, resolution: u32) -> Result<()> {
        if resolution == 0 {
            return Err(Error::InvalidConfig(
                "input resolution must be greater than 0".to_string(),
            ));
        }
        let previous = self.value.swap(resolution, Ordering::Relaxed);
        if previous != resolution {
            info!(previous, resolution, "Input resolution changed");
        }
        Ok(())
    }
}
