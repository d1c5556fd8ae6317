//! Boundary with the depth inference engine

use pinart_core::{DepthBuffer, Result};
use std::future::Future;

/// Produces one depth buffer per request.
///
/// `resolution` is the square input size the operator currently wants fed to
/// the model. Output dimensions are up to the engine and may differ from it
/// and from call to call.
pub trait DepthEstimator: Send {
    /// Estimate depth for the current video frame
    fn estimate(&mut self, resolution: u32) -> impl Future<Output = Result<DepthBuffer>> + Send;
}

/// Analytic depth source: a paraboloid bowl drifting in a circle.
///
/// Stands in for a model when no camera or network is available. Each call
/// advances the animation by one frame and returns a `resolution` square
/// buffer.
#[derive(Debug, Clone)]
pub struct SyntheticDepth {
    frame: u64,
    /// Radians of drift per frame
    pub speed: f32,
}

impl SyntheticDepth {
    pub fn new() -> Self {
        Self {
            frame: 0,
            speed: 0.05,
        }
    }

    /// Number of frames produced so far
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Render the frame at index `frame`
    pub fn render(&self, frame: u64, resolution: u32) -> DepthBuffer {
        let size = resolution as usize;
        let angle = frame as f32 * self.speed;
        let cx = 0.5 + 0.25 * angle.cos();
        let cy = 0.5 + 0.25 * angle.sin();
        let scale = size.max(1) as f32;

        DepthBuffer::from_fn(size, size, |x, y| {
            let dx = x as f32 / scale - cx;
            let dy = y as f32 / scale - cy;
            1.0 - (dx * dx + dy * dy)
        })
    }
}

impl Default for SyntheticDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthEstimator for SyntheticDepth {
    fn estimate(&mut self, resolution: u32) -> impl Future<Output = Result<DepthBuffer>> + Send {
        let buffer = self.render(self.frame, resolution);
        self.frame += 1;
        async move { Ok(buffer) }
    }
}
