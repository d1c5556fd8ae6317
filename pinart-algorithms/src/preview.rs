//! Grayscale preview of a depth buffer
//!
//! Near values (high raw depth) render dark and far values light, which is
//! how the depth overlay is shown next to the video feed.

use crate::normalize::compute_range;
use image::{Rgba, RgbaImage};
use pinart_core::DepthBuffer;

/// Render `buffer` as an opaque grayscale image.
///
/// Returns `None` for buffers without usable samples or with dimensions that
/// do not fit an image.
pub fn depth_preview(buffer: &DepthBuffer) -> Option<RgbaImage> {
    let range = compute_range(buffer)?;
    let width = u32::try_from(buffer.width()).ok()?;
    let height = u32::try_from(buffer.height()).ok()?;
    let samples = buffer.samples();

    Some(RgbaImage::from_fn(width, height, |x, y| {
        let value = samples[y as usize * buffer.width() + x as usize];
        let gray = preview_intensity(range.normalize(value));
        Rgba([gray, gray, gray, 255])
    }))
}

/// Map a normalized depth to an 8-bit intensity, inverted
pub fn preview_intensity(norm: f32) -> u8 {
    // NaN saturates to 0 through the cast
    (255.0 * (1.0 - norm)).round().clamp(0.0, 255.0) as u8
}
