//! Core traits for pinart

/// Consumer of per-frame pin heights, typically a renderer.
///
/// `apply` receives one height per pin in row-major `row * cols + col` order
/// and is called at most once per processed frame. Skipped frames never reach
/// the sink, so whatever it last received stays in effect.
pub trait PinSink {
    /// Receive the heights of one frame
    fn apply(&mut self, heights: &[f32]);
}

impl PinSink for Vec<f32> {
    fn apply(&mut self, heights: &[f32]) {
        self.clear();
        self.extend_from_slice(heights);
    }
}

impl<S: PinSink + ?Sized> PinSink for &mut S {
    fn apply(&mut self, heights: &[f32]) {
        (**self).apply(heights);
    }
}

impl<S: PinSink + ?Sized> PinSink for Box<S> {
    fn apply(&mut self, heights: &[f32]) {
        (**self).apply(heights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_replaces_contents() {
        let mut sink = vec![9.0, 9.0, 9.0];
        sink.apply(&[1.0, 2.0]);
        assert_eq!(sink, vec![1.0, 2.0]);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<Vec<f32>> = Box::new(Vec::new());
        sink.apply(&[3.0]);
        assert_eq!(*sink, vec![3.0]);
    }
}
