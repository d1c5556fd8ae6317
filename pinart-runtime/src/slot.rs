//! Single-slot, latest-wins frame cell

use pinart_core::DepthBuffer;
use std::sync::Arc;
use tokio::sync::watch;

/// A published depth frame and its sequence number
#[derive(Debug, Clone)]
pub struct LatestFrame {
    /// Starts at 1 and grows by one per publish
    pub generation: u64,
    pub buffer: Arc<DepthBuffer>,
}

/// Holds the most recent depth buffer.
///
/// Publishing replaces the whole frame atomically; a reader gets one `Arc`
/// and keeps a consistent buffer for as long as it holds it, even if newer
/// frames arrive meanwhile.
#[derive(Debug)]
pub struct FrameSlot {
    tx: watch::Sender<Option<LatestFrame>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the current frame, returning its generation
    pub fn publish(&self, buffer: DepthBuffer) -> u64 {
        let buffer = Arc::new(buffer);
        let mut generation = 0;
        self.tx.send_modify(|current| {
            generation = current.as_ref().map_or(0, |frame| frame.generation) + 1;
            *current = Some(LatestFrame { generation, buffer });
        });
        generation
    }

    /// The current frame, if any has been published
    pub fn latest(&self) -> Option<LatestFrame> {
        self.tx.borrow().clone()
    }

    /// Generation of the current frame (0 before the first publish)
    pub fn generation(&self) -> u64 {
        self.tx.borrow().as_ref().map_or(0, |frame| frame.generation)
    }

    /// Receiver notified on every publish
    pub fn subscribe(&self) -> watch::Receiver<Option<LatestFrame>> {
        self.tx.subscribe()
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}
