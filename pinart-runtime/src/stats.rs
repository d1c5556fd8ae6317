//! Frame counters shared between the runtime tasks

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tokio::time::Instant;

/// Counters updated by the inference and actuation tasks
#[derive(Debug, Default)]
pub struct FrameStats {
    frames_published: AtomicU64,
    estimator_errors: AtomicU64,
    passes_applied: AtomicU64,
    passes_skipped: AtomicU64,
    frames_dropped: AtomicU64,
    inference_fps_bits: AtomicU32,
}

/// Point-in-time copy of [`FrameStats`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsSnapshot {
    pub frames_published: u64,
    pub estimator_errors: u64,
    pub passes_applied: u64,
    pub passes_skipped: u64,
    /// Published frames that were superseded before any pass read them
    pub frames_dropped: u64,
    pub inference_fps: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_published(&self) {
        self.frames_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_estimator_error(&self) {
        self.estimator_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_applied(&self) {
        self.passes_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.passes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: u64) {
        if count > 0 {
            self.frames_dropped.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub fn set_inference_fps(&self, fps: f32) {
        self.inference_fps_bits.store(fps.to_bits(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_published: self.frames_published.load(Ordering::Relaxed),
            estimator_errors: self.estimator_errors.load(Ordering::Relaxed),
            passes_applied: self.passes_applied.load(Ordering::Relaxed),
            passes_skipped: self.passes_skipped.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            inference_fps: f32::from_bits(self.inference_fps_bits.load(Ordering::Relaxed)),
        }
    }
}

/// Frames per second from the gap between consecutive frames
#[derive(Debug, Default)]
pub struct FpsMeter {
    previous: Option<Instant>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at `now`; `None` for the first frame
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let fps = self.previous.and_then(|previous| {
            let elapsed = now.saturating_duration_since(previous).as_secs_f32();
            (elapsed > 0.0).then(|| 1.0 / elapsed)
        });
        self.previous = Some(now);
        fps
    }
}
