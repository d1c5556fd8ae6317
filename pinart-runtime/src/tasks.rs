//! The two periodic tasks of a session
//!
//! Both loops tick on their own interval, skip missed ticks instead of
//! bursting to catch up, and exit when the shutdown flag flips to `true` (or
//! its sender goes away).

use crate::estimator::DepthEstimator;
use crate::slot::FrameSlot;
use crate::resolution::ResolutionControl;
use crate::stats::{FpsMeter, FrameStats};
use pinart_algorithms::{FrameOutcome, PinActuationPass};
use pinart_core::{DepthBuffer, PinSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shared handles both tasks work with
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub slot: Arc<FrameSlot>,
    pub stats: Arc<FrameStats>,
    pub shutdown: watch::Receiver<bool>,
}

fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Waits for the next tick; `false` once shutdown is requested
async fn next_tick(interval: &mut time::Interval, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return false;
    }
    tokio::select! {
        biased;
        changed = shutdown.changed() => changed.is_ok() && !*shutdown.borrow(),
        _ = interval.tick() => true,
    }
}

/// Run one pass, moving parallel work off the async worker when the runtime
/// allows it.
///
/// A rayon fan-out holds the calling thread until every pin is done; on a
/// multi-threaded runtime `block_in_place` hands this worker's other tasks to
/// a sibling for that duration. `block_in_place` panics on a current-thread
/// runtime, so there the pass runs inline.
pub fn run_pass<S: PinSink + ?Sized>(pass: &PinActuationPass, buffer: &DepthBuffer, sink: &mut S) -> FrameOutcome {
    let multi_thread = Handle::try_current()
        .map(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
        .unwrap_or(false);

    if multi_thread && pass.is_parallel() {
        tokio::task::block_in_place(|| pass.run(buffer, sink))
    } else {
        pass.run(buffer, sink)
    }
}

/// Request a depth buffer every `period` and publish it into the slot.
///
/// Only one request is in flight at a time; a slow estimator simply lowers
/// the frame rate. Failed requests are logged and counted, never fatal.
/// Returns the estimator when the loop stops.
pub async fn run_inference<E: DepthEstimator>(
    mut estimator: E,
    resolution: ResolutionControl,
    mut ctx: TaskContext,
    period: Duration,
) -> E {
    let mut interval = ticker(period);
    let mut fps = FpsMeter::new();
    info!(period_ms = period.as_millis() as u64, "Inference task started");

    while next_tick(&mut interval, &mut ctx.shutdown).await {
        let requested = resolution.get();

        let result = tokio::select! {
            biased;
            _ = ctx.shutdown.changed() => break,
            result = estimator.estimate(requested) => result,
        };

        match result {
            Ok(buffer) => {
                let (width, height) = (buffer.width(), buffer.height());
                let generation = ctx.slot.publish(buffer);
                ctx.stats.record_published();
                if let Some(rate) = fps.tick(Instant::now()) {
                    ctx.stats.set_inference_fps(rate);
                }
                debug!(generation, width, height, requested, "Published depth frame");
            }
            Err(e) => {
                ctx.stats.record_estimator_error();
                warn!(error = %e, requested, "Depth estimation failed, frame discarded");
            }
        }
    }

    info!("Inference task exiting");
    estimator
}

/// Run the actuation pass on the latest frame every `period`.
///
/// A frame is processed at most once; ticks with no new frame leave the sink
/// alone. Returns the sink when the loop stops.
pub async fn run_actuation<S: PinSink + Send>(
    pass: PinActuationPass,
    mut sink: S,
    mut ctx: TaskContext,
    period: Duration,
) -> S {
    let mut interval = ticker(period);
    let mut last_generation = 0u64;
    info!(
        period_ms = period.as_millis() as u64,
        pins = pass.grid().pin_count(),
        "Actuation task started"
    );

    while next_tick(&mut interval, &mut ctx.shutdown).await {
        let Some(frame) = ctx.slot.latest() else {
            continue;
        };
        if frame.generation == last_generation {
            continue;
        }

        ctx.stats.record_dropped(frame.generation - last_generation - 1);
        last_generation = frame.generation;

        match run_pass(&pass, &frame.buffer, &mut sink) {
            FrameOutcome::Applied { .. } => ctx.stats.record_applied(),
            FrameOutcome::Skipped(reason) => {
                ctx.stats.record_skipped();
                debug!(generation = frame.generation, %reason, "Frame skipped, pins unchanged");
            }
        }
    }

    info!("Actuation task exiting");
    sink
}
