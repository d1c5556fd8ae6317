//! Session lifecycle: spawn both tasks, expose controls, shut down cleanly

use crate::estimator::DepthEstimator;
use crate::resolution::ResolutionControl;
use crate::slot::FrameSlot;
use crate::stats::{FrameStats, StatsSnapshot};
use crate::tasks::{run_actuation, run_inference, TaskContext};
use pinart_algorithms::PinActuationPass;
use pinart_core::{Error, PinArtConfig, PinSink, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// What a session hands back after shutdown
#[derive(Debug)]
pub struct SessionReport<E, S> {
    pub estimator: E,
    pub sink: S,
    pub stats: StatsSnapshot,
}

/// A running pair of inference and actuation tasks
pub struct PinArtSession<E, S> {
    inference: JoinHandle<E>,
    actuation: JoinHandle<S>,
    shutdown: watch::Sender<bool>,
    slot: Arc<FrameSlot>,
    stats: Arc<FrameStats>,
    resolution: ResolutionControl,
}

impl<E, S> PinArtSession<E, S>
where
    E: DepthEstimator + 'static,
    S: PinSink + Send + 'static,
{
    /// Spawn both tasks on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start(config: &PinArtConfig, estimator: E, sink: S) -> Result<Self> {
        config.validate()?;
        let pass = PinActuationPass::from_config(config)?;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let slot = Arc::new(FrameSlot::new());
        let stats = Arc::new(FrameStats::new());
        let resolution = ResolutionControl::new(config.input_resolution);

        let ctx = TaskContext {
            slot: Arc::clone(&slot),
            stats: Arc::clone(&stats),
            shutdown: shutdown_rx,
        };

        info!(
            rows = pass.grid().rows(),
            cols = pass.grid().cols(),
            resolution = config.input_resolution,
            "Starting pin art session"
        );

        let inference = tokio::spawn(run_inference(
            estimator,
            resolution.clone(),
            ctx.clone(),
            Duration::from_millis(config.inference_interval_ms),
        ));
        let actuation = tokio::spawn(run_actuation(
            pass,
            sink,
            ctx,
            Duration::from_millis(config.actuation_interval_ms),
        ));

        Ok(Self {
            inference,
            actuation,
            shutdown,
            slot,
            stats,
            resolution,
        })
    }

    /// Live control of the inference input resolution
    pub fn resolution(&self) -> &ResolutionControl {
        &self.resolution
    }

    /// The latest-frame slot shared by both tasks
    pub fn slot(&self) -> &Arc<FrameSlot> {
        &self.slot
    }

    /// Current counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop both tasks and wait for them to return their state
    pub async fn shutdown(self) -> Result<SessionReport<E, S>> {
        // Receivers live inside the tasks; a send error only means they already exited
        let _ = self.shutdown.send(true);

        let estimator = self
            .inference
            .await
            .map_err(|e| Error::Task(format!("inference task failed: {}", e)))?;
        let sink = self
            .actuation
            .await
            .map_err(|e| Error::Task(format!("actuation task failed: {}", e)))?;

        let stats = self.stats.snapshot();
        info!(
            published = stats.frames_published,
            applied = stats.passes_applied,
            dropped = stats.frames_dropped,
            "Pin art session stopped"
        );

        Ok(SessionReport {
            estimator,
            sink,
            stats,
        })
    }
}
