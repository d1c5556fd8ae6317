//! Live session example for pinart
//!
//! Drives a full session from an analytic depth source:
//! - inference and actuation on independent intervals
//! - a live input-resolution change halfway through, like an operator slider
//! - final pin positions in world space, ready for a renderer

use anyhow::Context;
use clap::Parser;
use pinart_algorithms::{HexGridMapper, PinLayout};
use pinart_core::{PinArtConfig, PinHeights};
use pinart_runtime::{PinArtSession, SyntheticDepth};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Run a pin art session on a synthetic depth feed")]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run, in seconds
    #[arg(short, long, default_value_t = 3.0)]
    seconds: f32,

    /// Input resolution to switch to halfway through the run
    #[arg(long, default_value_t = 252)]
    switch_resolution: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PinArtConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PinArtConfig::default(),
    };
    let grid = config.grid_spec()?;

    let session = PinArtSession::start(&config, SyntheticDepth::new(), PinHeights::new(grid))?;

    let half = Duration::from_secs_f32(args.seconds.max(0.0) / 2.0);
    tokio::time::sleep(half).await;
    session.resolution().set(args.switch_resolution)?;
    let stats = session.stats();
    info!(
        published = stats.frames_published,
        fps = stats.inference_fps as f64,
        "Halfway"
    );
    tokio::time::sleep(half).await;

    let report = session.shutdown().await?;
    let heights = report.sink;

    println!("pinart synthetic feed");
    println!("=====================");
    println!("Grid: {}x{} pins", grid.rows(), grid.cols());
    println!("Frames published: {}", report.stats.frames_published);
    println!("Frames actuated:  {}", report.stats.passes_applied);
    println!("Frames skipped:   {}", report.stats.passes_skipped);
    println!("Frames dropped:   {}", report.stats.frames_dropped);
    println!("Inference FPS:    {:.2}", report.stats.inference_fps);

    let (lowest, highest) = heights
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| (lo.min(*h), hi.max(*h)));
    println!("Height range:     {:.3} .. {:.3}", lowest, highest);

    let layout = PinLayout::new(HexGridMapper::new(grid), &config.enclosure);
    let enclosure = layout.enclosure();
    println!(
        "Base plate:       {:.2} x {:.2}",
        enclosure.width, enclosure.depth
    );

    let positions = layout.world_positions(heights.as_slice());
    println!("\nFirst pins (x, height, z):");
    for position in positions.iter().take(4) {
        println!("  ({:7.3}, {:6.3}, {:7.3})", position.x, position.y, position.z);
    }

    Ok(())
}
