//! One-frame example for pinart
//!
//! Runs a single actuation pass without any runtime, prints the heights of a
//! small grid and optionally writes the grayscale depth preview.

use clap::Parser;
use pinart_algorithms::{depth_preview, PinActuationPass};
use pinart_core::{GridSpec, PinHeights};
use pinart_runtime::SyntheticDepth;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Actuate a small pin grid from one synthetic depth frame")]
struct Args {
    /// Depth buffer resolution
    #[arg(short, long, default_value_t = 64)]
    resolution: u32,

    /// Pin rows and columns
    #[arg(short, long, default_value_t = 8)]
    pins: usize,

    /// Write the depth preview PNG here
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let grid = GridSpec::hexagonal(args.pins, args.pins, 0.2)?;
    let pass = PinActuationPass::new(grid, 10.0);
    let buffer = SyntheticDepth::new().render(0, args.resolution);

    let mut heights = PinHeights::new(grid);
    let outcome = pass.run(&buffer, &mut heights);
    println!("Outcome: {:?}", outcome);

    for row in heights.as_slice().chunks(grid.cols()) {
        let line: Vec<String> = row.iter().map(|h| format!("{:5.2}", h)).collect();
        println!("{}", line.join(" "));
    }

    if let Some(path) = &args.preview {
        match depth_preview(&buffer) {
            Some(image) => {
                image.save(path)?;
                println!("Preview written to {}", path.display());
            }
            None => println!("Frame has no usable samples, no preview written"),
        }
    }

    Ok(())
}
