//! Drowsiness Replay - Main Entry Point

use anyhow::Context;
use clap::Parser;
use drowsiness::{DrowsinessMonitor, MonitorConfig};
use replay::args::Args;
use replay::{init_logging, run_replay, ReplayOptions};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    info!("=== Drowsiness Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let config = MonitorConfig::load(args.config.as_deref()).context("Failed to load config")?;
    let mut monitor = DrowsinessMonitor::new(config)?;

    let options = ReplayOptions {
        fps: args.fps,
        summary_only: args.summary_only,
    };
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    if args.input == "-" {
        run_replay(io::stdin().lock(), output, &mut monitor, &options)?;
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input))?;
        run_replay(BufReader::new(file), output, &mut monitor, &options)?;
    }

    Ok(())
}
