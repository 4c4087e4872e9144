//! Landmark Stream Replay
//!
//! Feeds recorded landmark frames through a [`DrowsinessMonitor`] and
//! writes one JSON line per frame, followed by the session summary.

pub mod args;

use anyhow::{bail, Context};
use drowsiness::{
    DrowsinessEvent, DrowsinessMonitor, Frame, LandmarkSet, Point, SessionSummary, Timestamp,
    Verdict,
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// One recorded frame
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayRecord {
    /// Capture time on the recorder's monotonic clock
    #[serde(default)]
    pub t_ms: Option<u64>,
    /// `null` when the landmark model found no face
    pub landmarks: Option<Vec<[f64; 2]>>,
}

impl ReplayRecord {
    fn into_frame(self) -> Result<Frame, drowsiness::DrowsinessError> {
        match self.landmarks {
            Some(points) => {
                let points: Vec<Point> = points.into_iter().map(Point::from).collect();
                Ok(Frame::Detected(LandmarkSet::from_slice(&points)?))
            }
            None => Ok(Frame::NoFace),
        }
    }
}

/// Per-frame output line
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum FrameOutput<'a> {
    Verdict {
        frame: usize,
        t_ms: u64,
        verdict: &'a Verdict,
        events: &'a [DrowsinessEvent],
    },
    Skipped {
        frame: usize,
        t_ms: u64,
        error: String,
    },
}

#[derive(Debug, Serialize)]
struct SummaryOutput<'a> {
    summary: &'a SessionSummary,
}

/// Replay options
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub fps: u32,
    pub summary_only: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            summary_only: false,
        }
    }
}

/// Initialize logging on stderr (stdout carries the replay output).
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|d| !d.trim().is_empty());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose, directives.as_deref())?)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn log_filter(verbose: bool, directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter: {}", directives)),
        None => Ok(EnvFilter::new(if verbose { "debug" } else { "info" })),
    }
}

/// Replay a JSON Lines stream through `monitor`
pub fn run_replay<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    monitor: &mut DrowsinessMonitor,
    options: &ReplayOptions,
) -> anyhow::Result<SessionSummary> {
    if options.fps == 0 {
        bail!("fps must be at least 1");
    }

    let mut frame = 0;
    let mut skipped = 0;
    let mut alarm = monitor.alarm_active();

    for (line_no, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: ReplayRecord = serde_json::from_str(&line)
            .with_context(|| format!("Malformed record on line {}", line_no + 1))?;
        let t_ms = record
            .t_ms
            .unwrap_or(frame as u64 * 1000 / u64::from(options.fps));
        let landmarks = record
            .into_frame()
            .with_context(|| format!("Bad landmark set on line {}", line_no + 1))?;

        match monitor.process_frame(landmarks, Timestamp::from_millis(t_ms)) {
            Ok((verdict, events)) => {
                for event in &events {
                    debug!("Frame {}: {:?}", frame, event);
                }
                if verdict.alarm() != alarm {
                    alarm = verdict.alarm();
                    let state = if alarm { "ON" } else { "OFF" };
                    info!("Frame {} ({} ms): alarm {}", frame, t_ms, state);
                }
                if !options.summary_only {
                    write_line(
                        &mut output,
                        &FrameOutput::Verdict {
                            frame,
                            t_ms,
                            verdict: &verdict,
                            events: &events,
                        },
                    )?;
                }
            }
            Err(e) if e.is_frame_local() => {
                skipped += 1;
                if !options.summary_only {
                    write_line(
                        &mut output,
                        &FrameOutput::Skipped {
                            frame,
                            t_ms,
                            error: e.to_string(),
                        },
                    )?;
                }
            }
            Err(e) => return Err(e).context(format!("Frame {} failed", frame)),
        }
        frame += 1;
    }

    if skipped > 0 {
        warn!("{} of {} frames skipped for degenerate geometry", skipped, frame);
    }

    let summary = monitor.summary();
    write_line(&mut output, &SummaryOutput { summary: &summary })?;
    output.flush().context("Failed to flush output")?;
    info!(
        "Replayed {} frames: {} blinks, {} yawns, {} micro-sleeps",
        frame, summary.blink_count, summary.yawn_count, summary.micro_sleep_count
    );

    Ok(summary)
}

fn write_line<W: Write, T: Serialize>(output: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *output, value).context("Failed to encode output")?;
    output.write_all(b"\n").context("Failed to write output")?;
    Ok(())
}
