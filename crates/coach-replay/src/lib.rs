//! Coaching Replay
//!
//! Feeds a recorded stream of landmark frames (one JSON object per line)
//! through the coaching analyzer and writes one analysis result per line.

use alerting::{FeedbackThrottle, ThrottleConfig};
use coaching::{CoachingAnalyzer, SessionSummary};
use landmarks::LandmarkFrame;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay error types
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Replay options
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Suppress repeated feedback the way a live UI would
    pub throttle: Option<ThrottleConfig>,
    /// Append a session summary line after the last frame
    pub summary: bool,
}

/// Counts for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: usize,
    pub frames: usize,
    pub skipped: usize,
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a SessionSummary,
}

/// Initialize tracing, logging to stderr so stdout stays machine-readable
pub fn init_logging(level: Level) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

/// Run every frame of `input` through `analyzer`, writing results to `output`
///
/// Lines that do not parse as a frame are logged and skipped.
pub fn run_replay<R: BufRead, W: Write>(
    analyzer: &mut CoachingAnalyzer,
    input: R,
    mut output: W,
    options: &ReplayOptions,
) -> Result<ReplayStats, ReplayError> {
    let mut throttle = options.throttle.clone().map(FeedbackThrottle::new);
    let mut stats = ReplayStats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        stats.lines += 1;
        if line.trim().is_empty() {
            continue;
        }

        let frame: LandmarkFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                stats.skipped += 1;
                continue;
            }
        };

        let mut result = analyzer.analyze(&frame);
        if let Some(throttle) = throttle.as_mut() {
            result.feedback = throttle.filter(&result.feedback);
        }

        serde_json::to_writer(&mut output, &result)?;
        output.write_all(b"\n")?;
        stats.frames += 1;
    }

    if options.summary {
        let summary = analyzer.summary();
        serde_json::to_writer(&mut output, &SummaryLine { summary: &summary })?;
        output.write_all(b"\n")?;
    }
    output.flush()?;

    if let Some(throttle) = &throttle {
        info!("Throttle suppressed {} feedback items", throttle.suppressed_count());
    }
    info!(
        "Replayed {} frames ({} lines, {} skipped), average score {:.1}",
        stats.frames,
        stats.lines,
        stats.skipped,
        analyzer.get_average_score()
    );
    Ok(stats)
}
