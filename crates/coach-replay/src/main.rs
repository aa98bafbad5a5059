//! Coaching Replay - Main Entry Point

use alerting::ThrottleConfig;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coach_replay::{init_logging, run_replay, ReplayOptions};
use coaching::{AnalyzerConfig, CoachingAnalyzer};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn, Level};

/// Replay recorded landmark frames through the coaching analyzer
#[derive(Parser)]
#[command(name = "coach-replay")]
#[command(version)]
#[command(about = "Analyze a recorded landmark stream (NDJSON in, NDJSON out)", long_about = None)]
struct Cli {
    /// Input file with one landmark frame per line (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Analyzer configuration file (toml, json, or yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suppress repeated feedback like a live UI would
    #[arg(long)]
    throttle: bool,

    /// Frames before a repeated message may be shown again
    #[arg(long, default_value = "45", requires = "throttle")]
    cooldown_frames: u64,

    /// Append a session summary line
    #[arg(long)]
    summary: bool,

    /// Log verbosity (logs go to stderr)
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.into()).context("failed to install tracing subscriber")?;

    info!("=== Coaching Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let config =
        AnalyzerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let mut analyzer = CoachingAnalyzer::new(config)?;
    if let Err(e) = analyzer.initialize() {
        // Every frame will carry the fallback result
        warn!("Continuing without landmark analysis: {}", e);
    }

    let options = ReplayOptions {
        throttle: cli.throttle.then(|| ThrottleConfig {
            cooldown_frames: cli.cooldown_frames,
            ..Default::default()
        }),
        summary: cli.summary,
    };

    let stdout = io::stdout();
    let stats = if cli.input.as_os_str() == "-" {
        run_replay(&mut analyzer, io::stdin().lock(), stdout.lock(), &options)?
    } else {
        let file = File::open(&cli.input)
            .with_context(|| format!("failed to open {}", cli.input.display()))?;
        run_replay(&mut analyzer, BufReader::new(file), stdout.lock(), &options)?
    };

    analyzer.release();
    if stats.skipped > 0 {
        info!("{} malformed lines skipped", stats.skipped);
    }
    Ok(())
}
