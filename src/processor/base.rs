//! Run mode, config checks and progress output shared by build and verify runs

use crate::errors::{AppError, AppResult};
use crate::types::statistics::{ProcessingStats, StatisticsCollector};
use crate::types::ProcessorConfig;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Batches above this size hold a lot of decoded scripts in memory at once
const LARGE_BATCH_SIZE: usize = 100_000;

/// Whether a run may create addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Resolve or create every identity, recording each output
    Build,
    /// Resolve only; a missing identity is counted as a mismatch
    Verify,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Build => "build",
            ProcessingMode::Verify => "verify",
        }
    }
}

/// Reject processor settings that cannot drive a run
pub fn validate_config(config: &ProcessorConfig) -> AppResult<()> {
    let zero_field = [
        ("Batch size", config.batch_size),
        ("Progress interval", config.progress_interval),
        ("Decode thread count", config.decode_threads),
    ]
    .into_iter()
    .find(|(_, value)| *value == 0);

    if let Some((name, _)) = zero_field {
        return Err(AppError::Config(format!("{} must be greater than 0", name)));
    }
    if config.batch_size > LARGE_BATCH_SIZE {
        warn!(
            "Batch size {} decodes more than {} scripts per batch",
            config.batch_size, LARGE_BATCH_SIZE
        );
    }
    Ok(())
}

/// Compact elapsed time: `4.2s`, `3m 07s`, `26h 01m 40s`
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..=59 => format!("{:.1}s", elapsed.as_secs_f64()),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!(
            "{}h {:02}m {:02}s",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ),
    }
}

/// In-place progress line for one run, throttled to `interval`
pub struct ProgressReporter {
    mode: ProcessingMode,
    total_records: Option<u64>,
    interval: Duration,
    last_report: Instant,
}

impl ProgressReporter {
    pub fn new(mode: ProcessingMode, total_records: u64) -> Self {
        Self {
            mode,
            total_records: (total_records > 0).then_some(total_records),
            interval: Duration::from_millis(500),
            last_report: Instant::now(),
        }
    }

    /// Render the progress line for the current state of a run
    pub fn progress_line(&self, stats: &ProcessingStats) -> String {
        let read = match self.total_records {
            Some(total) => format!(
                "{}/{} ({:.1}%)",
                stats.total_records,
                total,
                stats.total_records as f64 / total as f64 * 100.0
            ),
            None => stats.total_records.to_string(),
        };
        let outcome = match self.mode {
            ProcessingMode::Build => format!("New addresses: {}", stats.new_addresses),
            ProcessingMode::Verify => format!("Mismatches: {}", stats.mismatches),
        };

        format!(
            "[{}] Read: {} | {:.0}/sec | {} | {} | Malformed: {}",
            self.mode.as_str(),
            read,
            stats.processing_rate(),
            format_duration(stats.timing.elapsed()),
            outcome,
            stats.malformed_records
        )
    }

    /// Redraw the progress line if the throttle interval has passed
    pub fn tick(&mut self, stats: &ProcessingStats) -> AppResult<()> {
        if self.last_report.elapsed() < self.interval {
            return Ok(());
        }
        self.last_report = Instant::now();

        let mut stdout = std::io::stdout();
        write!(stdout, "\r{}", self.progress_line(stats))?;
        stdout.flush()?;
        Ok(())
    }

    /// End the progress line and log the run's outcome
    pub fn finish(&self, stats: &ProcessingStats) {
        println!();
        info!("=== {} run complete ===", self.mode.as_str());
        info!("  Records read: {}", stats.total_records);
        info!("  Outputs {}: {}", self.verb(), stats.outputs_processed);
        match self.mode {
            ProcessingMode::Build => info!("  New addresses: {}", stats.new_addresses),
            ProcessingMode::Verify => info!("  Mismatches: {}", stats.mismatches),
        }
        info!("  Malformed records: {}", stats.malformed_records);
        info!(
            "  Elapsed: {} ({:.1} records/sec)",
            format_duration(stats.timing.elapsed()),
            stats.processing_rate()
        );
    }

    fn verb(&self) -> &'static str {
        match self.mode {
            ProcessingMode::Build => "registered",
            ProcessingMode::Verify => "checked",
        }
    }
}
