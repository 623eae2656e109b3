//! Statistics collected while building or verifying an address index

use crate::script::AddressType;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Common trait for all statistics collectors
pub trait StatisticsCollector {
    /// Reset all counters to zero
    fn reset(&mut self);

    /// Get the processing start time
    fn start_time(&self) -> Instant;

    /// Get the total processing duration
    fn duration(&self) -> Duration;

    /// Calculate the processing rate (items per second)
    fn processing_rate(&self) -> f64;

    /// Finalize statistics collection
    fn finish(&mut self);

    /// Get a summary of the statistics
    fn summary(&self) -> String;
}

/// Common timing information for all statistics
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}

/// Per-run output statistics
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    pub total_records: usize,
    /// Outputs decoded and registered (or checked)
    pub outputs_processed: usize,
    /// Rows whose script hex could not be decoded
    pub malformed_records: usize,
    /// Identities created by this run (build mode only)
    pub new_addresses: usize,
    /// Identities missing from the index (verify mode only)
    pub mismatches: usize,
    pub batches_processed: usize,
    pub by_type: BTreeMap<AddressType, usize>,
    pub timing: TimingInfo,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_type(&mut self, address_type: AddressType) {
        *self.by_type.entry(address_type).or_insert(0) += 1;
    }

    pub fn count_for(&self, address_type: AddressType) -> usize {
        self.by_type.get(&address_type).copied().unwrap_or(0)
    }

    /// Share of processed outputs with the given type, as a percentage
    pub fn type_rate(&self, address_type: AddressType) -> f64 {
        if self.outputs_processed > 0 {
            (self.count_for(address_type) as f64 / self.outputs_processed as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn error_rate(&self) -> f64 {
        if self.total_records > 0 {
            (self.malformed_records as f64 / self.total_records as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn records_per_batch(&self) -> f64 {
        if self.batches_processed > 0 {
            self.total_records as f64 / self.batches_processed as f64
        } else {
            0.0
        }
    }
}

impl StatisticsCollector for ProcessingStats {
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn start_time(&self) -> Instant {
        self.timing.start_time
    }

    fn duration(&self) -> Duration {
        self.timing.elapsed()
    }

    fn processing_rate(&self) -> f64 {
        let elapsed = self.timing.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_records as f64 / elapsed
        } else {
            0.0
        }
    }

    fn finish(&mut self) {
        self.timing.finish();
    }

    fn summary(&self) -> String {
        format!(
            "{} total records, {} outputs, {} new addresses, {} mismatches, {} errors ({:.1}%), {:.1} records/sec",
            self.total_records,
            self.outputs_processed,
            self.new_addresses,
            self.mismatches,
            self.malformed_records,
            self.error_rate(),
            self.processing_rate()
        )
    }
}
