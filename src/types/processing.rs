//! Processor configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one build or verify run over a UTXO CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub csv_path: PathBuf,
    pub batch_size: usize,
    pub progress_interval: usize,
    /// Decode worker threads; already resolved, never 0
    pub decode_threads: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            csv_path: "./utxodump.csv".into(),
            batch_size: 10_000,         // Records decoded per batch
            progress_interval: 100_000, // Progress report every N records
            decode_threads: 1,
        }
    }
}

impl ProcessorConfig {
    pub fn new<P: Into<PathBuf>>(csv_path: P) -> Self {
        Self {
            csv_path: csv_path.into(),
            ..Self::default()
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_decode_threads(mut self, decode_threads: usize) -> Self {
        self.decode_threads = decode_threads;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }
}
