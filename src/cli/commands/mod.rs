pub mod build;
pub mod decode;
pub mod verify;

use crate::config::{resolve_thread_count, AppConfig};
use crate::errors::{AppError, AppResult};
use crate::types::ProcessorConfig;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Input and tuning flags shared by `build` and `verify`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to UTXO CSV file (overrides config.toml and env vars)
    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    /// Address index database path (overrides config.toml and env vars)
    #[arg(long)]
    pub database_path: Option<PathBuf>,

    /// Records decoded per batch (overrides config.toml)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Decode worker threads, 0 for all cores (overrides config.toml)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Progress log interval in records (overrides config.toml)
    #[arg(long)]
    pub progress_interval: Option<usize>,
}

impl RunArgs {
    /// Merge CLI flags over file/env configuration
    pub fn resolve(&self) -> AppResult<(ProcessorConfig, PathBuf)> {
        let app_config = match AppConfig::load() {
            Ok(config) => {
                info!("Configuration loaded successfully");
                config
            }
            // A CSV path on the command line is enough to run
            Err(e) if self.csv_path.is_some() => {
                info!("Using defaults for unset options: {}", e);
                AppConfig::get_defaults()?
            }
            Err(e) => {
                warn!("Failed to load configuration: {}", e);
                info!("You can copy config.toml.example as a starting point");
                return Err(AppError::Config(format!(
                    "{}. Please set UTXO_CSV_PATH environment variable, pass --csv-path, or configure paths.utxo_csv in config.toml",
                    e
                )));
            }
        };

        let csv_path = self
            .csv_path
            .clone()
            .unwrap_or(app_config.paths.utxo_csv.clone());
        let database_path = self
            .database_path
            .clone()
            .unwrap_or(app_config.database.default_path.clone());

        if !csv_path.exists() {
            return Err(AppError::Config(format!(
                "CSV file does not exist: {}",
                csv_path.display()
            )));
        }

        let config = ProcessorConfig::new(csv_path)
            .with_batch_size(self.batch_size.unwrap_or(app_config.processing.batch_size))
            .with_progress_interval(
                self.progress_interval
                    .unwrap_or(app_config.processing.progress_interval),
            )
            .with_decode_threads(resolve_thread_count(
                self.threads.unwrap_or(app_config.processing.decode_threads),
            ));

        info!("Configuration:");
        info!("  CSV file: {}", config.csv_path.display());
        info!("  Database: {}", database_path.display());
        info!("  Batch size: {}", config.batch_size);
        info!("  Decode threads: {}", config.decode_threads);

        Ok((config, database_path))
    }
}

/// Create the parent directory of an on-disk database path
pub(crate) fn ensure_parent_dir(path: &std::path::Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Per-type breakdown shared by the build and verify summaries
pub(crate) fn print_type_breakdown(stats: &crate::types::ProcessingStats) {
    println!("\n=== OUTPUTS BY TYPE ===");
    for (address_type, count) in &stats.by_type {
        println!(
            "{:<20} {:>12} ({:.2}%)",
            address_type.as_str(),
            count,
            stats.type_rate(*address_type)
        );
    }
}
