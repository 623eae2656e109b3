use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub database: DatabaseConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub utxo_csv: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub default_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub batch_size: usize,
    pub progress_interval: usize,
    /// Worker threads for script decoding; 0 uses every available core
    pub decode_threads: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: 10000,
            progress_interval: 100000,
            decode_threads: 0,
        }
    }
}

impl ProcessingConfig {
    /// Thread count with 0 resolved to the machine's parallelism
    pub fn effective_threads(&self) -> usize {
        resolve_thread_count(self.decode_threads)
    }
}

/// Resolve a configured thread count, where 0 means "all cores"
pub fn resolve_thread_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

const DEFAULT_DATABASE_PATH: &str = "./output/address_index.db";

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ProcessingConfig::default();
        let config = Config::builder()
            .set_default("paths.utxo_csv", "/dev/null")? // Will be overridden
            .set_default("database.default_path", DEFAULT_DATABASE_PATH)?
            .set_default("processing.batch_size", defaults.batch_size as i64)?
            .set_default(
                "processing.progress_interval",
                defaults.progress_interval as i64,
            )?
            .set_default("processing.decode_threads", defaults.decode_threads as i64)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.apply_env_overrides()?;

        // Validate that the CSV path was actually configured
        if app_config.paths.utxo_csv == PathBuf::from("/dev/null") {
            return Err(ConfigError::Message(
                "UTXO CSV path not configured. Please set UTXO_CSV_PATH environment variable or configure paths.utxo_csv in config.toml".to_string()
            ));
        }

        Ok(app_config)
    }

    /// Environment variables with custom names
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(csv_path) = env::var("UTXO_CSV_PATH") {
            self.paths.utxo_csv = PathBuf::from(csv_path);
        }

        if let Ok(db_path) = env::var("ADDRESS_DATABASE_PATH") {
            self.database.default_path = PathBuf::from(db_path);
        }

        if let Some(batch_size) = env_usize("SCRIPT_PROCESSING_BATCH_SIZE")? {
            self.processing.batch_size = batch_size;
        }
        if let Some(interval) = env_usize("SCRIPT_PROCESSING_PROGRESS_INTERVAL")? {
            self.processing.progress_interval = interval;
        }
        if let Some(threads) = env_usize("SCRIPT_PROCESSING_DECODE_THREADS")? {
            self.processing.decode_threads = threads;
        }
        Ok(())
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Result<Self, ConfigError> {
        // Try to load config for defaults, but don't fail if not found
        match Self::load() {
            Ok(config) => Ok(config),
            Err(_) => Ok(Self {
                paths: PathsConfig {
                    utxo_csv: PathBuf::from("./utxodump.csv"), // Local fallback
                },
                database: DatabaseConfig {
                    default_path: PathBuf::from(DEFAULT_DATABASE_PATH),
                },
                processing: ProcessingConfig::default(),
            }),
        }
    }
}

fn env_usize(name: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigError::Message(format!(
                    "{} must be a whole number, got {:?}",
                    name, value
                ))
            }),
        Err(_) => Ok(None),
    }
}
