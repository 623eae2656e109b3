use crate::script::AddressType;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV processing
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Script hex could not be decoded
    #[error("Script parsing error: {0}")]
    ScriptParse(String),

    /// Read-only verification found no entry for an identity hash
    #[error("Verification mismatch: no {address_type} address for hash {hash}")]
    VerificationMismatch {
        address_type: AddressType,
        hash: String,
    },

    /// A worker thread panicked while decoding a batch
    #[error("Processing error: {0}")]
    Processing(String),
}

impl AppError {
    /// True for registration mismatches surfaced by verify mode
    pub fn is_verification_mismatch(&self) -> bool {
        matches!(self, AppError::VerificationMismatch { .. })
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::ScriptParse(format!("Invalid script hex: {}", err))
    }
}
