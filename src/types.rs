//! Shared record, configuration and statistics types
//!
//! - `common`: UTXO input rows and persisted output records
//! - `processing`: processor configuration
//! - `statistics`: run statistics with the common collector trait

mod common;
mod processing;
pub mod statistics;

pub use common::*;
pub use processing::ProcessorConfig;
pub use statistics::ProcessingStats;
