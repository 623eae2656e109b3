//! Bitcoin output-script address extractor
//!
//! - `script`: script classification, identity hashes and the registration protocol
//! - `state`: address state backends (in-memory and SQLite)
//! - `processor`: UTXO CSV ingestion in build and verify modes
//! - `cli`: command-line entry points

pub mod cli;
pub mod config;
pub mod errors;
pub mod processor;
pub mod script;
pub mod state;
pub mod types;
