use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Bitcoin output-script address extractor
#[derive(Parser)]
#[command(name = "script-address-parser")]
#[command(about = "Classify Bitcoin output scripts and build or verify a deduplicated address index")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode every script in a UTXO CSV and register its addresses
    Build(commands::build::BuildCommand),
    /// Check every script in a UTXO CSV against an existing index, read-only
    Verify(commands::verify::VerifyCommand),
    /// Decode a single hex-encoded output script and print it as JSON
    Decode(commands::decode::DecodeCommand),
}

pub fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(command) => command.run(),
        Commands::Verify(command) => command.run(),
        Commands::Decode(command) => command.run(),
    }
}
