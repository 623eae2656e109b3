use super::{print_type_breakdown, RunArgs};
use crate::errors::{AppError, AppResult};
use crate::processor::{format_duration, ScriptProcessor};
use crate::state::SqliteAddressState;
use clap::Args;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct VerifyCommand {
    #[command(flatten)]
    pub args: RunArgs,
}

impl VerifyCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== Script Address Parser - Verify ===");

        let (config, database_path) = self.args.resolve()?;
        if !database_path.exists() {
            return Err(AppError::Config(format!(
                "Database does not exist: {}",
                database_path.display()
            )));
        }

        let state = SqliteAddressState::open(&database_path.to_string_lossy())?;
        let processor = ScriptProcessor::new(config)?;
        let stats = processor.verify(&state)?;

        println!("\n=== VERIFY COMPLETE ===");
        println!("Total records checked: {}", stats.total_records);
        println!("Outputs checked: {}", stats.outputs_processed);
        println!("Mismatches: {}", stats.mismatches);
        println!("Malformed records: {}", stats.malformed_records);
        println!(
            "Processing time: {}",
            format_duration(stats.timing.elapsed())
        );
        print_type_breakdown(&stats);

        if stats.mismatches > 0 {
            return Err(AppError::InvalidData(format!(
                "{} outputs did not match the index at {}",
                stats.mismatches,
                database_path.display()
            )));
        }

        println!("\nIndex at {} matches the CSV", database_path.display());
        Ok(())
    }
}
