use super::{ensure_parent_dir, print_type_breakdown, RunArgs};
use crate::errors::AppResult;
use crate::processor::{format_duration, ScriptProcessor};
use crate::script::DedupType;
use crate::state::{AddressLookup, SqliteAddressState};
use crate::types::statistics::StatisticsCollector;
use clap::Args;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: RunArgs,
}

impl BuildCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== Script Address Parser - Build ===");

        let (config, database_path) = self.args.resolve()?;
        ensure_parent_dir(&database_path)?;

        let mut state = SqliteAddressState::open(&database_path.to_string_lossy())?;
        let processor = ScriptProcessor::new(config)?;
        let stats = processor.build(&mut state)?;

        println!("\n=== BUILD COMPLETE ===");
        println!("Total records processed: {}", stats.total_records);
        println!("Outputs registered: {}", stats.outputs_processed);
        println!("New addresses: {}", stats.new_addresses);
        println!("Malformed records: {}", stats.malformed_records);
        println!("Error rate: {:.4}%", stats.error_rate());
        println!(
            "Processing time: {}",
            format_duration(stats.timing.elapsed())
        );
        println!(
            "Processing rate: {:.2} records/sec",
            stats.processing_rate()
        );
        println!(
            "Batches processed: {} (avg {:.0} records/batch)",
            stats.batches_processed,
            stats.records_per_batch()
        );
        print_type_breakdown(&stats);

        println!("\n=== INDEX SUMMARY ===");
        for dedup_type in DedupType::WITH_IDENTITY {
            println!(
                "{:<20} {:>12}",
                dedup_type.as_str(),
                state.address_count(dedup_type)?
            );
        }
        println!("Outputs stored: {}", state.output_count()?);
        println!("\nDatabase written to: {}", database_path.display());

        Ok(())
    }
}
