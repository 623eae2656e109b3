use super::{validate_config, ProcessingMode, ProgressReporter};
use crate::errors::{AppError, AppResult};
use crate::script::{extract_from_bytes, Resolution, ScriptOutput};
use crate::state::{AddressLookup, AddressRegistry, OutputRecorder};
use crate::types::statistics::{ProcessingStats, StatisticsCollector};
use crate::types::{OutputRecord, ProcessorConfig, UtxoRecord};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{debug, info, warn};

/// One CSV row after script decoding
#[derive(Debug)]
pub struct DecodedRow {
    pub utxo: UtxoRecord,
    pub output: Result<ScriptOutput, hex::FromHexError>,
}

/// Decode a batch of rows across `threads` scoped workers, preserving order
pub fn decode_batch(records: Vec<UtxoRecord>, threads: usize) -> AppResult<Vec<DecodedRow>> {
    let decode = |utxo: UtxoRecord| {
        let output = utxo.script_bytes().map(|bytes| extract_from_bytes(&bytes));
        DecodedRow { utxo, output }
    };

    if threads <= 1 || records.len() < 2 {
        return Ok(records.into_iter().map(decode).collect());
    }

    let chunk_size = records.len().div_ceil(threads);
    let mut chunks = Vec::with_capacity(threads);
    let mut remaining = records.into_iter().peekable();
    while remaining.peek().is_some() {
        chunks.push(remaining.by_ref().take(chunk_size).collect::<Vec<_>>());
    }

    let decoded = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                scope.spawn(move |_| chunk.into_iter().map(decode).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<_>, _>>()
    })
    .and_then(|joined| joined)
    .map_err(|_| AppError::Processing("Script decode worker panicked".to_string()))?;

    Ok(decoded.into_iter().flatten().collect())
}

/// Streams a UTXO CSV through the script extractor and the address state
pub struct ScriptProcessor {
    config: ProcessorConfig,
}

impl ScriptProcessor {
    pub fn new(config: ProcessorConfig) -> AppResult<Self> {
        validate_config(&config)?;

        info!("Script processor initialised");
        info!("Source CSV: {}", config.csv_path.display());

        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Build mode: register every output, creating addresses as needed
    pub fn build<S>(&self, state: &mut S) -> AppResult<ProcessingStats>
    where
        S: AddressRegistry + OutputRecorder + ?Sized,
    {
        self.run(ProcessingMode::Build, |stats, batch| {
            state.begin_batch()?;
            for DecodedRow { utxo, output } in batch {
                let Some(mut output) = Self::accept_output(stats, &utxo, output) else {
                    continue;
                };
                let address_type = output.address_type();
                let resolution = output.process_output(&mut *state)?;

                stats.new_addresses += count_new_addresses(&output, resolution.as_ref());
                state.record_output(&OutputRecord::new(&utxo, address_type, resolution))?;
                stats.record_type(address_type);
                stats.outputs_processed += 1;
            }
            state.commit_batch()
        })
    }

    /// Verify mode: check every output against the index without touching it
    pub fn verify<S>(&self, state: &S) -> AppResult<ProcessingStats>
    where
        S: AddressLookup + ?Sized,
    {
        self.run(ProcessingMode::Verify, |stats, batch| {
            for DecodedRow { utxo, output } in batch {
                let Some(mut output) = Self::accept_output(stats, &utxo, output) else {
                    continue;
                };
                let address_type = output.address_type();
                match output.check_output(state) {
                    Ok(_) => {}
                    Err(e) if e.is_verification_mismatch() => {
                        warn!("{}:{} {}", utxo.txid, utxo.vout, e);
                        stats.mismatches += 1;
                    }
                    Err(e) => return Err(e),
                }
                stats.record_type(address_type);
                stats.outputs_processed += 1;
            }
            Ok(())
        })
    }

    /// Unwrap a decoded output, counting rows with malformed script hex
    fn accept_output(
        stats: &mut ProcessingStats,
        utxo: &UtxoRecord,
        output: Result<ScriptOutput, hex::FromHexError>,
    ) -> Option<ScriptOutput> {
        match output {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(
                    "Skipping {}:{} - malformed script hex: {}",
                    utxo.txid, utxo.vout, e
                );
                stats.malformed_records += 1;
                None
            }
        }
    }

    /// Count data rows, skipping `#` comments and the header line
    fn count_csv_lines(&self) -> AppResult<u64> {
        info!("Counting CSV records for progress tracking...");

        let file = File::open(&self.config.csv_path)?;
        let reader = BufReader::with_capacity(8 * 1024 * 1024, file); // 8MB buffer

        let mut count = 0u64;
        let mut found_header = false;

        for line_result in reader.lines() {
            let line = line_result?;
            let trimmed = line.trim();

            if trimmed.starts_with('#') || trimmed.is_empty() {
                continue;
            }
            if !found_header {
                found_header = true;
                continue;
            }
            count += 1;
        }

        info!("CSV contains {} records", count);
        Ok(count)
    }

    /// Read the CSV in batches, decode each batch in parallel and hand it to
    /// `handle_batch` in input order
    fn run<F>(&self, mode: ProcessingMode, mut handle_batch: F) -> AppResult<ProcessingStats>
    where
        F: FnMut(&mut ProcessingStats, Vec<DecodedRow>) -> AppResult<()>,
    {
        info!("Starting {} run", mode.as_str());
        let mut stats = ProcessingStats::new();

        let total_records = self.count_csv_lines()?;

        let file = File::open(&self.config.csv_path)?;
        let mut csv_reader = ReaderBuilder::new()
            .comment(Some(b'#')) // Skip lines starting with #
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut batch = Vec::with_capacity(self.config.batch_size);

        let mut reporter = ProgressReporter::new(mode, total_records);

        for result in csv_reader.deserialize::<UtxoRecord>() {
            batch.push(result?);
            stats.total_records += 1;

            if batch.len() >= self.config.batch_size {
                self.flush_batch(&mut stats, &mut batch, &mut handle_batch)?;
            }

            if stats.total_records % self.config.progress_interval == 0 {
                info!("{}", stats.summary());
            }
            reporter.tick(&stats)?;
        }

        if !batch.is_empty() {
            self.flush_batch(&mut stats, &mut batch, &mut handle_batch)?;
        }

        stats.finish();
        reporter.finish(&stats);

        Ok(stats)
    }

    fn flush_batch<F>(
        &self,
        stats: &mut ProcessingStats,
        batch: &mut Vec<UtxoRecord>,
        handle_batch: &mut F,
    ) -> AppResult<()>
    where
        F: FnMut(&mut ProcessingStats, Vec<DecodedRow>) -> AppResult<()>,
    {
        let records = std::mem::replace(batch, Vec::with_capacity(self.config.batch_size));
        let decoded = decode_batch(records, self.config.decode_threads)?;
        debug!("Decoded batch of {} rows", decoded.len());

        handle_batch(stats, decoded)?;
        stats.batches_processed += 1;
        Ok(())
    }
}

/// Addresses created while registering one output, multisig keys included
fn count_new_addresses(output: &ScriptOutput, resolution: Option<&Resolution>) -> usize {
    let slots = match output {
        ScriptOutput::Multisig(multisig) => multisig
            .slots()
            .iter()
            .filter(|slot| slot.first_seen)
            .count(),
        _ => 0,
    };
    slots + usize::from(resolution.is_some_and(|r| r.first_seen))
}
