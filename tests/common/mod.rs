//! Common Test Utilities
//!
//! Script builders, CSV fixtures and an instrumented address state shared by
//! the unit and integration test binaries.

#![allow(dead_code)]

pub mod scripts;

use script_address_parser::errors::AppResult;
use script_address_parser::script::{Address, AddressType, DedupType};
use script_address_parser::state::{AddressLookup, AddressRegistry, InMemoryAddressState};
use std::cell::Cell;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// One row of a generated UTXO CSV
pub struct CsvRow {
    pub vout: u32,
    pub height: u32,
    pub script_hex: String,
}

impl CsvRow {
    pub fn new(vout: u32, script_hex: impl Into<String>) -> Self {
        Self {
            vout,
            height: 100_000 + vout,
            script_hex: script_hex.into(),
        }
    }
}

/// Deterministic txid for row `index`
pub fn test_txid(index: usize) -> String {
    format!("{:064x}", index + 1)
}

/// Write a bitcoin-utxo-dump style CSV (comment lines, header, rows)
pub fn write_utxo_csv(temp_dir: &TempDir, name: &str, rows: &[CsvRow]) -> anyhow::Result<PathBuf> {
    let csv_path = temp_dir.path().join(name);
    let mut file = File::create(&csv_path)?;

    writeln!(file, "# Bitcoin UTXO Dump")?;
    writeln!(
        file,
        "# Fields: count,txid,vout,height,coinbase,amount,type,script,address"
    )?;
    writeln!(
        file,
        "count,txid,vout,height,coinbase,amount,type,script,address"
    )?;

    for (index, row) in rows.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},0,546,unknown,{},",
            index,
            test_txid(index),
            row.vout,
            row.height,
            row.script_hex
        )?;
    }

    Ok(csv_path)
}

/// Database path inside a temp dir
pub fn temp_db_path(temp_dir: &TempDir, name: &str) -> String {
    temp_dir.path().join(name).to_string_lossy().into_owned()
}

/// In-memory state that counts every call made against it
#[derive(Default)]
pub struct CountingState {
    pub inner: InMemoryAddressState,
    lookups: Cell<usize>,
    creates: Cell<usize>,
}

impl CountingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    pub fn creates(&self) -> usize {
        self.creates.get()
    }

    pub fn total_calls(&self) -> usize {
        self.lookups() + self.creates()
    }
}

impl AddressLookup for CountingState {
    fn resolve_or_verify(
        &self,
        hash: &bitcoin::hashes::hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Option<Address>> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.resolve_or_verify(hash, address_type)
    }

    fn address_count(&self, dedup_type: DedupType) -> AppResult<u32> {
        self.inner.address_count(dedup_type)
    }
}

impl AddressRegistry for CountingState {
    fn resolve_or_create(
        &mut self,
        hash: &bitcoin::hashes::hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<(Address, bool)> {
        self.creates.set(self.creates.get() + 1);
        self.inner.resolve_or_create(hash, address_type)
    }
}
