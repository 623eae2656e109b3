//! Build an index from a UTXO CSV, then verify the same CSV against it.

use crate::common::scripts::{
    self, KEY_B, KEY_G, KEY_GENESIS_HASH160, KEY_G_HASH160,
};
use crate::common::{temp_db_path, test_txid, write_utxo_csv, CsvRow};
use script_address_parser::processor::ScriptProcessor;
use script_address_parser::script::{AddressType, DedupType};
use script_address_parser::state::{AddressLookup, InMemoryAddressState, SqliteAddressState};
use script_address_parser::types::ProcessorConfig;
use std::path::Path;
use tempfile::TempDir;

/// Eleven rows: every template, shared identities, and one malformed row
fn mixed_rows() -> Vec<CsvRow> {
    let witness_script = scripts::p2pk(KEY_G);
    vec![
        CsvRow::new(0, scripts::p2pk(KEY_G)),
        CsvRow::new(1, scripts::p2pkh(KEY_G_HASH160)),
        CsvRow::new(2, scripts::p2wpkh(KEY_G_HASH160)),
        CsvRow::new(3, scripts::p2pkh(KEY_GENESIS_HASH160)),
        CsvRow::new(4, scripts::p2sh("748284390f9e263a4b766a75d0633c50426eb875")),
        CsvRow::new(5, scripts::p2wsh_of(&witness_script)),
        CsvRow::new(6, scripts::p2sh_of(&witness_script)),
        CsvRow::new(7, scripts::multisig(1, &[KEY_G, KEY_B])),
        CsvRow::new(8, scripts::op_return("68656c6c6f")),
        CsvRow::new(9, "51"),
        CsvRow::new(10, "zz"),
    ]
}

fn processor(csv_path: &Path, batch_size: usize, threads: usize) -> ScriptProcessor {
    let config = ProcessorConfig::new(csv_path)
        .with_batch_size(batch_size)
        .with_decode_threads(threads)
        .with_progress_interval(1000);
    ScriptProcessor::new(config).unwrap()
}

#[test]
fn test_build_then_verify_reports_zero_mismatches() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_utxo_csv(&temp_dir, "utxo.csv", &mixed_rows()).unwrap();
    let db_path = temp_db_path(&temp_dir, "index.db");

    let processor = processor(&csv_path, 4, 2);

    let mut state = SqliteAddressState::open(&db_path).unwrap();
    let build_stats = processor.build(&mut state).unwrap();

    assert_eq!(build_stats.total_records, 11);
    assert_eq!(build_stats.outputs_processed, 10);
    assert_eq!(build_stats.malformed_records, 1);
    assert_eq!(build_stats.new_addresses, 6);
    assert_eq!(build_stats.batches_processed, 3);
    assert_eq!(build_stats.count_for(AddressType::PubkeyHash), 2);
    assert_eq!(build_stats.count_for(AddressType::ScriptHash), 2);
    assert_eq!(build_stats.count_for(AddressType::NullData), 1);
    assert_eq!(build_stats.count_for(AddressType::Nonstandard), 1);

    assert_eq!(state.address_count(DedupType::Pubkey).unwrap(), 3);
    assert_eq!(state.address_count(DedupType::ScriptHash).unwrap(), 2);
    assert_eq!(state.address_count(DedupType::Multisig).unwrap(), 1);
    assert_eq!(state.output_count().unwrap(), 10);

    let verify_stats = processor.verify(&state).unwrap();
    assert_eq!(verify_stats.mismatches, 0);
    assert_eq!(verify_stats.outputs_processed, 10);
    assert_eq!(verify_stats.malformed_records, 1);
    assert_eq!(verify_stats.new_addresses, 0);
}

#[test]
fn test_recorded_outputs_carry_resolved_addresses() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_utxo_csv(&temp_dir, "utxo.csv", &mixed_rows()).unwrap();

    let mut state = SqliteAddressState::open(":memory:").unwrap();
    processor(&csv_path, 100, 1).build(&mut state).unwrap();

    // P2PK of G opened pubkey address 1; the P2WPKH of the same key reuses it
    let p2pk = state.recorded_output(&test_txid(0), 0).unwrap().unwrap();
    assert_eq!(p2pk.address_type, AddressType::Pubkey);
    assert_eq!(p2pk.address_num, Some(1));
    assert!(p2pk.first_seen);

    let p2wpkh = state.recorded_output(&test_txid(2), 2).unwrap().unwrap();
    assert_eq!(p2wpkh.address_num, Some(1));
    assert!(!p2wpkh.first_seen);

    // P2SH of the witness script lands on the P2WSH address
    let p2wsh = state.recorded_output(&test_txid(5), 5).unwrap().unwrap();
    let p2sh = state.recorded_output(&test_txid(6), 6).unwrap().unwrap();
    assert_eq!(p2wsh.address_num, p2sh.address_num);
    assert!(!p2sh.first_seen);

    let null_data = state.recorded_output(&test_txid(8), 8).unwrap().unwrap();
    assert_eq!(null_data.address_type, AddressType::NullData);
    assert_eq!(null_data.address_num, None);

    // Malformed rows are never recorded
    assert!(state.recorded_output(&test_txid(10), 10).unwrap().is_none());
}

#[test]
fn test_verify_against_empty_index_counts_every_identity() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_utxo_csv(&temp_dir, "utxo.csv", &mixed_rows()).unwrap();

    let state = SqliteAddressState::open(":memory:").unwrap();
    let stats = processor(&csv_path, 5, 3).verify(&state).unwrap();

    // Rows 0-7 have an identity; null data and nonstandard pass trivially
    assert_eq!(stats.mismatches, 8);
    assert_eq!(stats.outputs_processed, 10);
    assert_eq!(state.address_count(DedupType::Pubkey).unwrap(), 0);
    assert_eq!(state.output_count().unwrap(), 0);
}

#[test]
fn test_verify_leaves_reopened_index_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let built_csv = write_utxo_csv(&temp_dir, "built.csv", &mixed_rows()).unwrap();
    let db_path = temp_db_path(&temp_dir, "index.db");

    {
        let mut state = SqliteAddressState::open(&db_path).unwrap();
        processor(&built_csv, 10, 2).build(&mut state).unwrap();
    }

    let mut rows = mixed_rows();
    rows.push(CsvRow::new(11, scripts::p2pkh(&scripts::hash160_hex(KEY_B))));
    let extended_csv = write_utxo_csv(&temp_dir, "extended.csv", &rows).unwrap();

    let state = SqliteAddressState::open(&db_path).unwrap();
    let stats = processor(&extended_csv, 10, 2).verify(&state).unwrap();

    // Key B is known through the multisig, so its P2PKH verifies
    assert_eq!(stats.mismatches, 0);

    rows.push(CsvRow::new(12, scripts::p2sh(&"ab".repeat(20))));
    let unseen_csv = write_utxo_csv(&temp_dir, "unseen.csv", &rows).unwrap();
    let stats = processor(&unseen_csv, 10, 2).verify(&state).unwrap();

    assert_eq!(stats.mismatches, 1);
    assert_eq!(state.address_count(DedupType::ScriptHash).unwrap(), 2);
    assert_eq!(state.output_count().unwrap(), 10);
}

#[test]
fn test_numbering_independent_of_thread_count_and_batch_size() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_utxo_csv(&temp_dir, "utxo.csv", &mixed_rows()).unwrap();

    let mut single = InMemoryAddressState::new();
    processor(&csv_path, 100, 1).build(&mut single).unwrap();

    let mut parallel = InMemoryAddressState::new();
    processor(&csv_path, 3, 4).build(&mut parallel).unwrap();

    assert_eq!(single, parallel);
    assert_eq!(single.outputs().len(), 10);
}
