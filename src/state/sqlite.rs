//! SQLite-backed address state
//!
//! Holds the connection plus the next free number per dedup class. Counters
//! are loaded from `MAX(address_num)` when the database is opened, so a
//! reopened index continues numbering where it left off.

use super::schema::setup_schema;
use super::{ensure_has_identity, AddressLookup, AddressRegistry, OutputRecorder};
use crate::errors::{AppError, AppResult};
use crate::script::{Address, AddressType, DedupType};
use crate::types::OutputRecord;
use bitcoin::hashes::{hash160, Hash};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use tracing::{debug, info};

pub struct SqliteAddressState {
    connection: Connection,
    counts: HashMap<DedupType, u32>,
}

impl SqliteAddressState {
    /// Open (or create) the index at `database_path`; `:memory:` is accepted
    pub fn open(database_path: &str) -> AppResult<Self> {
        let connection = Connection::open(database_path)?;
        setup_schema(&connection)?;

        let mut state = Self {
            connection,
            counts: HashMap::new(),
        };
        state.load_counts()?;

        info!("Address index opened at: {}", database_path);
        Ok(state)
    }

    fn load_counts(&mut self) -> AppResult<()> {
        for dedup_type in DedupType::WITH_IDENTITY {
            let max: Option<u32> = self.connection.query_row(
                "SELECT MAX(address_num) FROM address_index WHERE dedup_type = ?1",
                params![dedup_type.as_str()],
                |row| row.get(0),
            )?;
            let count = max.unwrap_or(0);
            debug!("Loaded {} {} addresses", count, dedup_type);
            self.counts.insert(dedup_type, count);
        }
        Ok(())
    }

    /// Look up what build mode recorded for an output
    pub fn recorded_output(&self, txid: &str, vout: u32) -> AppResult<Option<OutputRecord>> {
        let row = self
            .connection
            .query_row(
                "SELECT height, address_type, address_num, first_seen
                 FROM script_outputs WHERE txid = ?1 AND vout = ?2",
                params![txid, vout],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<u32>>(2)?,
                        row.get::<_, bool>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(
            |(height, address_type, address_num, first_seen)| -> AppResult<OutputRecord> {
                Ok(OutputRecord {
                    txid: txid.to_string(),
                    vout,
                    height,
                    address_type: address_type.parse()?,
                    address_num,
                    first_seen,
                })
            },
        )
        .transpose()
    }

    /// Number of outputs recorded so far
    pub fn output_count(&self) -> AppResult<u64> {
        let count: i64 =
            self.connection
                .query_row("SELECT COUNT(*) FROM script_outputs", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Recorded outputs per address type
    pub fn output_counts_by_type(&self) -> AppResult<Vec<(AddressType, u64)>> {
        let mut stmt = self.connection.prepare(
            "SELECT address_type, COUNT(*) FROM script_outputs
             GROUP BY address_type ORDER BY address_type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (address_type, count) = row?;
            counts.push((address_type.parse()?, count as u64));
        }
        Ok(counts)
    }
}

impl AddressLookup for SqliteAddressState {
    fn resolve_or_verify(
        &self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Option<Address>> {
        let dedup_type = ensure_has_identity(address_type)?;
        let num: Option<u32> = self
            .connection
            .prepare_cached(
                "SELECT address_num FROM address_index WHERE dedup_type = ?1 AND hash = ?2",
            )?
            .query_row(
                params![dedup_type.as_str(), hash.as_byte_array().as_slice()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(num.map(|num| Address::new(num, address_type)))
    }

    fn address_count(&self, dedup_type: DedupType) -> AppResult<u32> {
        Ok(self.counts.get(&dedup_type).copied().unwrap_or(0))
    }
}

impl AddressRegistry for SqliteAddressState {
    fn resolve_or_create(
        &mut self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<(Address, bool)> {
        if let Some(address) = self.resolve_or_verify(hash, address_type)? {
            return Ok((address, false));
        }

        let dedup_type = ensure_has_identity(address_type)?;
        let num = self
            .counts
            .get(&dedup_type)
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                AppError::InvalidData(format!("{} address numbers exhausted", dedup_type))
            })?;

        self.connection
            .prepare_cached(
                "INSERT INTO address_index (dedup_type, hash, address_num) VALUES (?1, ?2, ?3)",
            )?
            .execute(params![
                dedup_type.as_str(),
                hash.as_byte_array().as_slice(),
                num
            ])?;
        self.counts.insert(dedup_type, num);

        Ok((Address::new(num, address_type), true))
    }
}

impl OutputRecorder for SqliteAddressState {
    fn record_output(&mut self, record: &OutputRecord) -> AppResult<()> {
        self.connection
            .prepare_cached(
                "INSERT OR REPLACE INTO script_outputs
                 (txid, vout, height, address_type, address_num, first_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?
            .execute(params![
                record.txid,
                record.vout,
                record.height,
                record.address_type.as_str(),
                record.address_num,
                record.first_seen
            ])?;
        Ok(())
    }

    fn begin_batch(&mut self) -> AppResult<()> {
        if self.connection.is_autocommit() {
            self.connection.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    fn commit_batch(&mut self) -> AppResult<()> {
        if !self.connection.is_autocommit() {
            self.connection.execute_batch("COMMIT")?;
        }
        Ok(())
    }
}
