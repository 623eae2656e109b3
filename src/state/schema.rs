//! SQLite schema for the address index
//!
//! - `address_index`: one row per identity, unique per (dedup class, hash)
//! - `script_outputs`: one row per processed output, pointing at its address

use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

pub const SCHEMA_VERSION: u32 = 1;

pub fn setup_schema(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        PRAGMA user_version = 1;

        CREATE TABLE IF NOT EXISTS address_index (
            dedup_type TEXT NOT NULL,
            hash BLOB NOT NULL,
            address_num INTEGER NOT NULL,
            PRIMARY KEY (dedup_type, hash)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_address_index_num
            ON address_index(dedup_type, address_num);

        -- address_num is NULL for outputs without an identity
        CREATE TABLE IF NOT EXISTS script_outputs (
            txid TEXT NOT NULL,
            vout INTEGER NOT NULL,
            height INTEGER NOT NULL,
            address_type TEXT NOT NULL,
            address_num INTEGER,
            first_seen INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (txid, vout)
        );

        CREATE INDEX IF NOT EXISTS idx_script_outputs_type
            ON script_outputs(address_type);
        "#,
    )?;

    debug!("Address index schema v{} ready", SCHEMA_VERSION);
    Ok(())
}
