//! Address state: the component that hands out numeric address identifiers.
//!
//! ## Architecture
//!
//! Two traits split the state by capability:
//! - `AddressLookup` - read-only view used when verifying an existing index
//! - `AddressRegistry` - read/write view used while building the index
//!
//! `OutputRecorder` persists the per-output result of a build run.
//!
//! Identity hashes are keyed by their `DedupType`, so P2PKH and P2PK outputs of
//! the same key resolve to the same address number.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryAddressState;
pub use sqlite::SqliteAddressState;

use crate::errors::{AppError, AppResult};
use crate::script::{Address, AddressType, DedupType};
use crate::types::OutputRecord;
use bitcoin::hashes::hash160;

/// Read-only access to resolved addresses
pub trait AddressLookup {
    /// Look up the address for an identity hash without creating it
    fn resolve_or_verify(
        &self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Option<Address>>;

    /// Number of addresses assigned so far in a dedup class
    fn address_count(&self, dedup_type: DedupType) -> AppResult<u32>;
}

/// Read/write access: resolves an existing address or assigns the next number
pub trait AddressRegistry: AddressLookup {
    /// Returns the address and whether it was created by this call
    fn resolve_or_create(
        &mut self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<(Address, bool)>;
}

/// Sink for per-output registration results
pub trait OutputRecorder {
    fn record_output(&mut self, record: &OutputRecord) -> AppResult<()>;

    /// Group the writes of one batch; no-op unless the store is transactional
    fn begin_batch(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn commit_batch(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Reject address types that have no identity before touching storage
pub(crate) fn ensure_has_identity(address_type: AddressType) -> AppResult<DedupType> {
    if address_type.has_identity() {
        Ok(address_type.dedup_type())
    } else {
        Err(AppError::InvalidData(format!(
            "{} outputs have no address identity",
            address_type
        )))
    }
}
