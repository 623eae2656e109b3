//! In-memory address state

use super::{ensure_has_identity, AddressLookup, AddressRegistry, OutputRecorder};
use crate::errors::{AppError, AppResult};
use crate::script::{Address, AddressType, DedupType};
use crate::types::OutputRecord;
use bitcoin::hashes::hash160;
use std::collections::HashMap;

/// Hash-map backed address state
///
/// Address numbers are assigned per dedup class, starting at 1, in the order
/// identities are first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryAddressState {
    addresses: HashMap<(DedupType, hash160::Hash), u32>,
    counts: HashMap<DedupType, u32>,
    outputs: Vec<OutputRecord>,
}

impl InMemoryAddressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total identities across all dedup classes
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Outputs recorded by build runs, in processing order
    pub fn outputs(&self) -> &[OutputRecord] {
        &self.outputs
    }
}

impl AddressLookup for InMemoryAddressState {
    fn resolve_or_verify(
        &self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Option<Address>> {
        let dedup_type = ensure_has_identity(address_type)?;
        Ok(self
            .addresses
            .get(&(dedup_type, *hash))
            .map(|num| Address::new(*num, address_type)))
    }

    fn address_count(&self, dedup_type: DedupType) -> AppResult<u32> {
        Ok(self.counts.get(&dedup_type).copied().unwrap_or(0))
    }
}

impl AddressRegistry for InMemoryAddressState {
    fn resolve_or_create(
        &mut self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<(Address, bool)> {
        let dedup_type = ensure_has_identity(address_type)?;

        if let Some(num) = self.addresses.get(&(dedup_type, *hash)) {
            return Ok((Address::new(*num, address_type), false));
        }

        let num = self
            .counts
            .get(&dedup_type)
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| {
                AppError::InvalidData(format!("{} address numbers exhausted", dedup_type))
            })?;
        self.counts.insert(dedup_type, num);
        self.addresses.insert((dedup_type, *hash), num);
        Ok((Address::new(num, address_type), true))
    }
}

impl OutputRecorder for InMemoryAddressState {
    fn record_output(&mut self, record: &OutputRecord) -> AppResult<()> {
        self.outputs.push(record.clone());
        Ok(())
    }
}
