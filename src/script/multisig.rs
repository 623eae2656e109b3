//! Bare multisig outputs (`OP_m <pubkey>... OP_n OP_CHECKMULTISIG`)
//!
//! A multisig output is an aggregate: each key is a single-key address in its
//! own right, and the multisig address is identified by the ordered list of
//! those resolved addresses. Each slot therefore records the address its key
//! resolved to and whether that address was first seen here.

use super::output::ScriptOutputData;
use super::pubkey::RawPubkey;
use super::registration::{Resolution, Resolver};
use super::{Address, AddressType};
use crate::errors::{AppError, AppResult};
use bitcoin::hashes::{hash160, Hash, HashEngine};
use thiserror::Error;

/// Hard ceiling on keys in one multisig output (OP_16)
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Reasons a key cannot be added to a multisig output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    #[error("Multisig output already holds the maximum of 16 keys")]
    CapacityExceeded,

    #[error("Multisig output already holds its declared {declared} keys")]
    TooManyKeys { declared: u8 },

    #[error("Key {index} is not a structurally valid public key")]
    InvalidPubkey { index: usize },
}

/// One key position in a multisig output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSlot {
    pub pubkey: RawPubkey,
    /// Address the key resolved to; `None` until registered
    pub address: Option<Address>,
    /// Whether registration created the key's address
    pub first_seen: bool,
}

impl MultisigSlot {
    fn new(pubkey: RawPubkey) -> Self {
        Self {
            pubkey,
            address: None,
            first_seen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigOutput {
    num_required: u8,
    num_total: u8,
    slots: Vec<MultisigSlot>,
}

impl MultisigOutput {
    /// Start an M-of-N output; keys are added with `add_address`
    pub fn new(num_required: u8, num_total: u8) -> Self {
        Self {
            num_required,
            num_total,
            slots: Vec::with_capacity((num_total as usize).min(MAX_MULTISIG_KEYS)),
        }
    }

    /// Append a key in script order
    pub fn add_address(&mut self, bytes: &[u8]) -> Result<(), MultisigError> {
        let index = self.slots.len();
        let pubkey = RawPubkey::from_slice(bytes).ok_or(MultisigError::InvalidPubkey { index })?;
        self.add_pubkey(pubkey)
    }

    pub fn add_pubkey(&mut self, pubkey: RawPubkey) -> Result<(), MultisigError> {
        if self.slots.len() >= MAX_MULTISIG_KEYS {
            return Err(MultisigError::CapacityExceeded);
        }
        if self.slots.len() >= self.num_total as usize {
            return Err(MultisigError::TooManyKeys {
                declared: self.num_total,
            });
        }
        self.slots.push(MultisigSlot::new(pubkey));
        Ok(())
    }

    pub fn num_required(&self) -> u8 {
        self.num_required
    }

    pub fn num_total(&self) -> u8 {
        self.num_total
    }

    /// Number of keys added so far
    pub fn address_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[MultisigSlot] {
        &self.slots
    }

    pub fn pubkeys(&self) -> impl Iterator<Item = &RawPubkey> {
        self.slots.iter().map(|slot| &slot.pubkey)
    }

    /// True once every slot has a resolved address
    pub fn is_resolved(&self) -> bool {
        self.slots.iter().all(|slot| slot.address.is_some())
    }

    /// HASH160 over the resolved slot address numbers (u32 LE, slot order)
    ///
    /// `None` while any slot is unresolved.
    pub fn aggregate_hash(&self) -> Option<hash160::Hash> {
        let mut engine = hash160::Hash::engine();
        for slot in &self.slots {
            let address = slot.address?;
            engine.input(&address.address_num.to_le_bytes());
        }
        Some(hash160::Hash::from_engine(engine))
    }
}

impl ScriptOutputData for MultisigOutput {
    const ADDRESS_TYPE: AddressType = AddressType::Multisig;

    fn is_valid(&self) -> bool {
        self.num_required <= self.num_total && self.num_total as usize == self.slots.len()
    }

    /// Resolve every key, then the aggregate built from the resolved keys
    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        if !self.is_valid() {
            return Err(AppError::InvalidData(format!(
                "Cannot register {}-of-{} multisig holding {} keys",
                self.num_required,
                self.num_total,
                self.slots.len()
            )));
        }

        for slot in &mut self.slots {
            let resolution = resolver.resolve(&slot.pubkey.pubkey_hash(), AddressType::Pubkey)?;
            slot.address = Some(resolution.address);
            slot.first_seen = resolution.first_seen;
        }

        let aggregate = self.aggregate_hash().ok_or_else(|| {
            AppError::InvalidData("Multisig slot left unresolved".to_string())
        })?;
        resolver
            .resolve(&aggregate, AddressType::Multisig)
            .map(Some)
    }
}
