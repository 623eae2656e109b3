//! Script-output variants
//!
//! One payload type per `AddressType`, tied together by the `ScriptOutput`
//! sum type. Each payload carries exactly what it needs to validate itself
//! and to compute its identity hash.

use super::multisig::MultisigOutput;
use super::pubkey::RawPubkey;
use super::registration::{CreatingResolver, Resolution, Resolver, VerifyingResolver};
use super::AddressType;
use crate::errors::AppResult;
use crate::state::{AddressLookup, AddressRegistry};
use bitcoin::hashes::{hash160, ripemd160, sha256, Hash};
use bitcoin::ScriptBuf;

/// Behaviour shared by every script-output payload
pub trait ScriptOutputData {
    const ADDRESS_TYPE: AddressType;

    /// Structural well-formedness of the payload
    fn is_valid(&self) -> bool;

    /// Resolve this output's identity hash(es) through `resolver`
    ///
    /// Returns `None` for outputs without an address identity.
    fn register<R: Resolver + ?Sized>(&mut self, resolver: &mut R)
        -> AppResult<Option<Resolution>>;

    /// Build mode: resolve against the registry, creating addresses as needed
    fn process_output<S: AddressRegistry + ?Sized>(
        &mut self,
        state: &mut S,
    ) -> AppResult<Option<Resolution>> {
        self.register(&mut CreatingResolver::new(state))
    }

    /// Verify mode: resolve against a read-only view, never creating
    fn check_output<S: AddressLookup + ?Sized>(
        &mut self,
        state: &S,
    ) -> AppResult<Option<Resolution>> {
        self.register(&mut VerifyingResolver::new(state))
    }
}

/// Payloads with a single, state-independent identity hash
pub trait IdentityHash {
    fn identity_hash(&self) -> hash160::Hash;
}

fn resolve_identity<T, R>(output: &T, resolver: &mut R) -> AppResult<Option<Resolution>>
where
    T: IdentityHash + ScriptOutputData,
    R: Resolver + ?Sized,
{
    resolver
        .resolve(&output.identity_hash(), T::ADDRESS_TYPE)
        .map(Some)
}

/// `<pubkey> OP_CHECKSIG`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubkeyOutput {
    pub pubkey: RawPubkey,
}

impl PubkeyOutput {
    pub fn new(pubkey: RawPubkey) -> Self {
        Self { pubkey }
    }

    /// Build from raw key bytes, rejecting structurally invalid keys
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        RawPubkey::from_slice(bytes).map(Self::new)
    }
}

impl IdentityHash for PubkeyOutput {
    fn identity_hash(&self) -> hash160::Hash {
        self.pubkey.pubkey_hash()
    }
}

impl ScriptOutputData for PubkeyOutput {
    const ADDRESS_TYPE: AddressType = AddressType::Pubkey;

    fn is_valid(&self) -> bool {
        true
    }

    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        resolve_identity(self, resolver)
    }
}

/// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubkeyHashOutput {
    pub hash: hash160::Hash,
}

impl PubkeyHashOutput {
    pub fn new(hash: hash160::Hash) -> Self {
        Self { hash }
    }
}

impl IdentityHash for PubkeyHashOutput {
    fn identity_hash(&self) -> hash160::Hash {
        self.hash
    }
}

impl ScriptOutputData for PubkeyHashOutput {
    const ADDRESS_TYPE: AddressType = AddressType::PubkeyHash;

    fn is_valid(&self) -> bool {
        true
    }

    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        resolve_identity(self, resolver)
    }
}

/// `OP_0 <20 bytes>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessPubkeyHashOutput {
    pub hash: hash160::Hash,
}

impl WitnessPubkeyHashOutput {
    pub fn new(hash: hash160::Hash) -> Self {
        Self { hash }
    }
}

impl IdentityHash for WitnessPubkeyHashOutput {
    fn identity_hash(&self) -> hash160::Hash {
        self.hash
    }
}

impl ScriptOutputData for WitnessPubkeyHashOutput {
    const ADDRESS_TYPE: AddressType = AddressType::WitnessPubkeyHash;

    fn is_valid(&self) -> bool {
        true
    }

    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        resolve_identity(self, resolver)
    }
}

/// `OP_HASH160 <20 bytes> OP_EQUAL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHashOutput {
    pub hash: hash160::Hash,
}

impl ScriptHashOutput {
    pub fn new(hash: hash160::Hash) -> Self {
        Self { hash }
    }
}

impl IdentityHash for ScriptHashOutput {
    fn identity_hash(&self) -> hash160::Hash {
        self.hash
    }
}

impl ScriptOutputData for ScriptHashOutput {
    const ADDRESS_TYPE: AddressType = AddressType::ScriptHash;

    fn is_valid(&self) -> bool {
        true
    }

    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        resolve_identity(self, resolver)
    }
}

/// `OP_0 <32 bytes>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessScriptHashOutput {
    pub hash: sha256::Hash,
}

impl WitnessScriptHashOutput {
    pub fn new(hash: sha256::Hash) -> Self {
        Self { hash }
    }
}

impl IdentityHash for WitnessScriptHashOutput {
    /// RIPEMD-160 of the witness program.
    ///
    /// The program is SHA-256 of the witness script, so this equals HASH160 of
    /// the script: the same identity a P2SH output of that script has.
    fn identity_hash(&self) -> hash160::Hash {
        let reduced = ripemd160::Hash::hash(self.hash.as_byte_array());
        hash160::Hash::from_byte_array(reduced.to_byte_array())
    }
}

impl ScriptOutputData for WitnessScriptHashOutput {
    const ADDRESS_TYPE: AddressType = AddressType::WitnessScriptHash;

    fn is_valid(&self) -> bool {
        true
    }

    fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        resolve_identity(self, resolver)
    }
}

/// Any script no decoder recognised, kept byte-for-byte
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NonstandardOutput {
    pub script: ScriptBuf,
}

impl NonstandardOutput {
    pub fn new(script: ScriptBuf) -> Self {
        Self { script }
    }
}

impl ScriptOutputData for NonstandardOutput {
    const ADDRESS_TYPE: AddressType = AddressType::Nonstandard;

    fn is_valid(&self) -> bool {
        true
    }

    /// No address identity: nothing to resolve
    fn register<R: Resolver + ?Sized>(
        &mut self,
        _resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        Ok(None)
    }
}

/// `OP_RETURN <pushes...>`; `data` is the concatenation of the pushed bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullDataOutput {
    pub data: Vec<u8>,
}

impl NullDataOutput {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ScriptOutputData for NullDataOutput {
    const ADDRESS_TYPE: AddressType = AddressType::NullData;

    fn is_valid(&self) -> bool {
        true
    }

    /// Provably unspendable: nothing to resolve
    fn register<R: Resolver + ?Sized>(
        &mut self,
        _resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        Ok(None)
    }
}

/// A decoded output script; exactly one payload shape per address type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutput {
    Pubkey(PubkeyOutput),
    PubkeyHash(PubkeyHashOutput),
    WitnessPubkeyHash(WitnessPubkeyHashOutput),
    ScriptHash(ScriptHashOutput),
    WitnessScriptHash(WitnessScriptHashOutput),
    Multisig(MultisigOutput),
    Nonstandard(NonstandardOutput),
    NullData(NullDataOutput),
}

impl ScriptOutput {
    pub fn address_type(&self) -> AddressType {
        match self {
            ScriptOutput::Pubkey(_) => PubkeyOutput::ADDRESS_TYPE,
            ScriptOutput::PubkeyHash(_) => PubkeyHashOutput::ADDRESS_TYPE,
            ScriptOutput::WitnessPubkeyHash(_) => WitnessPubkeyHashOutput::ADDRESS_TYPE,
            ScriptOutput::ScriptHash(_) => ScriptHashOutput::ADDRESS_TYPE,
            ScriptOutput::WitnessScriptHash(_) => WitnessScriptHashOutput::ADDRESS_TYPE,
            ScriptOutput::Multisig(_) => MultisigOutput::ADDRESS_TYPE,
            ScriptOutput::Nonstandard(_) => NonstandardOutput::ADDRESS_TYPE,
            ScriptOutput::NullData(_) => NullDataOutput::ADDRESS_TYPE,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            ScriptOutput::Pubkey(output) => output.is_valid(),
            ScriptOutput::PubkeyHash(output) => output.is_valid(),
            ScriptOutput::WitnessPubkeyHash(output) => output.is_valid(),
            ScriptOutput::ScriptHash(output) => output.is_valid(),
            ScriptOutput::WitnessScriptHash(output) => output.is_valid(),
            ScriptOutput::Multisig(output) => output.is_valid(),
            ScriptOutput::Nonstandard(output) => output.is_valid(),
            ScriptOutput::NullData(output) => output.is_valid(),
        }
    }

    /// The canonical identity hash, if this output has one
    ///
    /// Multisig identity depends on the resolved slot addresses and is `None`
    /// until the output has been processed or checked.
    pub fn identity_hash(&self) -> Option<hash160::Hash> {
        match self {
            ScriptOutput::Pubkey(output) => Some(output.identity_hash()),
            ScriptOutput::PubkeyHash(output) => Some(output.identity_hash()),
            ScriptOutput::WitnessPubkeyHash(output) => Some(output.identity_hash()),
            ScriptOutput::ScriptHash(output) => Some(output.identity_hash()),
            ScriptOutput::WitnessScriptHash(output) => Some(output.identity_hash()),
            ScriptOutput::Multisig(output) => output.aggregate_hash(),
            ScriptOutput::Nonstandard(_) | ScriptOutput::NullData(_) => None,
        }
    }

    /// Run the registration protocol through an arbitrary resolver
    pub fn register<R: Resolver + ?Sized>(
        &mut self,
        resolver: &mut R,
    ) -> AppResult<Option<Resolution>> {
        match self {
            ScriptOutput::Pubkey(output) => output.register(resolver),
            ScriptOutput::PubkeyHash(output) => output.register(resolver),
            ScriptOutput::WitnessPubkeyHash(output) => output.register(resolver),
            ScriptOutput::ScriptHash(output) => output.register(resolver),
            ScriptOutput::WitnessScriptHash(output) => output.register(resolver),
            ScriptOutput::Multisig(output) => output.register(resolver),
            ScriptOutput::Nonstandard(output) => output.register(resolver),
            ScriptOutput::NullData(output) => output.register(resolver),
        }
    }

    /// Build mode registration
    pub fn process_output<S: AddressRegistry + ?Sized>(
        &mut self,
        state: &mut S,
    ) -> AppResult<Option<Resolution>> {
        self.register(&mut CreatingResolver::new(state))
    }

    /// Verify mode registration
    pub fn check_output<S: AddressLookup + ?Sized>(
        &mut self,
        state: &S,
    ) -> AppResult<Option<Resolution>> {
        self.register(&mut VerifyingResolver::new(state))
    }
}
