//! Output-script decoding
//!
//! Classifies raw output scripts into typed `ScriptOutput` variants and runs
//! the registration protocol that maps each variant onto a numeric address.

pub mod address_type;
pub mod decoder;
pub mod extractor;
pub mod multisig;
pub mod output;
pub mod pubkey;
pub mod registration;
pub mod report;

pub use address_type::{Address, AddressType, DedupType};
pub use extractor::{extract_from_bytes, extract_script_data, DECODE_ORDER};
pub use multisig::{MultisigError, MultisigOutput, MultisigSlot, MAX_MULTISIG_KEYS};
pub use output::{
    IdentityHash, NonstandardOutput, NullDataOutput, PubkeyHashOutput, PubkeyOutput,
    ScriptHashOutput, ScriptOutput, ScriptOutputData, WitnessPubkeyHashOutput,
    WitnessScriptHashOutput,
};
pub use pubkey::RawPubkey;
pub use registration::{CreatingResolver, Resolution, Resolver, VerifyingResolver};
pub use report::OutputReport;
