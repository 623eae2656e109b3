//! Script classification
//!
//! Tries each template decoder in a fixed order and wraps the first match in
//! the corresponding `ScriptOutput` variant. A script nothing recognises is
//! kept whole as `Nonstandard`, so extraction never fails.

use super::decoder::{
    decode_multisig, decode_null_data, decode_pubkey, decode_pubkey_hash, decode_script_hash,
    decode_witness_pubkey_hash, decode_witness_script_hash,
};
use super::output::{NonstandardOutput, ScriptOutput};
use super::AddressType;
use bitcoin::Script;
use tracing::trace;

/// Order in which templates are tried; the first match wins
pub const DECODE_ORDER: [AddressType; 7] = [
    AddressType::Pubkey,
    AddressType::PubkeyHash,
    AddressType::WitnessPubkeyHash,
    AddressType::ScriptHash,
    AddressType::WitnessScriptHash,
    AddressType::Multisig,
    AddressType::NullData,
];

fn decode_as(address_type: AddressType, script: &Script) -> Option<ScriptOutput> {
    match address_type {
        AddressType::Pubkey => decode_pubkey(script).map(ScriptOutput::Pubkey),
        AddressType::PubkeyHash => decode_pubkey_hash(script).map(ScriptOutput::PubkeyHash),
        AddressType::WitnessPubkeyHash => {
            decode_witness_pubkey_hash(script).map(ScriptOutput::WitnessPubkeyHash)
        }
        AddressType::ScriptHash => decode_script_hash(script).map(ScriptOutput::ScriptHash),
        AddressType::WitnessScriptHash => {
            decode_witness_script_hash(script).map(ScriptOutput::WitnessScriptHash)
        }
        AddressType::Multisig => decode_multisig(script).map(ScriptOutput::Multisig),
        AddressType::NullData => decode_null_data(script).map(ScriptOutput::NullData),
        AddressType::Nonstandard => None,
    }
}

/// Classify an output script
pub fn extract_script_data(script: &Script) -> ScriptOutput {
    let output = DECODE_ORDER
        .iter()
        .find_map(|address_type| decode_as(*address_type, script))
        .unwrap_or_else(|| ScriptOutput::Nonstandard(NonstandardOutput::new(script.to_owned())));

    trace!(
        "Classified {}-byte script as {}",
        script.len(),
        output.address_type()
    );
    output
}

/// Classify raw script bytes
pub fn extract_from_bytes(bytes: &[u8]) -> ScriptOutput {
    extract_script_data(Script::from_bytes(bytes))
}
