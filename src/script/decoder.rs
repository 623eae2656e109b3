//! Per-template decoders
//!
//! Each decoder is a pure function from a script to its payload. A script that
//! does not fit the template, or fits its shape but fails validation (a bad
//! key, inconsistent multisig counts), yields `None` so the extractor can fall
//! through to the next template.

use super::multisig::MultisigOutput;
use super::output::{
    NullDataOutput, PubkeyHashOutput, PubkeyOutput, ScriptHashOutput, ScriptOutputData,
    WitnessPubkeyHashOutput, WitnessScriptHashOutput,
};
use bitcoin::hashes::{hash160, sha256, Hash};
use bitcoin::opcodes::all::{OP_CHECKMULTISIG, OP_CHECKSIG, OP_PUSHNUM_1, OP_PUSHNUM_16, OP_RETURN};
use bitcoin::script::Instruction;
use bitcoin::Script;
use tracing::debug;

fn hash160_at(bytes: &[u8], start: usize) -> Option<hash160::Hash> {
    let raw: [u8; 20] = bytes.get(start..start + 20)?.try_into().ok()?;
    Some(hash160::Hash::from_byte_array(raw))
}

fn sha256_at(bytes: &[u8], start: usize) -> Option<sha256::Hash> {
    let raw: [u8; 32] = bytes.get(start..start + 32)?.try_into().ok()?;
    Some(sha256::Hash::from_byte_array(raw))
}

/// Value of an OP_1..OP_16 instruction
fn small_int(instruction: &Instruction) -> Option<u8> {
    match instruction {
        Instruction::Op(op)
            if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&op.to_u8()) =>
        {
            Some(op.to_u8() - OP_PUSHNUM_1.to_u8() + 1)
        }
        _ => None,
    }
}

/// `<pubkey> OP_CHECKSIG` with a structurally valid key
pub fn decode_pubkey(script: &Script) -> Option<PubkeyOutput> {
    let mut instructions = script.instructions();

    let key = match instructions.next()? {
        Ok(Instruction::PushBytes(bytes)) => bytes.as_bytes(),
        _ => return None,
    };
    match instructions.next()? {
        Ok(Instruction::Op(op)) if op == OP_CHECKSIG => {}
        _ => return None,
    }
    if instructions.next().is_some() {
        return None;
    }

    let output = PubkeyOutput::from_slice(key);
    if output.is_none() {
        debug!(
            "P2PK-shaped script with invalid {}-byte key: {}",
            key.len(),
            hex::encode(script.as_bytes())
        );
    }
    output
}

/// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
pub fn decode_pubkey_hash(script: &Script) -> Option<PubkeyHashOutput> {
    if !script.is_p2pkh() {
        return None;
    }
    hash160_at(script.as_bytes(), 3).map(PubkeyHashOutput::new)
}

/// `OP_0 <20>`
pub fn decode_witness_pubkey_hash(script: &Script) -> Option<WitnessPubkeyHashOutput> {
    if !script.is_p2wpkh() {
        return None;
    }
    hash160_at(script.as_bytes(), 2).map(WitnessPubkeyHashOutput::new)
}

/// `OP_HASH160 <20> OP_EQUAL`
pub fn decode_script_hash(script: &Script) -> Option<ScriptHashOutput> {
    if !script.is_p2sh() {
        return None;
    }
    hash160_at(script.as_bytes(), 2).map(ScriptHashOutput::new)
}

/// `OP_0 <32>`
pub fn decode_witness_script_hash(script: &Script) -> Option<WitnessScriptHashOutput> {
    if !script.is_p2wsh() {
        return None;
    }
    sha256_at(script.as_bytes(), 2).map(WitnessScriptHashOutput::new)
}

/// `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
///
/// Keys are validated and added in script order; at most 16 are accepted, and
/// the output must end up with `m <= n` and exactly `n` keys.
pub fn decode_multisig(script: &Script) -> Option<MultisigOutput> {
    let bytes = script.as_bytes();
    if bytes.last() != Some(&OP_CHECKMULTISIG.to_u8()) {
        return None;
    }

    let instructions: Vec<Instruction> = script.instructions().collect::<Result<_, _>>().ok()?;
    let (first, rest) = instructions.split_first()?;
    let (last, rest) = rest.split_last()?;
    let (total_op, keys) = rest.split_last()?;

    if !matches!(last, Instruction::Op(op) if *op == OP_CHECKMULTISIG) {
        return None;
    }
    let num_required = small_int(first)?;
    let num_total = small_int(total_op)?;

    let mut multisig = MultisigOutput::new(num_required, num_total);
    for key in keys {
        let Instruction::PushBytes(key_bytes) = key else {
            return None;
        };
        if let Err(e) = multisig.add_address(key_bytes.as_bytes()) {
            debug!("Rejecting multisig-shaped script: {}", e);
            return None;
        }
    }

    if multisig.is_valid() {
        Some(multisig)
    } else {
        debug!(
            "Rejecting {}-of-{} multisig with {} keys",
            num_required,
            num_total,
            multisig.address_count()
        );
        None
    }
}

/// `OP_RETURN` followed by push-only instructions
///
/// The payload is every pushed byte after the marker, concatenated. Small
/// integer opcodes are allowed but contribute no bytes.
pub fn decode_null_data(script: &Script) -> Option<NullDataOutput> {
    let bytes = script.as_bytes();
    if bytes.first() != Some(&OP_RETURN.to_u8()) {
        return None;
    }

    let mut data = Vec::new();
    for instruction in Script::from_bytes(&bytes[1..]).instructions() {
        match instruction.ok()? {
            Instruction::PushBytes(push) => data.extend_from_slice(push.as_bytes()),
            Instruction::Op(op) if op.to_u8() <= OP_PUSHNUM_16.to_u8() => {}
            Instruction::Op(_) => return None,
        }
    }
    Some(NullDataOutput::new(data))
}
