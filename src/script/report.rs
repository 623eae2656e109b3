//! JSON-serialisable summary of a decoded output, used by the `decode` command.

use super::output::ScriptOutput;
use super::pubkey::RawPubkey;
use super::AddressType;
use bitcoin::hashes::Hash;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PubkeyReport {
    pub pubkey: String,
    pub compressed: bool,
    pub is_valid_ec_point: bool,
    pub pubkey_hash: String,
}

impl From<&RawPubkey> for PubkeyReport {
    fn from(pubkey: &RawPubkey) -> Self {
        Self {
            pubkey: pubkey.to_hex(),
            compressed: pubkey.is_compressed(),
            is_valid_ec_point: pubkey.is_valid_ec_point(),
            pubkey_hash: hex::encode(pubkey.pubkey_hash().as_byte_array()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputDetails {
    Pubkey(PubkeyReport),
    Hash { hash: String },
    Multisig {
        num_required: u8,
        num_total: u8,
        pubkeys: Vec<PubkeyReport>,
    },
    Nonstandard { script: String },
    NullData { data: String, data_len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputReport {
    pub address_type: AddressType,
    pub is_valid: bool,
    /// Absent for data carriers, nonstandard scripts and unresolved multisig
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_hash: Option<String>,
    pub details: OutputDetails,
}

impl From<&ScriptOutput> for OutputReport {
    fn from(output: &ScriptOutput) -> Self {
        let details = match output {
            ScriptOutput::Pubkey(p2pk) => OutputDetails::Pubkey(PubkeyReport::from(&p2pk.pubkey)),
            ScriptOutput::PubkeyHash(p2pkh) => OutputDetails::Hash {
                hash: hex::encode(p2pkh.hash.as_byte_array()),
            },
            ScriptOutput::WitnessPubkeyHash(p2wpkh) => OutputDetails::Hash {
                hash: hex::encode(p2wpkh.hash.as_byte_array()),
            },
            ScriptOutput::ScriptHash(p2sh) => OutputDetails::Hash {
                hash: hex::encode(p2sh.hash.as_byte_array()),
            },
            ScriptOutput::WitnessScriptHash(p2wsh) => OutputDetails::Hash {
                hash: hex::encode(p2wsh.hash.as_byte_array()),
            },
            ScriptOutput::Multisig(multisig) => OutputDetails::Multisig {
                num_required: multisig.num_required(),
                num_total: multisig.num_total(),
                pubkeys: multisig.pubkeys().map(PubkeyReport::from).collect(),
            },
            ScriptOutput::Nonstandard(nonstandard) => OutputDetails::Nonstandard {
                script: hex::encode(nonstandard.script.as_bytes()),
            },
            ScriptOutput::NullData(null_data) => OutputDetails::NullData {
                data: hex::encode(&null_data.data),
                data_len: null_data.data.len(),
            },
        };

        Self {
            address_type: output.address_type(),
            is_valid: output.is_valid(),
            identity_hash: output
                .identity_hash()
                .map(|hash| hex::encode(hash.as_byte_array())),
            details,
        }
    }
}
