//! Address-type catalog
//!
//! The closed set of output-script templates the extractor recognises, and the
//! dedup classes that decide which templates share one identity space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output-script templates recognised by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Pay-to-PubKey (legacy)
    Pubkey,
    /// Pay-to-PubKey-Hash
    PubkeyHash,
    /// Pay-to-Witness-PubKey-Hash (SegWit v0)
    #[serde(rename = "witness_pubkeyhash")]
    WitnessPubkeyHash,
    /// Pay-to-Script-Hash
    ScriptHash,
    /// Pay-to-Witness-Script-Hash (SegWit v0)
    #[serde(rename = "witness_scripthash")]
    WitnessScriptHash,
    /// Bare M-of-N multisig
    Multisig,
    /// Anything not matching a known template
    Nonstandard,
    /// OP_RETURN data carrier
    #[serde(rename = "null_data")]
    NullData,
}

impl AddressType {
    /// Every address type, in catalog order
    pub const ALL: [AddressType; 8] = [
        AddressType::Pubkey,
        AddressType::PubkeyHash,
        AddressType::WitnessPubkeyHash,
        AddressType::ScriptHash,
        AddressType::WitnessScriptHash,
        AddressType::Multisig,
        AddressType::Nonstandard,
        AddressType::NullData,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Pubkey => "pubkey",
            AddressType::PubkeyHash => "pubkeyhash",
            AddressType::WitnessPubkeyHash => "witness_pubkeyhash",
            AddressType::ScriptHash => "scripthash",
            AddressType::WitnessScriptHash => "witness_scripthash",
            AddressType::Multisig => "multisig",
            AddressType::Nonstandard => "nonstandard",
            AddressType::NullData => "null_data",
        }
    }

    /// The identity space this type's hashes live in
    pub fn dedup_type(&self) -> DedupType {
        match self {
            AddressType::Pubkey | AddressType::PubkeyHash | AddressType::WitnessPubkeyHash => {
                DedupType::Pubkey
            }
            AddressType::ScriptHash | AddressType::WitnessScriptHash => DedupType::ScriptHash,
            AddressType::Multisig => DedupType::Multisig,
            AddressType::Nonstandard => DedupType::Nonstandard,
            AddressType::NullData => DedupType::NullData,
        }
    }

    /// Whether outputs of this type carry an identity hash
    pub fn has_identity(&self) -> bool {
        !matches!(self, AddressType::Nonstandard | AddressType::NullData)
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = crate::errors::AppError;

    /// Parse from the database representation, accepting the common aliases
    /// used by Bitcoin Core and UTXO dump tools
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pubkey" | "p2pk" => AddressType::Pubkey,
            "pubkeyhash" | "p2pkh" => AddressType::PubkeyHash,
            "witness_pubkeyhash" | "witness_v0_keyhash" | "p2wpkh" => {
                AddressType::WitnessPubkeyHash
            }
            "scripthash" | "p2sh" => AddressType::ScriptHash,
            "witness_scripthash" | "witness_v0_scripthash" | "p2wsh" => {
                AddressType::WitnessScriptHash
            }
            "multisig" | "p2ms" => AddressType::Multisig,
            "nonstandard" => AddressType::Nonstandard,
            "null_data" | "nulldata" | "op_return" => AddressType::NullData,
            other => {
                return Err(crate::errors::AppError::InvalidData(format!(
                    "Unknown address type: {}",
                    other
                )))
            }
        })
    }
}

/// Identity spaces shared by address types
///
/// P2PK, P2PKH and P2WPKH all key on HASH160 of a public key; P2SH and P2WSH
/// both key on HASH160 of a script. Address numbers are assigned per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupType {
    Pubkey,
    ScriptHash,
    Multisig,
    Nonstandard,
    #[serde(rename = "null_data")]
    NullData,
}

impl DedupType {
    /// Classes that hand out address numbers
    pub const WITH_IDENTITY: [DedupType; 3] =
        [DedupType::Pubkey, DedupType::ScriptHash, DedupType::Multisig];

    pub fn as_str(&self) -> &'static str {
        match self {
            DedupType::Pubkey => "pubkey",
            DedupType::ScriptHash => "scripthash",
            DedupType::Multisig => "multisig",
            DedupType::Nonstandard => "nonstandard",
            DedupType::NullData => "null_data",
        }
    }
}

impl fmt::Display for DedupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric address identifier handed out by the address state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub address_num: u32,
    pub address_type: AddressType,
}

impl Address {
    pub fn new(address_num: u32, address_type: AddressType) -> Self {
        Self {
            address_num,
            address_type,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address_type, self.address_num)
    }
}
