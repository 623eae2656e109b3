//! Records flowing into and out of the output processor

use crate::script::{AddressType, Resolution};
use serde::{Deserialize, Serialize};

/// Raw UTXO record from a bitcoin-utxo-dump CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxoRecord {
    pub count: u64,
    pub txid: String,
    pub vout: u32,
    pub height: u32,
    pub coinbase: u8,   // 0 or 1
    pub amount: u64,    // Satoshis
    pub script: String, // Hex-encoded script
    /// Type label assigned by the dump tool; informational only
    #[serde(rename = "type")]
    pub script_type: String,
    pub address: String,
}

impl UtxoRecord {
    /// Decode the script hex, tolerating surrounding whitespace
    pub fn script_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(self.script.trim())
    }
}

/// Registration result for one output, as persisted by build mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub txid: String,
    pub vout: u32,
    pub height: u32,
    pub address_type: AddressType,
    /// `None` for outputs without an address identity
    pub address_num: Option<u32>,
    pub first_seen: bool,
}

impl OutputRecord {
    pub fn new(utxo: &UtxoRecord, address_type: AddressType, resolution: Option<Resolution>) -> Self {
        Self {
            txid: utxo.txid.clone(),
            vout: utxo.vout,
            height: utxo.height,
            address_type,
            address_num: resolution.map(|r| r.address.address_num),
            first_seen: resolution.is_some_and(|r| r.first_seen),
        }
    }
}
