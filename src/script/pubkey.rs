//! Public keys captured from output scripts
//!
//! Decoding only requires a key to be *structurally* valid: the right length
//! for its prefix byte. Whether the bytes are a point on secp256k1 is reported
//! separately and never changes how a script is classified.

use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::PublicKey;
use std::fmt;

/// Length of a compressed SEC1 public key
pub const COMPRESSED_PUBKEY_LEN: usize = 33;
/// Length of an uncompressed (or hybrid) SEC1 public key
pub const UNCOMPRESSED_PUBKEY_LEN: usize = 65;

/// A structurally valid public key as it appeared in the script
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum RawPubkey {
    /// `0x02`/`0x03` prefix + 32-byte X coordinate
    Compressed([u8; COMPRESSED_PUBKEY_LEN]),
    /// `0x04` (or hybrid `0x06`/`0x07`) prefix + X + Y coordinates
    Uncompressed([u8; UNCOMPRESSED_PUBKEY_LEN]),
}

impl RawPubkey {
    /// Accept the bytes if their length matches what the prefix byte declares
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match (bytes.first().copied(), bytes.len()) {
            (Some(0x02 | 0x03), COMPRESSED_PUBKEY_LEN) => {
                let mut key = [0u8; COMPRESSED_PUBKEY_LEN];
                key.copy_from_slice(bytes);
                Some(RawPubkey::Compressed(key))
            }
            (Some(0x04 | 0x06 | 0x07), UNCOMPRESSED_PUBKEY_LEN) => {
                let mut key = [0u8; UNCOMPRESSED_PUBKEY_LEN];
                key.copy_from_slice(bytes);
                Some(RawPubkey::Uncompressed(key))
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawPubkey::Compressed(key) => key,
            RawPubkey::Uncompressed(key) => key,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, RawPubkey::Compressed(_))
    }

    /// HASH160 of the serialized key, the key's address identity
    pub fn pubkey_hash(&self) -> hash160::Hash {
        hash160::Hash::hash(self.as_bytes())
    }

    /// Whether the bytes decode to a point on secp256k1
    pub fn is_valid_ec_point(&self) -> bool {
        PublicKey::from_slice(self.as_bytes()).is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Debug for RawPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPubkey({})", self.to_hex())
    }
}

impl fmt::Display for RawPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
