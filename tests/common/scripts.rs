//! Hex builders for standard output scripts

use bitcoin::hashes::{hash160, sha256, Hash};

/// Generator point, compressed
pub const KEY_G: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
/// 2G, compressed
pub const KEY_B: &str = "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
/// Genesis coinbase key, uncompressed
pub const KEY_GENESIS: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

pub const KEY_G_HASH160: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";
pub const KEY_GENESIS_HASH160: &str = "62e907b15cbf27d5425399ebf6f0fb50ebb88f18";

fn push(data_hex: &str) -> String {
    let len = data_hex.len() / 2;
    assert!(len <= 75, "direct pushes only");
    format!("{:02x}{}", len, data_hex)
}

pub fn p2pk(key_hex: &str) -> String {
    format!("{}ac", push(key_hex))
}

pub fn p2pkh(hash_hex: &str) -> String {
    format!("76a914{}88ac", hash_hex)
}

pub fn p2wpkh(hash_hex: &str) -> String {
    format!("0014{}", hash_hex)
}

pub fn p2sh(hash_hex: &str) -> String {
    format!("a914{}87", hash_hex)
}

pub fn p2wsh(program_hex: &str) -> String {
    format!("0020{}", program_hex)
}

/// P2SH paying to `script_hex`
pub fn p2sh_of(script_hex: &str) -> String {
    p2sh(&hash160_hex(script_hex))
}

/// P2WSH paying to `script_hex`
pub fn p2wsh_of(script_hex: &str) -> String {
    let program = sha256::Hash::hash(&hex::decode(script_hex).expect("valid hex"));
    p2wsh(&hex::encode(program.as_byte_array()))
}

/// `OP_m <keys> OP_n OP_CHECKMULTISIG`, n taken from the key count
pub fn multisig(required: u8, keys: &[&str]) -> String {
    let pushes: String = keys.iter().map(|key| push(key)).collect();
    format!(
        "{:02x}{}{:02x}ae",
        0x50 + required,
        pushes,
        0x50 + keys.len() as u8
    )
}

pub fn op_return(data_hex: &str) -> String {
    format!("6a{}", push(data_hex))
}

pub fn hash160_hex(data_hex: &str) -> String {
    let hash = hash160::Hash::hash(&hex::decode(data_hex).expect("valid hex"));
    hex::encode(hash.as_byte_array())
}

pub fn bytes(script_hex: &str) -> Vec<u8> {
    hex::decode(script_hex).expect("valid hex")
}
