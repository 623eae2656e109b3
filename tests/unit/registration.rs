use crate::common::scripts::{self, KEY_B, KEY_G, KEY_GENESIS, KEY_G_HASH160};
use crate::common::CountingState;
use script_address_parser::errors::AppError;
use script_address_parser::script::{
    extract_from_bytes, AddressType, DedupType, MultisigOutput, NullDataOutput, ScriptOutput,
    ScriptOutputData,
};
use script_address_parser::state::{AddressLookup, InMemoryAddressState};

fn classify(script_hex: &str) -> ScriptOutput {
    extract_from_bytes(&scripts::bytes(script_hex))
}

fn multisig_of(output: &ScriptOutput) -> &MultisigOutput {
    match output {
        ScriptOutput::Multisig(multisig) => multisig,
        other => panic!("expected multisig, got {:?}", other.address_type()),
    }
}

#[test]
fn test_p2pk_and_p2pkh_resolve_to_one_address() {
    let mut state = InMemoryAddressState::new();

    let p2pk = classify(&scripts::p2pk(KEY_G))
        .process_output(&mut state)
        .unwrap()
        .unwrap();
    let p2pkh = classify(&scripts::p2pkh(KEY_G_HASH160))
        .process_output(&mut state)
        .unwrap()
        .unwrap();

    assert!(p2pk.first_seen);
    assert!(!p2pkh.first_seen);
    assert_eq!(p2pk.address.address_num, p2pkh.address.address_num);
    assert_eq!(p2pk.address.address_type, AddressType::Pubkey);
    assert_eq!(p2pkh.address.address_type, AddressType::PubkeyHash);
    assert_eq!(state.address_count(DedupType::Pubkey).unwrap(), 1);
}

#[test]
fn test_multisig_slots_record_resolution() {
    let mut state = InMemoryAddressState::new();
    // Key G is already known before the multisig is seen
    classify(&scripts::p2pkh(KEY_G_HASH160))
        .process_output(&mut state)
        .unwrap();

    let mut output = classify(&scripts::multisig(1, &[KEY_G, KEY_B]));
    let resolution = output.process_output(&mut state).unwrap().unwrap();

    let slots = multisig_of(&output).slots();
    assert_eq!(slots[0].address.unwrap().address_num, 1);
    assert!(!slots[0].first_seen);
    assert_eq!(slots[1].address.unwrap().address_num, 2);
    assert!(slots[1].first_seen);

    assert!(resolution.first_seen);
    assert_eq!(resolution.address.address_type, AddressType::Multisig);
    assert_eq!(resolution.address.address_num, 1);
    assert_eq!(output.identity_hash(), multisig_of(&output).aggregate_hash());
}

#[test]
fn test_multisig_aggregate_is_deterministic_and_order_sensitive() {
    let mut state = InMemoryAddressState::new();

    let mut first = classify(&scripts::multisig(1, &[KEY_G, KEY_B]));
    let mut again = classify(&scripts::multisig(1, &[KEY_G, KEY_B]));
    let mut reversed = classify(&scripts::multisig(1, &[KEY_B, KEY_G]));

    let first_res = first.process_output(&mut state).unwrap().unwrap();
    let again_res = again.process_output(&mut state).unwrap().unwrap();
    let reversed_res = reversed.process_output(&mut state).unwrap().unwrap();

    assert_eq!(first.identity_hash(), again.identity_hash());
    assert_eq!(first_res.address, again_res.address);
    assert!(!again_res.first_seen);
    assert!(multisig_of(&again).slots().iter().all(|slot| !slot.first_seen));

    assert_ne!(first.identity_hash(), reversed.identity_hash());
    assert_ne!(first_res.address, reversed_res.address);
    assert!(reversed_res.first_seen);
    assert_eq!(state.address_count(DedupType::Multisig).unwrap(), 2);
    assert_eq!(state.address_count(DedupType::Pubkey).unwrap(), 2);
}

#[test]
fn test_check_output_does_not_mutate_and_is_idempotent() {
    let mut state = InMemoryAddressState::new();
    let script_hexes = [
        scripts::p2pk(KEY_GENESIS),
        scripts::p2sh_of(&scripts::p2pk(KEY_G)),
        scripts::multisig(2, &[KEY_G, KEY_B]),
    ];
    for script_hex in &script_hexes {
        classify(script_hex).process_output(&mut state).unwrap();
    }

    let snapshot = state.clone();
    for script_hex in &script_hexes {
        let mut output = classify(script_hex);
        let first = output.check_output(&state).unwrap().unwrap();
        let second = output.check_output(&state).unwrap().unwrap();
        assert_eq!(first, second);
        assert!(!first.first_seen);
    }
    assert_eq!(state, snapshot);
}

#[test]
fn test_check_output_reports_missing_identity() {
    let state = InMemoryAddressState::new();

    let err = classify(&scripts::p2pkh(KEY_G_HASH160))
        .check_output(&state)
        .unwrap_err();
    match err {
        AppError::VerificationMismatch { address_type, hash } => {
            assert_eq!(address_type, AddressType::PubkeyHash);
            assert_eq!(hash, KEY_G_HASH160);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(state.is_empty());
}

#[test]
fn test_check_output_multisig_with_unknown_key() {
    let mut state = InMemoryAddressState::new();
    classify(&scripts::p2pk(KEY_G))
        .process_output(&mut state)
        .unwrap();

    let err = classify(&scripts::multisig(1, &[KEY_G, KEY_B]))
        .check_output(&state)
        .unwrap_err();
    assert!(err.is_verification_mismatch());
}

#[test]
fn test_null_data_makes_zero_state_calls() {
    let mut state = CountingState::new();

    let mut output = classify(&scripts::op_return("cafebabe"));
    assert!(output.process_output(&mut state).unwrap().is_none());
    assert!(output.check_output(&state).unwrap().is_none());

    let mut direct = NullDataOutput::new(vec![0; 40]);
    assert!(direct.process_output(&mut state).unwrap().is_none());

    assert_eq!(state.total_calls(), 0);
}

#[test]
fn test_nonstandard_makes_zero_state_calls() {
    let mut state = CountingState::new();
    let mut output = classify("deadbeef");
    assert!(output.process_output(&mut state).unwrap().is_none());
    assert_eq!(state.total_calls(), 0);
}

#[test]
fn test_check_mode_never_creates() {
    let mut state = CountingState::new();
    classify(&scripts::p2pk(KEY_G))
        .process_output(&mut state)
        .unwrap();
    let creates_after_build = state.creates();

    classify(&scripts::p2pkh(KEY_G_HASH160))
        .check_output(&state)
        .unwrap();
    let _ = classify(&scripts::p2pkh(&scripts::hash160_hex(KEY_B))).check_output(&state);

    assert_eq!(state.creates(), creates_after_build);
    assert_eq!(state.lookups(), 2);
}

#[test]
fn test_invalid_multisig_rejected_before_state_is_touched() {
    let mut state = CountingState::new();
    let mut multisig = MultisigOutput::new(2, 3);
    multisig.add_address(&scripts::bytes(KEY_G)).unwrap();
    multisig.add_address(&scripts::bytes(KEY_B)).unwrap();
    assert!(!multisig.is_valid());

    let err = multisig.process_output(&mut state).unwrap_err();
    assert!(matches!(err, AppError::InvalidData(_)));
    assert_eq!(state.total_calls(), 0);
}
