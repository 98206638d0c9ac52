//! Revert extraction/decoding and finalization-readiness classification.

mod support;

use alloy::primitives::{keccak256, Bytes, U256};
use rollup_client::{ClientError, FinalizeReadiness, RevertDecoder};
use support::encode_error_string;

/// Raw revert payload for a custom error with no arguments.
fn custom_error(signature: &str) -> Bytes {
    Bytes::from(keccak256(signature.as_bytes())[..4].to_vec())
}

/// Raw revert payload for a custom error with one uint256 argument.
fn custom_error_uint(signature: &str, value: u64) -> Bytes {
    let mut data = keccak256(signature.as_bytes())[..4].to_vec();
    data.extend_from_slice(&U256::from(value).to_be_bytes::<32>());
    Bytes::from(data)
}

#[test]
fn doubly_nested_error_string_decodes() {
    // Provider error shaped {error:{error:{data: Error(string) of 'x'}}}.
    let err = ClientError::new("call failed").with_cause(
        ClientError::new("rpc error").with_cause(
            ClientError::new("execution reverted").with_data(encode_error_string("x")),
        ),
    );

    let decoded = RevertDecoder::new().decode(&err).expect("should decode");
    assert_eq!(decoded.name.as_deref(), Some("Error"));
    assert_eq!(decoded.args, Some(vec!["x".to_string()]));
}

#[test]
fn error_without_any_revert_data_decodes_to_none() {
    let err = ClientError::new("timeout")
        .with_cause(ClientError::new("socket closed").with_cause(ClientError::new("eof")));
    assert!(RevertDecoder::new().decode(&err).is_none());
}

#[test]
fn already_finalized_classifies_as_finalized() {
    let err = ClientError::new("execution reverted")
        .with_data(custom_error("WithdrawalAlreadyFinalized()"));
    assert_eq!(
        RevertDecoder::new().classify_readiness(&err),
        FinalizeReadiness::Finalized
    );
}

#[test]
fn batch_not_executed_classifies_as_not_ready() {
    let err = ClientError::new("execution reverted")
        .with_data(custom_error_uint("BatchNotExecuted(uint256)", 812));
    match RevertDecoder::new().classify_readiness(&err) {
        FinalizeReadiness::NotReady { reason, .. } => assert_eq!(reason, "batch-not-executed"),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn proof_root_missing_classifies_as_not_ready() {
    let err = ClientError::new("execution reverted").with_data(custom_error("LocalRootIsZero()"));
    match RevertDecoder::new().classify_readiness(&err) {
        FinalizeReadiness::NotReady { reason, .. } => assert_eq!(reason, "proof-root-missing"),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn invalid_message_family_is_unfinalizable() {
    for sig in ["InvalidProof()", "WrongL2Sender(address)", "WrongMsgLength(uint256)"] {
        let data = if sig.contains('(') && !sig.ends_with("()") {
            let mut bytes = keccak256(sig.as_bytes())[..4].to_vec();
            bytes.extend_from_slice(&[0u8; 32]);
            Bytes::from(bytes)
        } else {
            custom_error(sig)
        };
        let err = ClientError::new("execution reverted").with_data(data);
        match RevertDecoder::new().classify_readiness(&err) {
            FinalizeReadiness::Unfinalizable { reason, detail } => {
                assert_eq!(reason, "message-invalid");
                assert!(detail.is_some());
            }
            other => panic!("expected Unfinalizable for {sig}, got {other:?}"),
        }
    }
}

#[test]
fn paused_message_classifies_as_not_ready() {
    let err = ClientError::new("Bridge is Paused right now");
    match RevertDecoder::new().classify_readiness(&err) {
        FinalizeReadiness::NotReady { reason, .. } => assert_eq!(reason, "paused"),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn unknown_custom_error_is_unsupported() {
    let err = ClientError::new("execution reverted")
        .with_data(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
    match RevertDecoder::new().classify_readiness(&err) {
        FinalizeReadiness::Unfinalizable { reason, detail } => {
            assert_eq!(reason, "unsupported");
            assert_eq!(detail.as_deref(), Some("0xdeadbeef"));
        }
        other => panic!("expected Unfinalizable, got {other:?}"),
    }
}

#[test]
fn plain_failure_is_not_ready_unknown_with_lowercased_detail() {
    let err = ClientError::new("Node Unavailable");
    match RevertDecoder::new().classify_readiness(&err) {
        FinalizeReadiness::NotReady { reason, detail } => {
            assert_eq!(reason, "unknown");
            assert_eq!(detail.as_deref(), Some("node unavailable"));
        }
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[test]
fn classification_is_pure() {
    let decoder = RevertDecoder::new();
    let err = ClientError::new("execution reverted")
        .with_data(custom_error("WithdrawalAlreadyFinalized()"));
    let first = decoder.classify_readiness(&err);
    let second = decoder.classify_readiness(&err);
    assert_eq!(first, second);
}

#[test]
fn registered_abis_extend_decoding_at_runtime() {
    let decoder = RevertDecoder::new();
    let err = ClientError::new("execution reverted")
        .with_data(custom_error_uint("VaultSharePriceStale(uint256)", 99));

    // Unknown before registration.
    assert!(decoder.decode(&err).unwrap().name.is_none());

    decoder
        .registry()
        .register("Vault", &["VaultSharePriceStale(uint256)"]);

    let decoded = decoder.decode(&err).unwrap();
    assert_eq!(decoded.name.as_deref(), Some("VaultSharePriceStale"));
    assert_eq!(decoded.args, Some(vec!["99".to_string()]));
    assert_eq!(decoded.contract.as_deref(), Some("Vault"));
}
