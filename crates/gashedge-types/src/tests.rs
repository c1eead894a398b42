use crate::*;

#[test]
fn test_request_serde_round_trip() {
    let req = TransactionRequest::call(
        7,
        Address::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap(),
        Wei::from_milli_eth(600),
        vec![0xde, 0xad, 0xbe, 0xef],
    );
    let json = serde_json::to_string(&req).unwrap();
    let back: TransactionRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(req, back);
    assert!(json.contains("0xdeadbeef"));
}

#[test]
fn test_window_serde_round_trip() {
    let window = BlockWindow::new(100, 110, 120).unwrap();
    let json = serde_json::to_string(&window).unwrap();
    let back: BlockWindow = serde_json::from_str(&json).unwrap();
    assert_eq!(window, back);
}

#[test]
fn test_address_serde_as_hex_string() {
    let addr = Address::from_bytes([0xab; 20]);
    let json = serde_json::to_string(&addr).unwrap();
    assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
    let back: Address = serde_json::from_str(&json).unwrap();
    assert_eq!(addr, back);
}

#[test]
fn test_error_messages_are_stable() {
    let err = HedgeError::BadNonce {
        expected: 2,
        got: 0,
    };
    assert_eq!(err.to_string(), "Nonce incorrect: expected 2, got 0");

    let err = HedgeError::Unauthorized("signer is not the wallet owner".to_string());
    assert!(err.to_string().starts_with("UNAUTH"));

    let err = HedgeError::LockedFundsViolation("request value exceeds free balance".to_string());
    assert!(err.to_string().starts_with("cannot spend locked funds"));

    let err = HedgeError::NotYetActive {
        current: 15,
        start_block: 20,
    };
    assert!(err.to_string().starts_with("Start block not reached"));
}

#[test]
fn test_wei_display_in_errors() {
    let err = HedgeError::WrongCollateral {
        required: Wei::from_eth(1),
        posted: Wei::from_milli_eth(500),
    };
    assert_eq!(
        err.to_string(),
        "Wrong collateral: need exactly 1000000000000000000, got 500000000000000000"
    );
}

mod wei_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn add_then_sub_restores(a in 0u128..=u128::MAX / 2, b in 0u128..=u128::MAX / 2) {
            let a = Wei::from_wei(a);
            let b = Wei::from_wei(b);
            let sum = a.checked_add(b).unwrap();
            prop_assert_eq!(sum.checked_sub(b).unwrap(), a);
        }

        #[test]
        fn checked_sub_never_underflows_silently(a in any::<u128>(), b in any::<u128>()) {
            let result = Wei::from_wei(a).checked_sub(Wei::from_wei(b));
            if a >= b {
                prop_assert_eq!(result.unwrap().raw(), a - b);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}

#[test]
fn test_full_epoch_window_walk() {
    // A window shaped like the ones used throughout the integration tests:
    // registration for ten blocks, a quiet gap, then a ten-block run.
    let window = BlockWindow::new(10, 20, 30).unwrap();
    let mut phases = Vec::new();
    for now in [0, 10, 11, 19, 20, 25, 30, 31] {
        phases.push(window.phase(now));
    }
    assert_eq!(
        phases,
        vec![
            WindowPhase::RegistrationOpen,
            WindowPhase::RegistrationOpen,
            WindowPhase::ExecutionLocked,
            WindowPhase::ExecutionLocked,
            WindowPhase::ExecutionOpen,
            WindowPhase::ExecutionOpen,
            WindowPhase::ExecutionOpen,
            WindowPhase::Expired,
        ]
    );
}
