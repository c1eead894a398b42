use crate::{FundLedger, Pool};
use gashedge_types::Wei;
use proptest::prelude::*;

#[test]
fn test_snapshot_serde_round_trip() {
    let mut ledger = FundLedger::with_balance(Wei::from_eth(4));
    ledger.lock(Wei::from_milli_eth(1010), Pool::Payment).unwrap();
    ledger.lock(Wei::from_eth(1), Pool::Collateral).unwrap();

    let snap = ledger.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back = serde_json::from_str(&json).unwrap();
    assert_eq!(snap, back);

    let mut restored = FundLedger::new();
    restored.restore(&back);
    assert_eq!(restored, ledger);
}

/// One ledger operation, for property testing over random sequences
#[derive(Debug, Clone)]
enum Op {
    Deposit(u64),
    Withdraw(u64),
    Lock(u64, Pool),
    Unlock(u64, Pool),
}

fn arb_pool() -> impl Strategy<Value = Pool> {
    prop_oneof![Just(Pool::Payment), Just(Pool::Collateral)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..=1_000_000).prop_map(Op::Deposit),
        (0u64..=1_000_000).prop_map(Op::Withdraw),
        ((0u64..=1_000_000), arb_pool()).prop_map(|(n, p)| Op::Lock(n, p)),
        ((0u64..=1_000_000), arb_pool()).prop_map(|(n, p)| Op::Unlock(n, p)),
    ]
}

proptest! {
    /// Locked pools never exceed the balance, no matter which operations
    /// succeed or fail along the way.
    #[test]
    fn conservation_holds_over_any_sequence(ops in proptest::collection::vec(arb_op(), 0..64)) {
        let mut ledger = FundLedger::new();
        for op in ops {
            // Failures are expected along the way; the invariant must
            // hold whether or not each operation is accepted.
            let _ = match op {
                Op::Deposit(n) => ledger.deposit(Wei::from_wei(n as u128)),
                Op::Withdraw(n) => ledger.withdraw(Wei::from_wei(n as u128)),
                Op::Lock(n, p) => ledger.lock(Wei::from_wei(n as u128), p),
                Op::Unlock(n, p) => ledger.unlock(Wei::from_wei(n as u128), p),
            };
            prop_assert!(ledger.locked_total() <= ledger.balance());
            let recombined = ledger.free().checked_add(ledger.locked_total()).unwrap();
            prop_assert_eq!(recombined, ledger.balance());
        }
    }
}
