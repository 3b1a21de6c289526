//! Property-based tests for the balance ledger.
//!
//! - Capped accounts never hold more than their entitlement
//! - A rejected operation leaves the account untouched
//! - Reserve/release and reserve/commit/refund return to the starting state

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{BalanceLedger, LedgerOp};
use crate::models::{BalanceKey, LeaveType};

/// Strategy for whole or half day amounts (0 to 15 days).
fn days() -> impl Strategy<Value = Decimal> {
    (0i64..=30).prop_map(|halves| Decimal::new(halves * 5, 1))
}

fn arb_op() -> impl Strategy<Value = LedgerOp> {
    days().prop_flat_map(|d| {
        prop_oneof![
            Just(LedgerOp::Reserve(d)),
            Just(LedgerOp::Commit(d)),
            Just(LedgerOp::Release(d)),
            Just(LedgerOp::Refund(d)),
        ]
    })
}

fn open(entitlement: i64) -> (BalanceLedger, BalanceKey) {
    let ledger = BalanceLedger::new();
    let key = BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2025);
    ledger.ensure_account(&key, Decimal::from(entitlement), true);
    (ledger, key)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of operations, a capped account keeps
    /// `0 <= reserved`, `0 <= consumed` and `reserved + consumed <= entitlement`.
    #[test]
    fn prop_capped_account_never_overdrawn(
        entitlement in 0i64..=30,
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let (ledger, key) = open(entitlement);
        for op in ops {
            let _ = ledger.apply(&key, &[op]);
            let account = ledger.account(&key).unwrap();
            prop_assert!(account.reserved >= Decimal::ZERO);
            prop_assert!(account.consumed >= Decimal::ZERO);
            prop_assert!(account.reserved + account.consumed <= account.entitlement);
        }
    }

    /// *For any* operation that fails, the account is unchanged.
    #[test]
    fn prop_rejected_operation_changes_nothing(
        entitlement in 0i64..=30,
        setup in prop::collection::vec(arb_op(), 0..20),
        ops in prop::collection::vec(arb_op(), 1..4),
    ) {
        let (ledger, key) = open(entitlement);
        for op in setup {
            let _ = ledger.apply(&key, &[op]);
        }
        let before = ledger.account(&key).unwrap();
        if ledger.apply(&key, &ops).is_err() {
            prop_assert_eq!(ledger.account(&key).unwrap(), before);
        }
    }

    /// *For any* amount the account can hold, reserving then releasing it
    /// restores the account exactly.
    #[test]
    fn prop_reserve_release_restores(entitlement in 0i64..=30, amount in days()) {
        let (ledger, key) = open(entitlement);
        let before = ledger.account(&key).unwrap();
        prop_assume!(amount <= before.entitlement);

        ledger.reserve(&key, amount).unwrap();
        ledger.release(&key, amount).unwrap();
        prop_assert_eq!(ledger.account(&key).unwrap(), before);
    }

    /// *For any* amount the account can hold, reserve then commit moves it
    /// into consumed, and a refund brings the account back.
    #[test]
    fn prop_commit_then_refund_restores(entitlement in 0i64..=30, amount in days()) {
        let (ledger, key) = open(entitlement);
        let before = ledger.account(&key).unwrap();
        prop_assume!(amount <= before.entitlement);

        ledger.reserve(&key, amount).unwrap();
        let committed = ledger.commit(&key, amount).unwrap();
        prop_assert_eq!(committed.reserved, before.reserved);
        prop_assert_eq!(committed.consumed, before.consumed + amount);

        ledger.refund(&key, amount).unwrap();
        prop_assert_eq!(ledger.account(&key).unwrap(), before);
    }
}
