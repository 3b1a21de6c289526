//! Per-employee, per-leave-type, per-year balance ledger.
//!
//! Each [`BalanceAccount`] sits behind its own mutex, so mutations on one
//! account are serialized while independent accounts never contend. Every
//! mutation is applied to a copy of the account and written back only when
//! all of its steps succeed.

mod statement;

#[cfg(test)]
mod ledger_props;

pub use statement::{BalanceLine, BalanceStatement};

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::models::{Availability, BalanceAccount, BalanceKey};

/// A single ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "days", rename_all = "snake_case")]
pub enum LedgerOp {
    /// Hold days for a request awaiting a decision.
    Reserve(Decimal),
    /// Move days from reserved to consumed.
    Commit(Decimal),
    /// Return reserved days.
    Release(Decimal),
    /// Return consumed days.
    Refund(Decimal),
}

impl LedgerOp {
    /// Returns the operation name.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerOp::Reserve(_) => "reserve",
            LedgerOp::Commit(_) => "commit",
            LedgerOp::Release(_) => "release",
            LedgerOp::Refund(_) => "refund",
        }
    }

    fn days(&self) -> Decimal {
        match self {
            LedgerOp::Reserve(days)
            | LedgerOp::Commit(days)
            | LedgerOp::Release(days)
            | LedgerOp::Refund(days) => *days,
        }
    }

    /// Applies the operation to an account, leaving it untouched on error.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::ledger::LedgerOp;
    /// use leave_engine::models::{BalanceAccount, BalanceKey, LeaveType};
    /// use rust_decimal::Decimal;
    ///
    /// let key = BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2025);
    /// let mut account = BalanceAccount::open(key, Decimal::new(21, 0), true);
    ///
    /// LedgerOp::Reserve(Decimal::new(5, 0)).apply_to(&mut account).unwrap();
    /// LedgerOp::Commit(Decimal::new(5, 0)).apply_to(&mut account).unwrap();
    /// assert_eq!(account.consumed, Decimal::new(5, 0));
    /// assert_eq!(account.reserved, Decimal::ZERO);
    /// ```
    pub fn apply_to(&self, account: &mut BalanceAccount) -> EngineResult<()> {
        let days = self.days();
        if days < Decimal::ZERO {
            return Err(EngineError::validation(
                "days",
                format!("cannot {} a negative number of days", self.name()),
            ));
        }

        match self {
            LedgerOp::Reserve(_) => {
                if let Availability::Limited(available) = account.availability() {
                    if days > available {
                        return Err(EngineError::InsufficientBalance {
                            leave_type: account.key.leave_type.to_string(),
                            requested: days,
                            available,
                        });
                    }
                }
                account.reserved += days;
            }
            LedgerOp::Commit(_) => {
                take(&mut account.reserved, days, "reserved")?;
                account.consumed += days;
            }
            LedgerOp::Release(_) => take(&mut account.reserved, days, "reserved")?,
            LedgerOp::Refund(_) => take(&mut account.consumed, days, "consumed")?,
        }
        Ok(())
    }
}

fn take(bucket: &mut Decimal, days: Decimal, name: &'static str) -> EngineResult<()> {
    if days > *bucket {
        return Err(EngineError::LedgerUnderflow {
            bucket: name,
            requested: days,
            held: *bucket,
        });
    }
    *bucket -= days;
    Ok(())
}

/// The balance ledger.
///
/// # Example
///
/// ```
/// use leave_engine::ledger::BalanceLedger;
/// use leave_engine::models::{BalanceKey, LeaveType};
/// use rust_decimal::Decimal;
///
/// let ledger = BalanceLedger::new();
/// let key = BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2025);
/// ledger.ensure_account(&key, Decimal::new(21, 0), true);
///
/// ledger.reserve(&key, Decimal::new(5, 0)).unwrap();
/// assert_eq!(ledger.available(&key).unwrap().days(), Some(Decimal::new(16, 0)));
/// ```
#[derive(Debug, Default)]
pub struct BalanceLedger {
    accounts: RwLock<HashMap<BalanceKey, Arc<Mutex<BalanceAccount>>>>,
}

impl BalanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the account if missing; otherwise raises its entitlement to
    /// `entitlement` when that is higher. Returns a snapshot of the account.
    pub fn ensure_account(
        &self,
        key: &BalanceKey,
        entitlement: Decimal,
        capped: bool,
    ) -> BalanceAccount {
        if let Some(handle) = self.handle(key) {
            let mut account = handle.lock();
            if entitlement > account.entitlement {
                tracing::debug!(
                    account = %key,
                    from = %account.entitlement,
                    to = %entitlement,
                    "entitlement raised"
                );
                account.entitlement = entitlement;
            }
            return account.clone();
        }

        let mut accounts = self.accounts.write();
        let handle = accounts
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::debug!(account = %key, %entitlement, capped, "account opened");
                Arc::new(Mutex::new(BalanceAccount::open(key.clone(), entitlement, capped)))
            })
            .clone();
        drop(accounts);

        let mut account = handle.lock();
        if entitlement > account.entitlement {
            account.entitlement = entitlement;
        }
        account.clone()
    }

    /// Returns a snapshot of an account.
    pub fn account(&self, key: &BalanceKey) -> Option<BalanceAccount> {
        self.handle(key).map(|handle| handle.lock().clone())
    }

    /// Returns what an account still allows.
    pub fn available(&self, key: &BalanceKey) -> EngineResult<Availability> {
        Ok(self.existing(key)?.lock().availability())
    }

    /// Reserves days, failing with `InsufficientBalance` past the cap.
    pub fn reserve(&self, key: &BalanceKey, days: Decimal) -> EngineResult<BalanceAccount> {
        self.apply(key, &[LedgerOp::Reserve(days)])
    }

    /// Moves days from reserved to consumed.
    pub fn commit(&self, key: &BalanceKey, days: Decimal) -> EngineResult<BalanceAccount> {
        self.apply(key, &[LedgerOp::Commit(days)])
    }

    /// Returns reserved days to the balance.
    pub fn release(&self, key: &BalanceKey, days: Decimal) -> EngineResult<BalanceAccount> {
        self.apply(key, &[LedgerOp::Release(days)])
    }

    /// Returns consumed days to the balance.
    pub fn refund(&self, key: &BalanceKey, days: Decimal) -> EngineResult<BalanceAccount> {
        self.apply(key, &[LedgerOp::Refund(days)])
    }

    /// Applies a sequence of operations to one account as a single step.
    ///
    /// The account lock is held throughout; the operations run against a
    /// copy that replaces the account only if every one succeeds.
    pub fn apply(&self, key: &BalanceKey, ops: &[LedgerOp]) -> EngineResult<BalanceAccount> {
        let handle = self.existing(key)?;
        let mut account = handle.lock();

        let mut next = account.clone();
        for op in ops {
            if let Err(error) = op.apply_to(&mut next) {
                tracing::warn!(account = %key, op = op.name(), %error, "ledger operation rejected");
                return Err(error);
            }
        }
        *account = next;

        tracing::info!(
            account = %key,
            ops = ?ops,
            reserved = %account.reserved,
            consumed = %account.consumed,
            "ledger updated"
        );
        Ok(account.clone())
    }

    /// Returns every account an employee holds for a year.
    pub fn statement(&self, employee_id: &str, year: i32) -> BalanceStatement {
        let handles: Vec<_> = self
            .accounts
            .read()
            .iter()
            .filter(|(key, _)| key.employee_id == employee_id && key.year == year)
            .map(|(_, handle)| handle.clone())
            .collect();

        let mut lines: Vec<BalanceLine> = handles
            .iter()
            .map(|handle| BalanceLine::from(&*handle.lock()))
            .collect();
        lines.sort_by_key(|line| line.leave_type);

        BalanceStatement {
            employee_id: employee_id.to_string(),
            year,
            lines,
        }
    }

    fn handle(&self, key: &BalanceKey) -> Option<Arc<Mutex<BalanceAccount>>> {
        self.accounts.read().get(key).cloned()
    }

    fn existing(&self, key: &BalanceKey) -> EngineResult<Arc<Mutex<BalanceAccount>>> {
        self.handle(key).ok_or_else(|| EngineError::NotFound {
            entity: "balance account",
            id: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveType;
    use std::str::FromStr;
    use std::thread;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn annual_key() -> BalanceKey {
        BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2025)
    }

    fn ledger_with_annual(entitlement: &str) -> BalanceLedger {
        let ledger = BalanceLedger::new();
        ledger.ensure_account(&annual_key(), dec(entitlement), true);
        ledger
    }

    #[test]
    fn test_reserve_then_release_restores_account() {
        let ledger = ledger_with_annual("21");
        let before = ledger.account(&annual_key()).unwrap();

        ledger.reserve(&annual_key(), dec("5")).unwrap();
        ledger.release(&annual_key(), dec("5")).unwrap();

        assert_eq!(ledger.account(&annual_key()).unwrap(), before);
    }

    #[test]
    fn test_reserve_then_commit_moves_days() {
        let ledger = ledger_with_annual("21");

        ledger.reserve(&annual_key(), dec("5")).unwrap();
        let account = ledger.commit(&annual_key(), dec("5")).unwrap();

        assert_eq!(account.reserved, Decimal::ZERO);
        assert_eq!(account.consumed, dec("5"));
        assert_eq!(account.availability(), Availability::Limited(dec("16")));
    }

    #[test]
    fn test_reserve_past_cap_is_insufficient_balance() {
        let ledger = ledger_with_annual("21");
        ledger.reserve(&annual_key(), dec("20")).unwrap();

        match ledger.reserve(&annual_key(), dec("2")) {
            Err(EngineError::InsufficientBalance {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, dec("2"));
                assert_eq!(available, dec("1"));
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(ledger.account(&annual_key()).unwrap().reserved, dec("20"));
    }

    #[test]
    fn test_uncapped_account_accepts_any_reservation() {
        let ledger = BalanceLedger::new();
        let key = BalanceKey::new("emp_001", LeaveType::MaternityLeave, 2025);
        ledger.ensure_account(&key, dec("90"), false);

        ledger.reserve(&key, dec("120")).unwrap();
        assert_eq!(ledger.available(&key).unwrap(), Availability::Unbounded);
    }

    #[test]
    fn test_underflow_rejected() {
        let ledger = ledger_with_annual("21");
        ledger.reserve(&annual_key(), dec("2")).unwrap();

        assert!(matches!(
            ledger.commit(&annual_key(), dec("3")),
            Err(EngineError::LedgerUnderflow { bucket: "reserved", .. })
        ));
        assert!(matches!(
            ledger.refund(&annual_key(), dec("1")),
            Err(EngineError::LedgerUnderflow { bucket: "consumed", .. })
        ));
    }

    #[test]
    fn test_failed_sequence_leaves_account_unchanged() {
        let ledger = ledger_with_annual("21");
        ledger.reserve(&annual_key(), dec("18")).unwrap();
        let before = ledger.account(&annual_key()).unwrap();

        // The reserve fits, the second one does not
        let result = ledger.apply(
            &annual_key(),
            &[LedgerOp::Reserve(dec("2")), LedgerOp::Reserve(dec("2"))],
        );

        assert!(result.is_err());
        assert_eq!(ledger.account(&annual_key()).unwrap(), before);
    }

    #[test]
    fn test_negative_days_rejected() {
        let ledger = ledger_with_annual("21");
        assert!(matches!(
            ledger.reserve(&annual_key(), dec("-1")),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_missing_account_is_not_found() {
        let ledger = BalanceLedger::new();
        assert!(matches!(
            ledger.available(&annual_key()),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_ensure_account_only_raises_entitlement() {
        let ledger = ledger_with_annual("10.5");
        assert_eq!(ledger.ensure_account(&annual_key(), dec("21"), true).entitlement, dec("21"));
        assert_eq!(ledger.ensure_account(&annual_key(), dec("7"), true).entitlement, dec("21"));
    }

    #[test]
    fn test_concurrent_reservations_never_exceed_cap() {
        let ledger = Arc::new(ledger_with_annual("21"));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || ledger.reserve(&annual_key(), dec("3")).is_ok())
            })
            .collect();
        let granted = workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(granted, 7);
        assert_eq!(ledger.account(&annual_key()).unwrap().reserved, dec("21"));
    }

    #[test]
    fn test_statement_lists_employee_accounts_for_year() {
        let ledger = BalanceLedger::new();
        ledger.ensure_account(&BalanceKey::new("emp_001", LeaveType::SickLeave, 2025), dec("14"), true);
        ledger.ensure_account(&annual_key(), dec("21"), true);
        ledger.ensure_account(&BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2024), dec("21"), true);
        ledger.ensure_account(&BalanceKey::new("emp_002", LeaveType::AnnualLeave, 2025), dec("21"), true);

        let statement = ledger.statement("emp_001", 2025);
        assert_eq!(statement.lines.len(), 2);
        assert_eq!(statement.lines[0].leave_type, LeaveType::AnnualLeave);
        assert_eq!(statement.lines[1].leave_type, LeaveType::SickLeave);
    }
}
