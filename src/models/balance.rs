//! Leave balance account model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LeaveType;

/// Identifies one balance account: (employee, leave type, year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The employee holding the account.
    pub employee_id: String,
    /// The leave type the account tracks.
    pub leave_type: LeaveType,
    /// The ledger year.
    pub year: i32,
}

impl BalanceKey {
    /// Creates a new balance key.
    pub fn new(employee_id: impl Into<String>, leave_type: LeaveType, year: i32) -> Self {
        Self {
            employee_id: employee_id.into(),
            leave_type,
            year,
        }
    }
}

impl std::fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.employee_id, self.leave_type, self.year)
    }
}

/// A per-employee, per-leave-type, per-year account of leave days.
///
/// For capped accounts `reserved + consumed <= entitlement` holds after every
/// ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAccount {
    /// The account key.
    pub key: BalanceKey,
    /// Days the employee is entitled to.
    pub entitlement: Decimal,
    /// Days held by requests awaiting a decision.
    pub reserved: Decimal,
    /// Days deducted by approved requests.
    pub consumed: Decimal,
    /// Whether the entitlement caps reservations.
    pub capped: bool,
}

impl BalanceAccount {
    /// Opens an empty account.
    pub fn open(key: BalanceKey, entitlement: Decimal, capped: bool) -> Self {
        Self {
            key,
            entitlement,
            reserved: Decimal::ZERO,
            consumed: Decimal::ZERO,
            capped,
        }
    }

    /// Returns what the account still allows.
    pub fn availability(&self) -> Availability {
        if self.capped {
            Availability::Limited(self.entitlement - self.reserved - self.consumed)
        } else {
            Availability::Unbounded
        }
    }
}

/// The result of an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Availability {
    /// A capped balance with this many days left.
    Limited(Decimal),
    /// The leave type is eligibility-gated, not balance-gated.
    Unbounded,
}

impl Availability {
    /// Returns the remaining days, or `None` when unbounded.
    pub fn days(&self) -> Option<Decimal> {
        match self {
            Availability::Limited(days) => Some(*days),
            Availability::Unbounded => None,
        }
    }
}
