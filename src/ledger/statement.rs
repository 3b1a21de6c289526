//! Balance statements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Availability, BalanceAccount, LeaveType};

/// One account line on a balance statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// The leave type of the account.
    pub leave_type: LeaveType,
    /// Days entitled.
    pub entitlement: Decimal,
    /// Days held by requests awaiting a decision.
    pub reserved: Decimal,
    /// Days deducted by approved requests.
    pub consumed: Decimal,
    /// What the account still allows.
    pub available: Availability,
}

impl From<&BalanceAccount> for BalanceLine {
    fn from(account: &BalanceAccount) -> Self {
        Self {
            leave_type: account.key.leave_type,
            entitlement: account.entitlement,
            reserved: account.reserved,
            consumed: account.consumed,
            available: account.availability(),
        }
    }
}

/// Every account an employee holds for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceStatement {
    /// The employee.
    pub employee_id: String,
    /// The ledger year.
    pub year: i32,
    /// Account lines ordered by leave type.
    pub lines: Vec<BalanceLine>,
}

impl BalanceStatement {
    /// Returns the line for a leave type, if the employee holds that account.
    pub fn line(&self, leave_type: LeaveType) -> Option<&BalanceLine> {
        self.lines.iter().find(|line| line.leave_type == leave_type)
    }
}
