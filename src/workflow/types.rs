//! Workflow input and output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entitlement::ValidationOutcome;
use crate::models::{LeaveRequest, LeaveType};

/// An approver's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve the request.
    Approve,
    /// Reject the request.
    Reject,
}

impl Decision {
    /// Returns the string representation of the decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

/// What an employee asks for when submitting leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// The requesting employee.
    pub employee_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Reason for the request.
    #[serde(default)]
    pub reason: String,
}

/// A successful submission: the pending request and the validation that
/// admitted it, including any advisory findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The newly pending request.
    pub request: LeaveRequest,
    /// The entitlement validation outcome.
    pub validation: ValidationOutcome,
}
