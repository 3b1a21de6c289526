//! Validation findings and outcomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::LeaveType;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the request.
    Error,
    /// Advisory only.
    Warning,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    /// More days than the statutory maximum for the type.
    ExceedsMaximum,
    /// The employee's gender is not eligible for the type.
    GenderRestricted,
    /// Under the tenure requirement with no pro-rata accrual.
    TenureNotMet,
    /// More days than have accrued pro-rata so far.
    ExceedsAccrued,
    /// Less notice than the type requires.
    InsufficientNotice,
}

/// A single rule evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity of the finding.
    pub severity: Severity,
    /// Machine-readable code.
    pub code: FindingCode,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Creates an error-severity finding.
    pub fn error(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    /// Creates a warning-severity finding.
    pub fn warning(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Returns true for error-severity findings.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The outcome of validating a request against the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// The leave type validated.
    pub leave_type: LeaveType,
    /// Days requested.
    pub days_requested: u32,
    /// False iff any finding has error severity.
    pub compliant: bool,
    /// Every finding, errors first in evaluation order.
    pub findings: Vec<Finding>,
    /// Whether a medical certificate is required.
    pub certificate_required: bool,
    /// Days the employee is entitled to; `None` when the type has no cap.
    pub entitled_days: Option<Decimal>,
    /// Citation of the governing provision.
    pub citation: String,
}

impl ValidationOutcome {
    /// Returns the advisory findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    /// Returns the blocking findings.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    /// Converts a non-compliant outcome into an `EntitlementExceeded` error.
    pub fn into_result(self) -> Result<Self, EngineError> {
        if self.compliant {
            Ok(self)
        } else {
            Err(EngineError::EntitlementExceeded {
                leave_type: self.leave_type.to_string(),
                messages: self.errors().map(|f| f.message.clone()).collect(),
            })
        }
    }
}
