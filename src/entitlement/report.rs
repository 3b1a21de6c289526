//! Batch compliance reporting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Finding, ValidationOutcome};
use crate::models::{LeaveRequest, LeaveType};

/// A request that fails the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceViolation {
    /// The request number.
    pub request_number: String,
    /// The requesting employee.
    pub employee_id: String,
    /// The leave type requested.
    pub leave_type: LeaveType,
    /// Days requested.
    pub requested_days: u32,
    /// Every finding for the request.
    pub findings: Vec<Finding>,
    /// Citation of the governing provision.
    pub citation: String,
}

/// Compliance summary over a batch of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Requests evaluated.
    pub total_requests: u32,
    /// Requests with advisory findings only.
    pub warning_count: u32,
    /// Non-compliant requests.
    pub violations: Vec<ComplianceViolation>,
}

impl ComplianceReport {
    pub(super) fn record(&mut self, request: &LeaveRequest, outcome: ValidationOutcome) {
        self.total_requests += 1;
        if outcome.compliant {
            if outcome.warnings().next().is_some() {
                self.warning_count += 1;
            }
            return;
        }
        self.violations.push(ComplianceViolation {
            request_number: request.number.clone(),
            employee_id: request.employee_id.clone(),
            leave_type: request.leave_type,
            requested_days: outcome.days_requested,
            findings: outcome.findings,
            citation: outcome.citation,
        });
    }

    /// Number of non-compliant requests.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Percentage of compliant requests; 100 for an empty batch.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::entitlement::ComplianceReport;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(ComplianceReport::default().compliance_rate(), Decimal::ONE_HUNDRED);
    /// ```
    pub fn compliance_rate(&self) -> Decimal {
        if self.total_requests == 0 {
            return Decimal::ONE_HUNDRED;
        }
        let compliant = self.total_requests as usize - self.violations.len();
        (Decimal::from(compliant) * Decimal::ONE_HUNDRED / Decimal::from(self.total_requests))
            .round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::entitlement::EntitlementRules;
    use crate::models::{EmployeeProfile, Gender, ShiftAssignment};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn request(number: &str, leave_type: LeaveType, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest::submitted(
            number,
            "emp_001",
            leave_type,
            make_date(start),
            make_date(end),
            0,
            "",
            false,
            Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_report_counts_violations_and_rate() {
        let rules = EntitlementRules::new(PolicyConfig::default().leave_rules().clone());
        let employee = EmployeeProfile {
            id: "emp_001".to_string(),
            hire_date: make_date("2020-01-01"),
            gender: Some(Gender::Male),
            shift: ShiftAssignment::Day,
            location: "dandora".to_string(),
        };
        let ok = request("LR20250001", LeaveType::AnnualLeave, "2025-03-03", "2025-03-07");
        let too_long = request("LR20250002", LeaveType::AnnualLeave, "2025-03-01", "2025-03-31");
        let maternity = request("LR20250003", LeaveType::MaternityLeave, "2025-03-01", "2025-03-10");
        let short_notice = request("LR20250004", LeaveType::AnnualLeave, "2025-01-06", "2025-01-07");

        let report = rules
            .compliance_report([
                (&ok, &employee),
                (&too_long, &employee),
                (&maternity, &employee),
                (&short_notice, &employee),
            ])
            .unwrap();

        assert_eq!(report.total_requests, 4);
        assert_eq!(report.violation_count(), 2);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.compliance_rate(), Decimal::new(50, 0));
        assert_eq!(report.violations[0].request_number, "LR20250002");
        assert_eq!(report.violations[0].requested_days, 31);
    }
}
