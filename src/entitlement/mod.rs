//! Statutory leave entitlement rules.
//!
//! [`EntitlementRules`] evaluates a leave request against the configured rule
//! table: statutory maximum, gender eligibility, tenure with pro-rata
//! accrual, and notice. It is stateless; balances are the ledger's concern.

mod findings;
mod report;

pub use findings::{Finding, FindingCode, Severity, ValidationOutcome};
pub use report::{ComplianceReport, ComplianceViolation};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{GenderRestriction, LeaveRule, LeaveRulesConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeProfile, Gender, LeaveRequest, LeaveType};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// The leave rule table and its validator.
#[derive(Debug, Clone)]
pub struct EntitlementRules {
    config: LeaveRulesConfig,
}

impl EntitlementRules {
    /// Creates a validator over the given rule table.
    pub fn new(config: LeaveRulesConfig) -> Self {
        Self { config }
    }

    /// Returns the rule table and approval thresholds.
    pub fn config(&self) -> &LeaveRulesConfig {
        &self.config
    }

    /// Returns the rule for a leave type.
    pub fn rule(&self, leave_type: LeaveType) -> EngineResult<&LeaveRule> {
        self.config
            .rules
            .get(&leave_type)
            .ok_or_else(|| EngineError::NotFound {
                entity: "leave rule",
                id: leave_type.to_string(),
            })
    }

    /// Returns the days an employee is entitled to on `as_of`.
    ///
    /// Below the tenure requirement, a pro-rata rule accrues
    /// `max_days / 12` per completed month; without pro-rata the entitlement
    /// is zero. `None` means the type has no statutory cap.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::config::PolicyConfig;
    /// use leave_engine::entitlement::EntitlementRules;
    /// use leave_engine::models::{EmployeeProfile, LeaveType, ShiftAssignment};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let rules = EntitlementRules::new(PolicyConfig::default().leave_rules().clone());
    /// let employee = EmployeeProfile {
    ///     id: "emp_001".to_string(),
    ///     hire_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     gender: None,
    ///     shift: ShiftAssignment::None,
    ///     location: "head_office".to_string(),
    /// };
    /// let as_of = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    ///
    /// // Six months of service accrue half the annual entitlement
    /// assert_eq!(
    ///     rules.entitlement_for(LeaveType::AnnualLeave, &employee, as_of).unwrap(),
    ///     Some(Decimal::new(105, 1))
    /// );
    /// ```
    pub fn entitlement_for(
        &self,
        leave_type: LeaveType,
        employee: &EmployeeProfile,
        as_of: NaiveDate,
    ) -> EngineResult<Option<Decimal>> {
        let rule = self.rule(leave_type)?;
        Ok(rule.max_days.map(|max| accrued(rule, max, employee.months_of_service(as_of))))
    }

    /// Validates a request against the rule table.
    ///
    /// The outcome is non-compliant iff any finding has error severity;
    /// insufficient notice is only a warning.
    pub fn validate(
        &self,
        leave_type: LeaveType,
        employee: &EmployeeProfile,
        days_requested: u32,
        start_date: NaiveDate,
        request_date: NaiveDate,
    ) -> EngineResult<ValidationOutcome> {
        let rule = self.rule(leave_type)?;
        let requested = Decimal::from(days_requested);
        let months = employee.months_of_service(request_date);
        let mut findings = Vec::new();

        let entitled_days = rule.max_days.map(|max| accrued(rule, max, months));

        if let Some(max) = rule.max_days {
            if requested > max {
                findings.push(Finding::error(
                    FindingCode::ExceedsMaximum,
                    format!(
                        "Requested {} days exceeds the statutory maximum of {} days {} for {} ({})",
                        days_requested,
                        max,
                        rule.period.as_phrase(),
                        leave_type.display_name(),
                        rule.citation
                    ),
                ));
            } else if months < rule.min_tenure_months {
                if !rule.pro_rata_before_tenure {
                    findings.push(Finding::error(
                        FindingCode::TenureNotMet,
                        format!(
                            "{} requires {} months of service; employee has {}",
                            leave_type.display_name(),
                            rule.min_tenure_months,
                            months
                        ),
                    ));
                } else if let Some(accrued) = entitled_days.filter(|a| requested > *a) {
                    findings.push(Finding::error(
                        FindingCode::ExceedsAccrued,
                        format!(
                            "Requested {} days exceeds the {} days accrued over {} months of service",
                            days_requested, accrued, months
                        ),
                    ));
                }
            }
        }

        if let Some(gender) = employee.gender {
            let eligible = match rule.gender {
                GenderRestriction::None => true,
                GenderRestriction::FemaleOnly => gender == Gender::Female,
                GenderRestriction::MaleOnly => gender == Gender::Male,
            };
            if !eligible {
                findings.push(Finding::error(
                    FindingCode::GenderRestricted,
                    format!(
                        "{} is not available to this employee ({})",
                        leave_type.display_name(),
                        rule.citation
                    ),
                ));
            }
        }

        let notice = (start_date - request_date).num_days();
        if notice < i64::from(rule.notice_days) {
            findings.push(Finding::warning(
                FindingCode::InsufficientNotice,
                format!(
                    "{} requires {} days notice; {} given",
                    leave_type.display_name(),
                    rule.notice_days,
                    notice.max(0)
                ),
            ));
        }

        let certificate_required = rule.certificate_always
            || rule
                .certificate_after_days
                .is_some_and(|threshold| days_requested > threshold);

        let compliant = !findings.iter().any(Finding::is_error);
        if !compliant {
            tracing::debug!(
                employee_id = %employee.id,
                leave_type = %leave_type,
                days_requested,
                "request fails entitlement rules"
            );
        }

        Ok(ValidationOutcome {
            leave_type,
            days_requested,
            compliant,
            findings,
            certificate_required,
            entitled_days,
            citation: rule.citation.clone(),
        })
    }

    /// Evaluates a batch of requests and reports the non-compliant ones.
    ///
    /// Each request is validated as of its submission date, using its
    /// current total days.
    pub fn compliance_report<'a>(
        &self,
        requests: impl IntoIterator<Item = (&'a LeaveRequest, &'a EmployeeProfile)>,
    ) -> EngineResult<ComplianceReport> {
        let mut report = ComplianceReport::default();
        for (request, employee) in requests {
            let outcome = self.validate(
                request.leave_type,
                employee,
                request.total_days,
                request.start_date,
                request.submitted_at.date_naive(),
            )?;
            report.record(request, outcome);
        }
        Ok(report)
    }
}

fn accrued(rule: &LeaveRule, max: Decimal, months: u32) -> Decimal {
    if months >= rule.min_tenure_months {
        max
    } else if rule.pro_rata_before_tenure {
        (max * Decimal::from(months) / MONTHS_PER_YEAR).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::models::ShiftAssignment;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rules() -> EntitlementRules {
        EntitlementRules::new(PolicyConfig::default().leave_rules().clone())
    }

    fn employee(hired: &str, gender: Option<Gender>) -> EmployeeProfile {
        EmployeeProfile {
            id: "emp_001".to_string(),
            hire_date: make_date(hired),
            gender,
            shift: ShiftAssignment::None,
            location: "head_office".to_string(),
        }
    }

    #[test]
    fn test_annual_leave_over_cap_is_error_citing_cap() {
        let outcome = rules()
            .validate(
                LeaveType::AnnualLeave,
                &employee("2020-01-01", None),
                25,
                make_date("2025-03-03"),
                make_date("2025-02-01"),
            )
            .unwrap();

        assert!(!outcome.compliant);
        let error = outcome.errors().next().unwrap();
        assert_eq!(error.code, FindingCode::ExceedsMaximum);
        assert!(error.message.contains("21 days per year"));
        assert!(error.message.contains("Section 28"));
    }

    #[test]
    fn test_male_maternity_request_is_gender_error() {
        let outcome = rules()
            .validate(
                LeaveType::MaternityLeave,
                &employee("2020-01-01", Some(Gender::Male)),
                90,
                make_date("2025-04-01"),
                make_date("2025-02-01"),
            )
            .unwrap();

        assert!(!outcome.compliant);
        assert!(outcome.errors().any(|f| f.code == FindingCode::GenderRestricted));
    }

    #[test]
    fn test_maternity_cap_is_per_occurrence() {
        let outcome = rules()
            .validate(
                LeaveType::MaternityLeave,
                &employee("2020-01-01", Some(Gender::Female)),
                100,
                make_date("2025-04-01"),
                make_date("2025-02-01"),
            )
            .unwrap();

        let error = outcome.errors().next().unwrap();
        assert_eq!(error.code, FindingCode::ExceedsMaximum);
        assert!(error.message.contains("90 days per occurrence"));
    }

    #[test]
    fn test_female_maternity_request_with_notice_is_compliant() {
        let outcome = rules()
            .validate(
                LeaveType::MaternityLeave,
                &employee("2020-01-01", Some(Gender::Female)),
                90,
                make_date("2025-04-01"),
                make_date("2025-02-01"),
            )
            .unwrap();

        assert!(outcome.compliant);
        assert!(outcome.findings.is_empty());
        assert!(outcome.certificate_required);
    }

    #[test]
    fn test_unknown_gender_is_not_restricted() {
        let outcome = rules()
            .validate(
                LeaveType::PaternityLeave,
                &employee("2020-01-01", None),
                10,
                make_date("2025-03-01"),
                make_date("2025-02-01"),
            )
            .unwrap();
        assert!(outcome.compliant);
    }

    #[test]
    fn test_short_notice_is_only_a_warning() {
        let outcome = rules()
            .validate(
                LeaveType::AnnualLeave,
                &employee("2020-01-01", None),
                5,
                make_date("2025-02-10"),
                make_date("2025-02-01"),
            )
            .unwrap();

        assert!(outcome.compliant);
        let warning = outcome.warnings().next().unwrap();
        assert_eq!(warning.code, FindingCode::InsufficientNotice);
        assert_eq!(warning.severity, Severity::Warning);
    }

    #[test]
    fn test_sick_leave_certificate_threshold() {
        let rules = rules();
        let staff = employee("2020-01-01", None);
        let start = make_date("2025-02-03");

        let three = rules
            .validate(LeaveType::SickLeave, &staff, 3, start, start)
            .unwrap();
        let four = rules
            .validate(LeaveType::SickLeave, &staff, 4, start, start)
            .unwrap();

        assert!(!three.certificate_required);
        assert!(four.certificate_required);
        assert!(four.warnings().next().is_none());
    }

    #[test]
    fn test_pro_rata_accrual_under_tenure() {
        let rules = rules();
        let staff = employee("2024-09-01", None);
        // Five completed months accrue 21 * 5 / 12 = 8.75 days
        assert_eq!(
            rules
                .entitlement_for(LeaveType::AnnualLeave, &staff, make_date("2025-02-01"))
                .unwrap(),
            Some(dec("8.75"))
        );

        let within = rules
            .validate(
                LeaveType::AnnualLeave,
                &staff,
                8,
                make_date("2025-03-03"),
                make_date("2025-02-01"),
            )
            .unwrap();
        assert!(within.compliant);

        let beyond = rules
            .validate(
                LeaveType::AnnualLeave,
                &staff,
                9,
                make_date("2025-03-03"),
                make_date("2025-02-01"),
            )
            .unwrap();
        assert!(!beyond.compliant);
        assert!(beyond.errors().any(|f| f.code == FindingCode::ExceedsAccrued));
    }

    #[test]
    fn test_full_entitlement_after_tenure() {
        let rules = rules();
        let staff = employee("2024-01-01", None);
        assert_eq!(
            rules
                .entitlement_for(LeaveType::AnnualLeave, &staff, make_date("2025-02-01"))
                .unwrap(),
            Some(dec("21"))
        );
    }

    #[test]
    fn test_unpaid_leave_has_no_cap() {
        let rules = rules();
        let staff = employee("2024-01-01", None);
        let outcome = rules
            .validate(
                LeaveType::UnpaidLeave,
                &staff,
                120,
                make_date("2025-06-02"),
                make_date("2025-02-01"),
            )
            .unwrap();
        assert!(outcome.compliant);
        assert_eq!(outcome.entitled_days, None);
    }

    #[test]
    fn test_into_result_carries_error_messages() {
        let outcome = rules()
            .validate(
                LeaveType::CompassionateLeave,
                &employee("2020-01-01", None),
                10,
                make_date("2025-02-03"),
                make_date("2025-02-03"),
            )
            .unwrap();

        match outcome.into_result() {
            Err(EngineError::EntitlementExceeded { leave_type, messages }) => {
                assert_eq!(leave_type, "compassionate_leave");
                assert_eq!(messages.len(), 1);
            }
            other => panic!("Expected EntitlementExceeded, got {:?}", other),
        }
    }
}
