//! Leave request approval workflow.
//!
//! [`LeaveWorkflow`] is the state machine that moves a [`LeaveRequest`]
//! through submission, supervisor and HR decisions, cancellation, extension
//! and early return, driving the matching [`BalanceLedger`] mutation at each
//! step.
//!
//! Each transition performs its ledger mutation first, as one atomic ledger
//! step, and only then updates the request. A failed mutation therefore
//! leaves both the account and the request exactly as they were.
//!
//! ```text
//! submit ──► pending ──approve──► approved ──cancel──► cancelled
//!               │   └─approve (HR needed)─► pending_hr ──approve──► approved
//!               │                              │
//!               └──reject──► rejected ◄──reject┘
//! ```

mod types;

pub use types::{Decision, LeaveApplication, Submission};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::calendar::HolidayCalendar;
use crate::config::ApprovalPolicy;
use crate::entitlement::EntitlementRules;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{BalanceLedger, LedgerOp};
use crate::models::{
    BalanceKey, EmployeeProfile, LeaveRequest, LeaveStatus, LeaveType, WorkflowAction, add_days,
    calendar_days,
};

/// The leave approval state machine.
#[derive(Debug, Clone)]
pub struct LeaveWorkflow {
    rules: EntitlementRules,
    approval: ApprovalPolicy,
    calendar: Arc<HolidayCalendar>,
    ledger: Arc<BalanceLedger>,
}

impl LeaveWorkflow {
    /// Creates a workflow over the given rules, calendar and ledger.
    pub fn new(
        rules: EntitlementRules,
        calendar: Arc<HolidayCalendar>,
        ledger: Arc<BalanceLedger>,
    ) -> Self {
        let approval = rules.config().approval.clone();
        Self {
            rules,
            approval,
            calendar,
            ledger,
        }
    }

    /// Returns the entitlement rules in force.
    pub fn rules(&self) -> &EntitlementRules {
        &self.rules
    }

    /// Returns the ledger driven by this workflow.
    pub fn ledger(&self) -> &Arc<BalanceLedger> {
        &self.ledger
    }

    /// Returns the ledger key a request is charged to.
    pub fn balance_key(request: &LeaveRequest) -> BalanceKey {
        BalanceKey::new(request.employee_id.clone(), request.leave_type, request.ledger_year)
    }

    /// Returns true when a supervisor approval must be followed by HR.
    ///
    /// HR approval is needed for the configured leave types (maternity and
    /// paternity by default), for sick leave above the sick threshold, and
    /// for any request above the general threshold.
    pub fn requires_hr_approval(&self, request: &LeaveRequest) -> bool {
        self.approval.hr_required_types.contains(&request.leave_type)
            || (request.leave_type == LeaveType::SickLeave
                && request.total_days > self.approval.sick_hr_threshold_days)
            || request.total_days > self.approval.general_hr_threshold_days
    }

    /// Opens (or raises) the employee's account for a leave type and year,
    /// with the entitlement accrued as of `as_of`.
    pub fn ensure_account(
        &self,
        employee: &EmployeeProfile,
        leave_type: LeaveType,
        year: i32,
        as_of: NaiveDate,
    ) -> EngineResult<BalanceKey> {
        let rule = self.rules.rule(leave_type)?;
        let entitlement = self
            .rules
            .entitlement_for(leave_type, employee, as_of)?
            .unwrap_or(Decimal::ZERO);
        let key = BalanceKey::new(employee.id.clone(), leave_type, year);
        self.ledger
            .ensure_account(&key, entitlement, rule.balance_capped);
        Ok(key)
    }

    /// Validates and submits an application, reserving its days.
    ///
    /// `number` is called for the ledger year only once the reservation has
    /// succeeded, so a failed submission never consumes a request number.
    pub fn submit(
        &self,
        application: &LeaveApplication,
        employee: &EmployeeProfile,
        request_date: NaiveDate,
        at: DateTime<Utc>,
        number: impl FnOnce(i32) -> String,
    ) -> EngineResult<Submission> {
        if application.end_date < application.start_date {
            return Err(EngineError::validation(
                "end_date",
                "end date must not be before start date",
            ));
        }

        let total_days = calendar_days(application.start_date, application.end_date);
        let validation = self
            .rules
            .validate(
                application.leave_type,
                employee,
                total_days,
                application.start_date,
                request_date,
            )?
            .into_result()
            .inspect_err(|error| {
                tracing::warn!(
                    employee_id = %employee.id,
                    leave_type = %application.leave_type,
                    %error,
                    "leave submission rejected"
                );
            })?;

        let year = application.start_date.year();
        let key = self.ensure_account(employee, application.leave_type, year, request_date)?;
        self.ledger.reserve(&key, Decimal::from(total_days))?;

        let working_days = self.calendar.working_day_count_at(
            application.start_date,
            application.end_date,
            &employee.location,
        );
        let request = LeaveRequest::submitted(
            number(year),
            employee.id.clone(),
            application.leave_type,
            application.start_date,
            application.end_date,
            working_days,
            application.reason.clone(),
            validation.certificate_required,
            at,
        );

        tracing::info!(
            request = %request.number,
            employee_id = %request.employee_id,
            leave_type = %request.leave_type,
            total_days = request.total_days,
            working_days = request.working_days,
            warnings = validation.warnings().count(),
            "leave request submitted"
        );
        Ok(Submission {
            request,
            validation,
        })
    }

    /// Applies the supervisor's decision to a pending request.
    ///
    /// Rejection releases the reservation. Approval either escalates to HR,
    /// leaving the reservation in place, or commits it.
    pub fn supervisor_decision(
        &self,
        request: &mut LeaveRequest,
        decision: Decision,
        actor: &str,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<LeaveStatus> {
        if request.status != LeaveStatus::Pending {
            return Err(EngineError::invalid_transition(
                "record supervisor decision",
                request.status,
            ));
        }

        let key = Self::balance_key(request);
        let days = Decimal::from(request.total_days);
        let (status, action) = match decision {
            Decision::Reject => {
                self.ledger.release(&key, days)?;
                (LeaveStatus::Rejected, WorkflowAction::SupervisorRejected)
            }
            Decision::Approve if self.requires_hr_approval(request) => {
                (LeaveStatus::PendingHr, WorkflowAction::EscalatedToHr)
            }
            Decision::Approve => {
                self.ledger.commit(&key, days)?;
                (LeaveStatus::Approved, WorkflowAction::SupervisorApproved)
            }
        };

        self.transition(request, status, action, actor, note, at);
        Ok(status)
    }

    /// Applies HR's decision to a request awaiting HR.
    pub fn hr_decision(
        &self,
        request: &mut LeaveRequest,
        decision: Decision,
        actor: &str,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<LeaveStatus> {
        if request.status != LeaveStatus::PendingHr {
            return Err(EngineError::invalid_transition(
                "record HR decision",
                request.status,
            ));
        }

        let key = Self::balance_key(request);
        let days = Decimal::from(request.total_days);
        let (status, action) = match decision {
            Decision::Reject => {
                self.ledger.release(&key, days)?;
                (LeaveStatus::Rejected, WorkflowAction::HrRejected)
            }
            Decision::Approve => {
                self.ledger.commit(&key, days)?;
                (LeaveStatus::Approved, WorkflowAction::HrApproved)
            }
        };

        self.transition(request, status, action, actor, note, at);
        Ok(status)
    }

    /// Cancels a pending or approved request.
    ///
    /// A pending request releases its reservation; an approved one refunds
    /// the days it still has charged.
    pub fn cancel(
        &self,
        request: &mut LeaveRequest,
        actor: &str,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        let key = Self::balance_key(request);
        match request.status {
            LeaveStatus::Pending | LeaveStatus::PendingHr => {
                self.ledger
                    .release(&key, Decimal::from(request.total_days))?;
            }
            LeaveStatus::Approved => {
                self.ledger.refund(&key, self.charged_days(request)?)?;
            }
            LeaveStatus::Rejected | LeaveStatus::Cancelled => {
                return Err(EngineError::invalid_transition("cancel", request.status));
            }
        }

        self.transition(
            request,
            LeaveStatus::Cancelled,
            WorkflowAction::Cancelled,
            actor,
            reason,
            at,
        );
        Ok(())
    }

    /// Extends an approved request by `additional_days` calendar days.
    ///
    /// The new total is re-validated against the rule table and the extra
    /// days are reserved and committed as one ledger step.
    pub fn extend(
        &self,
        request: &mut LeaveRequest,
        employee: &EmployeeProfile,
        additional_days: u32,
        actor: &str,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        if request.status != LeaveStatus::Approved {
            return Err(EngineError::invalid_transition("extend", request.status));
        }
        if request.actual_end_date.is_some() {
            return Err(EngineError::invalid_transition("extend", "returned early"));
        }
        if additional_days == 0 {
            return Err(EngineError::validation(
                "additional_days",
                "extension must add at least one day",
            ));
        }

        let new_total = request.total_days + additional_days;
        self.rules
            .validate(
                request.leave_type,
                employee,
                new_total,
                request.start_date,
                request.submitted_at.date_naive(),
            )?
            .into_result()?;

        let delta = Decimal::from(additional_days);
        self.ledger.apply(
            &Self::balance_key(request),
            &[LedgerOp::Reserve(delta), LedgerOp::Commit(delta)],
        )?;

        let new_end = add_days(request.end_date, additional_days);
        request.end_date = new_end;
        request.total_days = calendar_days(request.start_date, new_end);
        request.working_days =
            self.calendar
                .working_day_count_at(request.start_date, new_end, &employee.location);
        request.record(WorkflowAction::Extended, actor, at, reason);

        tracing::info!(
            request = %request.number,
            additional_days,
            total_days = request.total_days,
            end_date = %request.end_date,
            "leave request extended"
        );
        Ok(())
    }

    /// Records an early return on an approved request.
    ///
    /// For balance-capped types the unused days are refunded.
    pub fn return_early(
        &self,
        request: &mut LeaveRequest,
        actual_end_date: NaiveDate,
        actor: &str,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        if request.status != LeaveStatus::Approved {
            return Err(EngineError::invalid_transition("return early", request.status));
        }
        if actual_end_date >= request.effective_end_date() {
            return Err(EngineError::validation(
                "actual_end_date",
                format!(
                    "must be before the current end date {}",
                    request.effective_end_date()
                ),
            ));
        }
        if actual_end_date < request.start_date {
            return Err(EngineError::validation(
                "actual_end_date",
                "must not be before the start date",
            ));
        }

        let actual_days = calendar_days(request.start_date, actual_end_date);
        let mut refunded = Decimal::ZERO;
        if self.rules.rule(request.leave_type)?.balance_capped {
            refunded = self.charged_days(request)? - Decimal::from(actual_days);
            self.ledger.refund(&Self::balance_key(request), refunded)?;
        }

        request.actual_end_date = Some(actual_end_date);
        request.actual_days_taken = Some(actual_days);
        request.record(WorkflowAction::ReturnedEarly, actor, at, reason);

        tracing::info!(
            request = %request.number,
            actual_end_date = %actual_end_date,
            actual_days,
            %refunded,
            "early return recorded"
        );
        Ok(())
    }

    /// Days an approved request currently has consumed on its account.
    fn charged_days(&self, request: &LeaveRequest) -> EngineResult<Decimal> {
        let capped = self.rules.rule(request.leave_type)?.balance_capped;
        let days = match request.actual_days_taken {
            Some(actual) if capped => actual,
            _ => request.total_days,
        };
        Ok(Decimal::from(days))
    }

    fn transition(
        &self,
        request: &mut LeaveRequest,
        status: LeaveStatus,
        action: WorkflowAction,
        actor: &str,
        note: Option<String>,
        at: DateTime<Utc>,
    ) {
        let from = request.status;
        request.status = status;
        request.record(action, actor, at, note);
        tracing::info!(
            request = %request.number,
            actor,
            %from,
            to = %status,
            "leave request transitioned"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::models::{Availability, Gender, ShiftAssignment};
    use chrono::TimeZone;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
    }

    fn workflow() -> LeaveWorkflow {
        let config = PolicyConfig::default();
        LeaveWorkflow::new(
            EntitlementRules::new(config.leave_rules().clone()),
            Arc::new(HolidayCalendar::default()),
            Arc::new(BalanceLedger::new()),
        )
    }

    fn employee(gender: Gender) -> EmployeeProfile {
        EmployeeProfile {
            id: "emp_001".to_string(),
            hire_date: make_date("2024-01-01"),
            gender: Some(gender),
            shift: ShiftAssignment::None,
            location: "head_office".to_string(),
        }
    }

    fn application(leave_type: LeaveType, start: &str, end: &str) -> LeaveApplication {
        LeaveApplication {
            employee_id: "emp_001".to_string(),
            leave_type,
            start_date: make_date(start),
            end_date: make_date(end),
            reason: "Family visit".to_string(),
        }
    }

    fn submit(workflow: &LeaveWorkflow, app: &LeaveApplication, gender: Gender) -> LeaveRequest {
        workflow
            .submit(app, &employee(gender), make_date("2025-02-01"), now(), |year| {
                format!("LR{}0001", year)
            })
            .unwrap()
            .request
    }

    fn available(workflow: &LeaveWorkflow, leave_type: LeaveType) -> Availability {
        workflow
            .ledger()
            .available(&BalanceKey::new("emp_001", leave_type, 2025))
            .unwrap()
    }

    #[test]
    fn test_submit_reserves_days() {
        let workflow = workflow();
        let request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );

        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.number, "LR20250001");
        assert_eq!(request.total_days, 5);
        assert_eq!(request.working_days, 5);
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("16")));
    }

    #[test]
    fn test_non_compliant_submission_has_no_ledger_effect() {
        let workflow = workflow();
        let result = workflow.submit(
            &application(LeaveType::AnnualLeave, "2025-03-01", "2025-03-25"),
            &employee(Gender::Female),
            make_date("2025-02-01"),
            now(),
            |_| panic!("number must not be allocated"),
        );

        assert!(matches!(result, Err(EngineError::EntitlementExceeded { .. })));
        assert!(
            workflow
                .ledger()
                .account(&BalanceKey::new("emp_001", LeaveType::AnnualLeave, 2025))
                .is_none()
        );
    }

    #[test]
    fn test_end_before_start_is_validation_error() {
        let workflow = workflow();
        let result = workflow.submit(
            &application(LeaveType::AnnualLeave, "2025-02-07", "2025-02-03"),
            &employee(Gender::Female),
            make_date("2025-02-01"),
            now(),
            |_| String::new(),
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_insufficient_balance_on_second_submission() {
        let workflow = workflow();
        submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-03-03", "2025-03-20"),
            Gender::Female,
        );

        let result = workflow.submit(
            &application(LeaveType::AnnualLeave, "2025-04-01", "2025-04-05"),
            &employee(Gender::Female),
            make_date("2025-02-01"),
            now(),
            |_| String::new(),
        );
        assert!(matches!(result, Err(EngineError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_supervisor_approval_commits_short_request() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );

        let status = workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();

        assert_eq!(status, LeaveStatus::Approved);
        let account = workflow
            .ledger()
            .account(&LeaveWorkflow::balance_key(&request))
            .unwrap();
        assert_eq!(account.consumed, dec("5"));
        assert_eq!(account.reserved, Decimal::ZERO);
        assert_eq!(request.history().last().unwrap().action, WorkflowAction::SupervisorApproved);
    }

    #[test]
    fn test_long_request_escalates_to_hr() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-03-03", "2025-03-08"),
            Gender::Female,
        );
        assert!(workflow.requires_hr_approval(&request));

        let status = workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();
        assert_eq!(status, LeaveStatus::PendingHr);
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("15")));

        workflow
            .hr_decision(&mut request, Decision::Approve, "hr_001", Some("ok".to_string()), now())
            .unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);
        assert_eq!(
            request
                .history()
                .iter()
                .map(|e| e.action)
                .collect::<Vec<_>>(),
            vec![
                WorkflowAction::Submitted,
                WorkflowAction::EscalatedToHr,
                WorkflowAction::HrApproved
            ]
        );
    }

    #[test]
    fn test_hr_approval_rules() {
        let workflow = workflow();
        let paternity = submit(
            &workflow,
            &application(LeaveType::PaternityLeave, "2025-03-03", "2025-03-04"),
            Gender::Male,
        );
        let sick = submit(
            &workflow,
            &application(LeaveType::SickLeave, "2025-02-03", "2025-02-04"),
            Gender::Male,
        );

        assert!(workflow.requires_hr_approval(&paternity));
        assert!(!workflow.requires_hr_approval(&sick));
    }

    #[test]
    fn test_hr_decision_requires_pending_hr() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-04"),
            Gender::Female,
        );

        let result = workflow.hr_decision(&mut request, Decision::Approve, "hr_001", None, now());
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.history().len(), 1);
    }

    #[test]
    fn test_rejection_releases_reservation() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );

        workflow
            .supervisor_decision(&mut request, Decision::Reject, "sup_001", None, now())
            .unwrap();

        assert_eq!(request.status, LeaveStatus::Rejected);
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("21")));
    }

    #[test]
    fn test_cancel_rules() {
        let workflow = workflow();
        let mut pending = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-04"),
            Gender::Female,
        );
        workflow.cancel(&mut pending, "emp_001", None, now()).unwrap();
        assert_eq!(pending.status, LeaveStatus::Cancelled);

        let again = workflow.cancel(&mut pending, "emp_001", None, now());
        assert!(matches!(again, Err(EngineError::InvalidTransition { .. })));

        let mut approved = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-10", "2025-02-12"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut approved, Decision::Approve, "sup_001", None, now())
            .unwrap();
        workflow
            .cancel(&mut approved, "emp_001", Some("Plans changed".to_string()), now())
            .unwrap();

        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("21")));
    }

    #[test]
    fn test_extend_approved_request() {
        let workflow = workflow();
        let staff = employee(Gender::Female);
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-05"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();

        workflow
            .extend(&mut request, &staff, 2, "emp_001", None, now())
            .unwrap();

        assert_eq!(request.end_date, make_date("2025-02-07"));
        assert_eq!(request.total_days, 5);
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("16")));
        assert_eq!(request.history().last().unwrap().action, WorkflowAction::Extended);
    }

    #[test]
    fn test_failed_extension_leaves_request_unchanged() {
        let workflow = workflow();
        let staff = employee(Gender::Female);
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-05"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();
        let before = request.clone();

        let result = workflow.extend(&mut request, &staff, 30, "emp_001", None, now());

        assert!(matches!(result, Err(EngineError::EntitlementExceeded { .. })));
        assert_eq!(request, before);
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("18")));
    }

    #[test]
    fn test_extend_requires_approved() {
        let workflow = workflow();
        let staff = employee(Gender::Female);
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-05"),
            Gender::Female,
        );
        let result = workflow.extend(&mut request, &staff, 1, "emp_001", None, now());
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }

    #[test]
    fn test_return_early_refunds_capped_leave() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();

        workflow
            .return_early(&mut request, make_date("2025-02-05"), "emp_001", None, now())
            .unwrap();

        assert_eq!(request.actual_days_taken, Some(3));
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("18")));

        // Cancelling afterwards refunds only what is still charged
        workflow.cancel(&mut request, "emp_001", None, now()).unwrap();
        assert_eq!(available(&workflow, LeaveType::AnnualLeave), Availability::Limited(dec("21")));
    }

    #[test]
    fn test_return_early_on_uncapped_leave_keeps_consumption() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::CompassionateLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();

        workflow
            .return_early(&mut request, make_date("2025-02-04"), "emp_001", None, now())
            .unwrap();

        let account = workflow
            .ledger()
            .account(&BalanceKey::new("emp_001", LeaveType::CompassionateLeave, 2025))
            .unwrap();
        assert_eq!(account.consumed, dec("5"));
        assert_eq!(request.actual_days_taken, Some(2));
    }

    #[test]
    fn test_return_early_must_precede_end_date() {
        let workflow = workflow();
        let mut request = submit(
            &workflow,
            &application(LeaveType::AnnualLeave, "2025-02-03", "2025-02-07"),
            Gender::Female,
        );
        workflow
            .supervisor_decision(&mut request, Decision::Approve, "sup_001", None, now())
            .unwrap();

        let result =
            workflow.return_early(&mut request, make_date("2025-02-07"), "emp_001", None, now());
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }
}
