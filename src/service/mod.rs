//! Service facade.
//!
//! [`HrService`] is the surface the request layer calls. It resolves
//! employees through the [`EmployeeDirectory`], serializes writers per key,
//! drives [`TimeAccounting`] and [`LeaveWorkflow`], and reports each state
//! change to the [`AuditSink`] once it has taken effect.
//!
//! Locks are only ever taken in one order: an employee's submission lock,
//! then a single leave request, then the ledger account. Attendance records
//! are locked on their own, after any leave coverage lookup has finished.

mod audit;
mod clock;
mod directory;
mod store;

pub use audit::{AuditError, AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{EmployeeDirectory, InMemoryDirectory};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::calendar::HolidayCalendar;
use crate::config::PolicyConfig;
use crate::entitlement::{ComplianceReport, EntitlementRules};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{BalanceLedger, BalanceStatement};
use crate::models::{
    AttendanceRecord, AttendanceStatus, Availability, BreakPeriod, ClockMethod, EmployeeProfile,
    LeaveRequest, LeaveStatus, LeaveType, add_days, format_request_number,
};
use crate::timekeeping::{AttendanceSummary, TimeAccounting};
use crate::workflow::{Decision, LeaveApplication, LeaveWorkflow, Submission};
use store::KeyedStore;

type AttendanceKey = (String, NaiveDate);

/// Replacement clock facts for [`HrService::correct_clock`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockCorrection {
    /// The corrected clock-in, or none to clear it.
    pub clock_in: Option<NaiveDateTime>,
    /// The corrected clock-out, or none to clear it.
    pub clock_out: Option<NaiveDateTime>,
    /// Replacement breaks; `None` keeps the recorded ones.
    #[serde(default)]
    pub breaks: Option<Vec<BreakPeriod>>,
}

/// The attendance and leave service.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use leave_engine::config::PolicyConfig;
/// use leave_engine::models::{EmployeeProfile, Gender, LeaveType, ShiftAssignment};
/// use leave_engine::service::{HrService, InMemoryDirectory};
///
/// let employee = EmployeeProfile::new(
///     "emp_001",
///     NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
///     Some(Gender::Female),
///     ShiftAssignment::None,
///     "head_office",
/// );
/// let directory = Arc::new(InMemoryDirectory::with_employees([employee]));
/// let service = HrService::new(PolicyConfig::default(), directory);
///
/// let available = service.query_balance("emp_001", LeaveType::AnnualLeave, 2025).unwrap();
/// assert_eq!(available.days(), Some(21.into()));
/// ```
pub struct HrService {
    directory: Arc<dyn EmployeeDirectory>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    accounting: TimeAccounting,
    workflow: LeaveWorkflow,
    attendance: KeyedStore<AttendanceKey, AttendanceRecord>,
    requests: KeyedStore<String, LeaveRequest>,
    requests_by_employee: RwLock<HashMap<String, Vec<String>>>,
    submission_locks: KeyedStore<String, ()>,
    sequences: Mutex<HashMap<i32, u32>>,
}

impl HrService {
    /// Creates a service over a policy, using the policy's holidays.
    pub fn new(config: PolicyConfig, directory: Arc<dyn EmployeeDirectory>) -> Self {
        let calendar = HolidayCalendar::from_store(&config);
        Self::with_calendar(&config, calendar, directory)
    }

    /// Creates a service over a policy and an explicit holiday calendar.
    pub fn with_calendar(
        config: &PolicyConfig,
        calendar: HolidayCalendar,
        directory: Arc<dyn EmployeeDirectory>,
    ) -> Self {
        let calendar = Arc::new(calendar);
        let rules = EntitlementRules::new(config.leave_rules().clone());
        Self {
            directory,
            audit: Arc::new(TracingAuditSink),
            clock: Arc::new(SystemClock),
            accounting: TimeAccounting::new(config.attendance().clone(), calendar.clone()),
            workflow: LeaveWorkflow::new(rules, calendar, Arc::new(BalanceLedger::new())),
            attendance: KeyedStore::new(),
            requests: KeyedStore::new(),
            requests_by_employee: RwLock::new(HashMap::new()),
            submission_locks: KeyedStore::new(),
            sequences: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the audit sink.
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the leave workflow.
    pub fn workflow(&self) -> &LeaveWorkflow {
        &self.workflow
    }

    /// Returns the time accounting component.
    pub fn accounting(&self) -> &TimeAccounting {
        &self.accounting
    }

    // ------------------------------------------------------------------
    // Leave
    // ------------------------------------------------------------------

    /// Submits a leave application on behalf of the employee.
    ///
    /// Fails with `Validation` if the range overlaps another live request of
    /// the same employee. Advisory findings come back in the submission.
    pub fn submit_leave_request(&self, application: &LeaveApplication) -> EngineResult<Submission> {
        let employee = self.employee(&application.employee_id)?;
        let lock = self.submission_locks.handle_or_insert(employee.id.clone(), || ());
        let _guard = lock.lock();

        self.reject_overlap(
            &employee.id,
            application.start_date,
            application.end_date,
            None,
        )?;

        let now = self.clock.now();
        let submission = self.workflow.submit(
            application,
            &employee,
            now.date_naive(),
            now,
            |year| self.next_request_number(year),
        )?;

        let request = &submission.request;
        self.requests.insert(request.number.clone(), request.clone());
        self.requests_by_employee
            .write()
            .entry(employee.id.clone())
            .or_default()
            .push(request.number.clone());

        self.audit(
            "leave_submitted",
            &employee.id,
            "leave_request",
            &request.number,
            json!({
                "leave_type": request.leave_type,
                "start_date": request.start_date,
                "end_date": request.end_date,
                "total_days": request.total_days,
                "warnings": submission.validation.warnings().count(),
            }),
            now,
        );
        Ok(submission)
    }

    /// Records the supervisor's decision on a pending request.
    pub fn decide_supervisor(
        &self,
        number: &str,
        decision: Decision,
        actor: &str,
        note: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let now = self.clock.now();
        let (status, request) = self.modify_request(number, |request| {
            self.workflow
                .supervisor_decision(request, decision, actor, note, now)
        })?;
        self.refresh_attendance(&request);
        self.audit(
            "leave_supervisor_decision",
            actor,
            "leave_request",
            number,
            json!({ "decision": decision.as_str(), "status": status }),
            now,
        );
        Ok(request)
    }

    /// Records HR's decision on a request awaiting HR.
    pub fn decide_hr(
        &self,
        number: &str,
        decision: Decision,
        actor: &str,
        note: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let now = self.clock.now();
        let (status, request) = self.modify_request(number, |request| {
            self.workflow.hr_decision(request, decision, actor, note, now)
        })?;
        self.refresh_attendance(&request);
        self.audit(
            "leave_hr_decision",
            actor,
            "leave_request",
            number,
            json!({ "decision": decision.as_str(), "status": status }),
            now,
        );
        Ok(request)
    }

    /// Cancels a pending or approved request.
    pub fn cancel_leave_request(
        &self,
        number: &str,
        actor: &str,
        reason: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let now = self.clock.now();
        let details = json!({ "reason": reason });
        let ((), request) = self.modify_request(number, |request| {
            self.workflow.cancel(request, actor, reason, now)
        })?;
        self.refresh_attendance(&request);
        self.audit("leave_cancelled", actor, "leave_request", number, details, now);
        Ok(request)
    }

    /// Extends an approved request by `additional_days` calendar days.
    pub fn extend_leave_request(
        &self,
        number: &str,
        additional_days: u32,
        actor: &str,
        reason: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let current = self.get_leave_request(number)?;
        let employee = self.employee(&current.employee_id)?;
        let lock = self.submission_locks.handle_or_insert(employee.id.clone(), || ());
        let _guard = lock.lock();

        if additional_days > 0 {
            self.reject_overlap(
                &employee.id,
                add_days(current.end_date, 1),
                add_days(current.end_date, additional_days),
                Some(number),
            )?;
        }

        let now = self.clock.now();
        let ((), request) = self.modify_request(number, |request| {
            self.workflow
                .extend(request, &employee, additional_days, actor, reason, now)
        })?;
        self.refresh_attendance(&request);
        self.audit(
            "leave_extended",
            actor,
            "leave_request",
            number,
            json!({
                "additional_days": additional_days,
                "end_date": request.end_date,
                "total_days": request.total_days,
            }),
            now,
        );
        Ok(request)
    }

    /// Records an early return on an approved request.
    pub fn return_early(
        &self,
        number: &str,
        actual_end_date: NaiveDate,
        actor: &str,
        reason: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let now = self.clock.now();
        let ((), request) = self.modify_request(number, |request| {
            self.workflow
                .return_early(request, actual_end_date, actor, reason, now)
        })?;
        self.refresh_attendance(&request);
        self.audit(
            "leave_returned_early",
            actor,
            "leave_request",
            number,
            json!({
                "actual_end_date": actual_end_date,
                "actual_days_taken": request.actual_days_taken,
            }),
            now,
        );
        Ok(request)
    }

    /// Looks up a request, history included.
    pub fn get_leave_request(&self, number: &str) -> EngineResult<LeaveRequest> {
        self.requests
            .get(number)
            .ok_or_else(|| request_not_found(number))
    }

    /// Returns an employee's requests, earliest start first.
    pub fn leave_requests_for(&self, employee_id: &str) -> Vec<LeaveRequest> {
        let numbers = self
            .requests_by_employee
            .read()
            .get(employee_id)
            .cloned()
            .unwrap_or_default();
        let mut requests: Vec<LeaveRequest> = numbers
            .iter()
            .filter_map(|number| self.requests.get(number.as_str()))
            .collect();
        requests.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.number.cmp(&b.number)));
        requests
    }

    /// Returns the approved request covering `date`, if any.
    pub fn leave_coverage(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<LeaveRequest>> {
        self.employee(employee_id)?;
        Ok(self.covering_request(employee_id, date))
    }

    /// Returns the days still available to the employee for a leave type
    /// and year, opening the account if needed.
    pub fn query_balance(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        year: i32,
    ) -> EngineResult<Availability> {
        let employee = self.employee(employee_id)?;
        let key = self
            .workflow
            .ensure_account(&employee, leave_type, year, self.clock.today())?;
        self.workflow.ledger().available(&key)
    }

    /// Lists every account the employee holds for a year.
    pub fn balance_statement(&self, employee_id: &str, year: i32) -> EngineResult<BalanceStatement> {
        self.employee(employee_id)?;
        Ok(self.workflow.ledger().statement(employee_id, year))
    }

    /// Re-evaluates stored requests against the rule table. With a year,
    /// only requests charged to that year are included.
    pub fn compliance_report(&self, year: Option<i32>) -> EngineResult<ComplianceReport> {
        let mut requests = self
            .requests
            .snapshot(|_| true)
            .into_iter()
            .filter(|request| year.is_none_or(|year| request.ledger_year == year))
            .collect::<Vec<_>>();
        requests.sort_by(|a, b| a.number.cmp(&b.number));

        let mut employees: HashMap<String, EmployeeProfile> = HashMap::new();
        for request in &requests {
            if employees.contains_key(&request.employee_id) {
                continue;
            }
            match self.directory.get(&request.employee_id) {
                Some(employee) => {
                    employees.insert(employee.id.clone(), employee);
                }
                None => tracing::warn!(
                    request = %request.number,
                    employee_id = %request.employee_id,
                    "employee missing from directory, request left out of report"
                ),
            }
        }

        self.workflow.rules().compliance_report(
            requests.iter().filter_map(|request| {
                employees
                    .get(&request.employee_id)
                    .map(|employee| (request, employee))
            }),
        )
    }

    // ------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------

    /// Records a clock-in, creating the shift's record if needed.
    ///
    /// A late arrival on a night shift, after midnight, is recorded against
    /// the shift that started the previous evening.
    pub fn clock_in(
        &self,
        employee_id: &str,
        at: NaiveDateTime,
        method: ClockMethod,
    ) -> EngineResult<AttendanceRecord> {
        let employee = self.employee(employee_id)?;
        let date = self.accounting.shift_date(&employee, at);
        let covered = self.leave_covered(&employee.id, date);
        let (status, record) = self.attendance.upsert(
            (employee.id.clone(), date),
            || self.accounting.open_record(&employee, date),
            |record| self.accounting.clock_in(record, at, method, covered),
        )?;
        self.audit(
            "clock_in",
            &employee.id,
            "attendance_record",
            &attendance_id(&employee.id, date),
            json!({
                "at": at,
                "method": method,
                "status": status,
                "late_minutes": record.late_minutes,
            }),
            self.clock.now(),
        );
        Ok(record)
    }

    /// Records a clock-out against the employee's open shift.
    ///
    /// A night shift that started the previous day is closed on that day's
    /// record.
    pub fn clock_out(&self, employee_id: &str, at: NaiveDateTime) -> EngineResult<AttendanceRecord> {
        let employee = self.employee(employee_id)?;
        let date = self.open_shift_date(&employee.id, at);
        let covered = self.leave_covered(&employee.id, date);
        let ((), record) = self
            .attendance
            .modify(&(employee.id.clone(), date), |record| {
                self.accounting.clock_out(record, at, covered)
            })
            .ok_or_else(|| EngineError::invalid_transition("clock_out", "not clocked in"))??;
        self.audit(
            "clock_out",
            &employee.id,
            "attendance_record",
            &attendance_id(&employee.id, date),
            json!({
                "at": at,
                "worked_hours": record.worked_hours,
                "overtime_hours": record.overtime_hours,
            }),
            self.clock.now(),
        );
        Ok(record)
    }

    /// Appends a break to the day's record.
    pub fn record_break(
        &self,
        employee_id: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        self.employee(employee_id)?;
        let covered = self.leave_covered(employee_id, date);
        let ((), record) = self
            .attendance
            .modify(&(employee_id.to_string(), date), |record| {
                self.accounting.record_break(record, start, end, covered)
            })
            .ok_or_else(|| EngineError::invalid_transition("record_break", "not clocked in"))??;
        self.audit(
            "break_recorded",
            employee_id,
            "attendance_record",
            &attendance_id(employee_id, date),
            json!({ "start": start, "end": end }),
            self.clock.now(),
        );
        Ok(record)
    }

    /// Sets an explicit status for the day, creating the record if needed.
    /// An existing record is updated in place.
    pub fn mark_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<String>,
        actor: &str,
    ) -> EngineResult<AttendanceRecord> {
        let employee = self.employee(employee_id)?;
        let covered = self.leave_covered(&employee.id, date);
        let ((), record) = self.attendance.upsert(
            (employee.id.clone(), date),
            || self.accounting.open_record(&employee, date),
            |record| {
                self.accounting.mark(record, status, notes, covered);
                Ok(())
            },
        )?;
        self.audit(
            "attendance_marked",
            actor,
            "attendance_record",
            &attendance_id(&employee.id, date),
            json!({ "status": status, "notes": record.notes }),
            self.clock.now(),
        );
        Ok(record)
    }

    /// Overwrites the day's clock facts, creating the record if needed.
    pub fn correct_clock(
        &self,
        employee_id: &str,
        date: NaiveDate,
        correction: ClockCorrection,
        actor: &str,
        reason: Option<String>,
    ) -> EngineResult<AttendanceRecord> {
        let employee = self.employee(employee_id)?;
        let covered = self.leave_covered(&employee.id, date);
        let ClockCorrection {
            clock_in,
            clock_out,
            breaks,
        } = correction;
        let ((), record) = self.attendance.upsert(
            (employee.id.clone(), date),
            || self.accounting.open_record(&employee, date),
            |record| {
                self.accounting
                    .correct(record, clock_in, clock_out, breaks, covered)
            },
        )?;
        self.audit(
            "clock_corrected",
            actor,
            "attendance_record",
            &attendance_id(&employee.id, date),
            json!({
                "clock_in": clock_in,
                "clock_out": clock_out,
                "worked_hours": record.worked_hours,
                "reason": reason,
            }),
            self.clock.now(),
        );
        Ok(record)
    }

    /// Looks up the day's record.
    pub fn attendance_record(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<AttendanceRecord> {
        self.attendance
            .get(&(employee_id.to_string(), date))
            .ok_or_else(|| EngineError::NotFound {
                entity: "attendance_record",
                id: attendance_id(employee_id, date),
            })
    }

    /// Counts records by status over `[start, end]`, for one employee or
    /// for everyone.
    pub fn attendance_summary(
        &self,
        employee_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<AttendanceSummary> {
        if end < start {
            return Err(EngineError::validation(
                "end",
                "end date must not be before start date",
            ));
        }
        let records = self.attendance.snapshot(|(id, date)| {
            employee_id.is_none_or(|wanted| wanted == id.as_str()) && *date >= start && *date <= end
        });
        Ok(AttendanceSummary::from_records(&records, start, end))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn employee(&self, employee_id: &str) -> EngineResult<EmployeeProfile> {
        self.directory
            .get(employee_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "employee",
                id: employee_id.to_string(),
            })
    }

    fn next_request_number(&self, year: i32) -> String {
        let mut sequences = self.sequences.lock();
        let sequence = sequences.entry(year).or_insert(0);
        *sequence += 1;
        format_request_number(year, *sequence)
    }

    fn modify_request<R>(
        &self,
        number: &str,
        op: impl FnOnce(&mut LeaveRequest) -> EngineResult<R>,
    ) -> EngineResult<(R, LeaveRequest)> {
        self.requests
            .modify(number, op)
            .ok_or_else(|| request_not_found(number))?
    }

    fn reject_overlap(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<&str>,
    ) -> EngineResult<()> {
        let clash = self
            .leave_requests_for(employee_id)
            .into_iter()
            .filter(|request| Some(request.number.as_str()) != exclude)
            .find(|request| request.status.is_live() && request.overlaps(start, end));
        match clash {
            Some(request) => Err(EngineError::validation(
                "start_date",
                format!(
                    "overlaps leave request {} ({} to {})",
                    request.number,
                    request.start_date,
                    request.effective_end_date()
                ),
            )),
            None => Ok(()),
        }
    }

    fn covering_request(&self, employee_id: &str, date: NaiveDate) -> Option<LeaveRequest> {
        self.leave_requests_for(employee_id)
            .into_iter()
            .find(|request| request.status == LeaveStatus::Approved && request.covers(date))
    }

    fn leave_covered(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.covering_request(employee_id, date).is_some()
    }

    /// The record a clock-out at `at` closes: the same day's record, or the
    /// previous day's when that one holds a shift still open.
    fn open_shift_date(&self, employee_id: &str, at: NaiveDateTime) -> NaiveDate {
        let today = at.date();
        let is_open = |date: NaiveDate| {
            self.attendance
                .get(&(employee_id.to_string(), date))
                .is_some_and(|record| record.clock_in.is_some() && record.clock_out.is_none())
        };
        if is_open(today) {
            return today;
        }
        let yesterday = today - Duration::days(1);
        if is_open(yesterday) { yesterday } else { today }
    }

    /// Recomputes the attendance records a request's range touches, so
    /// on-leave status follows the request's current state.
    fn refresh_attendance(&self, request: &LeaveRequest) {
        for date in request
            .start_date
            .iter_days()
            .take_while(|date| *date <= request.end_date)
        {
            let covered = self.leave_covered(&request.employee_id, date);
            let refreshed = self
                .attendance
                .modify(&(request.employee_id.clone(), date), |record| {
                    self.accounting.recompute(record, covered);
                    Ok(record.status)
                });
            if let Some(Ok((status, _))) = refreshed {
                tracing::debug!(
                    employee_id = %request.employee_id,
                    %date,
                    %status,
                    "attendance status refreshed"
                );
            }
        }
    }

    fn audit(
        &self,
        event_type: &str,
        actor_id: &str,
        target_type: &str,
        target_id: &str,
        details: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) {
        let event = AuditEvent {
            event_type: event_type.to_string(),
            actor_id: actor_id.to_string(),
            target_type: target_type.to_string(),
            target_id: target_id.to_string(),
            details,
            timestamp,
        };
        if let Err(error) = self.audit.record(&event) {
            tracing::warn!(
                event_type,
                target_id,
                %error,
                "audit event not recorded"
            );
        }
    }
}

fn request_not_found(number: &str) -> EngineError {
    EngineError::NotFound {
        entity: "leave_request",
        id: number.to_string(),
    }
}

fn attendance_id(employee_id: &str, date: NaiveDate) -> String {
    format!("{employee_id}/{date}")
}
