//! Leave request model and its workflow history.
//!
//! A [`LeaveRequest`] exists only once submitted. Its status moves through the
//! states in [`LeaveStatus`]; every move appends a [`WorkflowEntry`] to the
//! request's history, which is never rewritten.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The leave types recognised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual leave.
    AnnualLeave,
    /// Sick leave.
    SickLeave,
    /// Maternity leave.
    MaternityLeave,
    /// Paternity leave.
    PaternityLeave,
    /// Compassionate (bereavement) leave.
    CompassionateLeave,
    /// Study leave.
    StudyLeave,
    /// Unpaid leave.
    UnpaidLeave,
}

impl LeaveType {
    /// Every leave type, in display order.
    pub const ALL: [LeaveType; 7] = [
        LeaveType::AnnualLeave,
        LeaveType::SickLeave,
        LeaveType::MaternityLeave,
        LeaveType::PaternityLeave,
        LeaveType::CompassionateLeave,
        LeaveType::StudyLeave,
        LeaveType::UnpaidLeave,
    ];

    /// Returns the string representation of the leave type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::AnnualLeave => "annual_leave",
            LeaveType::SickLeave => "sick_leave",
            LeaveType::MaternityLeave => "maternity_leave",
            LeaveType::PaternityLeave => "paternity_leave",
            LeaveType::CompassionateLeave => "compassionate_leave",
            LeaveType::StudyLeave => "study_leave",
            LeaveType::UnpaidLeave => "unpaid_leave",
        }
    }

    /// Parses a leave type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        LeaveType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.to_lowercase())
    }

    /// Returns a display-friendly name, e.g. "Annual Leave".
    pub fn display_name(&self) -> &'static str {
        match self {
            LeaveType::AnnualLeave => "Annual Leave",
            LeaveType::SickLeave => "Sick Leave",
            LeaveType::MaternityLeave => "Maternity Leave",
            LeaveType::PaternityLeave => "Paternity Leave",
            LeaveType::CompassionateLeave => "Compassionate Leave",
            LeaveType::StudyLeave => "Study Leave",
            LeaveType::UnpaidLeave => "Unpaid Leave",
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Leave request status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → PendingHr (supervisor approves, HR step required)
/// - Pending → Approved (supervisor approves, no HR step)
/// - Pending → Rejected / PendingHr → Rejected
/// - PendingHr → Approved
/// - Pending, PendingHr, Approved → Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting the supervisor's decision.
    Pending,
    /// Awaiting HR's decision.
    PendingHr,
    /// Approved; days are consumed.
    Approved,
    /// Rejected by supervisor or HR.
    Rejected,
    /// Withdrawn after submission.
    Cancelled,
}

impl LeaveStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::PendingHr => "pending_hr",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true while the request holds a ledger reservation.
    pub fn is_awaiting_decision(&self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::PendingHr)
    }

    /// Returns true if the request blocks overlapping requests.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            LeaveStatus::Pending | LeaveStatus::PendingHr | LeaveStatus::Approved
        )
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The action recorded by a workflow history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    /// The request was submitted.
    Submitted,
    /// The supervisor approved and the request was escalated to HR.
    EscalatedToHr,
    /// The supervisor gave final approval.
    SupervisorApproved,
    /// The supervisor rejected the request.
    SupervisorRejected,
    /// HR approved the request.
    HrApproved,
    /// HR rejected the request.
    HrRejected,
    /// The request was cancelled.
    Cancelled,
    /// An approved request was extended.
    Extended,
    /// The employee returned before the approved end date.
    ReturnedEarly,
}

/// One immutable entry in a request's workflow history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEntry {
    /// What happened.
    pub action: WorkflowAction,
    /// Who did it.
    pub actor: String,
    /// When it happened.
    pub at: DateTime<Utc>,
    /// Optional note or reason.
    pub note: Option<String>,
}

/// A submitted leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Human-readable number, `LR{year}{sequence:04}`.
    pub number: String,
    /// The requesting employee.
    pub employee_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last approved day of leave.
    pub end_date: NaiveDate,
    /// Calendar days charged, both endpoints inclusive.
    pub total_days: u32,
    /// Working days in the range, for display and notice checks.
    pub working_days: u32,
    /// Reason given by the requester.
    pub reason: String,
    /// Current workflow state.
    pub status: LeaveStatus,
    /// Whether a medical certificate must accompany the request.
    pub certificate_required: bool,
    /// Last day actually taken, set by an early return.
    pub actual_end_date: Option<NaiveDate>,
    /// Days actually taken, set by an early return.
    pub actual_days_taken: Option<u32>,
    /// The ledger year charged by this request.
    pub ledger_year: i32,
    /// When the request was submitted.
    pub submitted_at: DateTime<Utc>,
    history: Vec<WorkflowEntry>,
}

impl LeaveRequest {
    /// Creates a new request in the `pending` state with a `submitted`
    /// history entry.
    #[allow(clippy::too_many_arguments)]
    pub fn submitted(
        number: impl Into<String>,
        employee_id: impl Into<String>,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        working_days: u32,
        reason: impl Into<String>,
        certificate_required: bool,
        at: DateTime<Utc>,
    ) -> Self {
        let employee_id = employee_id.into();
        let reason = reason.into();
        let history = vec![WorkflowEntry {
            action: WorkflowAction::Submitted,
            actor: employee_id.clone(),
            at,
            note: Some(reason.clone()),
        }];
        Self {
            number: number.into(),
            employee_id,
            leave_type,
            start_date,
            end_date,
            total_days: calendar_days(start_date, end_date),
            working_days,
            reason,
            status: LeaveStatus::Pending,
            certificate_required,
            actual_end_date: None,
            actual_days_taken: None,
            ledger_year: chrono::Datelike::year(&start_date),
            submitted_at: at,
            history,
        }
    }

    /// Returns the append-only workflow history.
    pub fn history(&self) -> &[WorkflowEntry] {
        &self.history
    }

    /// Appends a workflow history entry.
    pub(crate) fn record(
        &mut self,
        action: WorkflowAction,
        actor: &str,
        at: DateTime<Utc>,
        note: Option<String>,
    ) {
        self.history.push(WorkflowEntry {
            action,
            actor: actor.to_string(),
            at,
            note,
        });
    }

    /// Returns the last day of leave, honouring an early return.
    pub fn effective_end_date(&self) -> NaiveDate {
        self.actual_end_date.unwrap_or(self.end_date)
    }

    /// Returns true if the request's range includes `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.effective_end_date()
    }

    /// Returns true if the two inclusive ranges share at least one day.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.effective_end_date()
    }
}

/// Counts calendar days in `[start, end]`, both endpoints inclusive.
///
/// Returns 0 if `start > end`.
pub fn calendar_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    ((end - start).num_days() + 1) as u32
}

/// Formats a leave request number: `LR{year}{sequence:04}`.
///
/// # Example
///
/// ```
/// use leave_engine::models::format_request_number;
///
/// assert_eq!(format_request_number(2025, 13), "LR20250013");
/// ```
pub fn format_request_number(year: i32, sequence: u32) -> String {
    format!("LR{}{:04}", year, sequence)
}

/// Returns `date` moved forward by `days` calendar days.
pub(crate) fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date + Duration::days(i64::from(days))
}
