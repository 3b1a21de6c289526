//! Request types for the leave engine API.
//!
//! Leave submissions use [`LeaveApplication`](crate::workflow::LeaveApplication)
//! directly; every other body is defined here.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceStatus, BreakPeriod, ClockMethod};
use crate::service::ClockCorrection;
use crate::workflow::Decision;

/// Body of the supervisor and HR decision endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Approve or reject.
    pub decision: Decision,
    /// Who decides.
    pub actor_id: String,
    /// Optional comment recorded in the request history.
    #[serde(default)]
    pub note: Option<String>,
}

/// Body of `POST /leave-requests/:number/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// Who cancels.
    pub actor_id: String,
    /// Why.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /leave-requests/:number/extend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendRequest {
    /// Calendar days to add after the current end date.
    pub additional_days: u32,
    /// Who extends.
    pub actor_id: String,
    /// Why.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /leave-requests/:number/return-early`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnEarlyRequest {
    /// The last day actually taken.
    pub actual_end_date: NaiveDate,
    /// Who records the return.
    pub actor_id: String,
    /// Why.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /attendance/clock-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockInRequest {
    /// The employee clocking in.
    pub employee_id: String,
    /// Local time of the clock event.
    pub timestamp: NaiveDateTime,
    /// How the event was captured.
    #[serde(default)]
    pub method: ClockMethod,
}

/// Body of `POST /attendance/clock-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockOutRequest {
    /// The employee clocking out.
    pub employee_id: String,
    /// Local time of the clock event.
    pub timestamp: NaiveDateTime,
}

/// Body of `POST /attendance/breaks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakRequest {
    /// The employee.
    pub employee_id: String,
    /// The attendance date the break belongs to.
    pub date: NaiveDate,
    /// The break itself.
    #[serde(flatten)]
    pub period: BreakPeriod,
}

/// Body of `POST /attendance/mark`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    /// The employee.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// The status to set.
    pub status: AttendanceStatus,
    /// Optional notes stored on the record.
    #[serde(default)]
    pub notes: Option<String>,
    /// Who marks.
    pub actor_id: String,
}

/// Body of `POST /attendance/correct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectClockRequest {
    /// The employee.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// The replacement clock facts.
    #[serde(flatten)]
    pub correction: ClockCorrection,
    /// Who corrects.
    pub actor_id: String,
    /// Why.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query of `GET /attendance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// First date of the range.
    pub start: NaiveDate,
    /// Last date of the range.
    pub end: NaiveDate,
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Query of `GET /reports/compliance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceQuery {
    /// Restrict to requests charged to this year.
    #[serde(default)]
    pub year: Option<i32>,
}
