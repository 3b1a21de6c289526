//! Attendance status derivation.

use crate::models::{AttendanceRecord, AttendanceStatus};

/// Derives a record's status from its stored facts.
///
/// Precedence, highest first:
/// 1. an explicit manual mark;
/// 2. a clock-in, yielding `late` when late minutes are positive, else `present`;
/// 3. approved leave covering the date, yielding `on_leave`;
/// 4. otherwise `absent`.
///
/// The function is pure: the same record and coverage always give the same
/// status.
///
/// # Example
///
/// ```
/// use leave_engine::models::{AttendanceRecord, AttendanceStatus, ShiftAssignment, WorkSchedule};
/// use leave_engine::timekeeping::derive_status;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let schedule = WorkSchedule {
///     start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     unpaid_break_minutes: 60,
/// };
/// let record = AttendanceRecord::new(
///     "emp_001",
///     NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(),
///     ShiftAssignment::None,
///     "head_office",
///     schedule,
/// );
///
/// assert_eq!(derive_status(&record, true), AttendanceStatus::OnLeave);
/// assert_eq!(derive_status(&record, false), AttendanceStatus::Absent);
/// ```
pub fn derive_status(record: &AttendanceRecord, leave_covered: bool) -> AttendanceStatus {
    if let Some(marked) = record.marked_status {
        return marked;
    }
    if record.clock_in.is_some() {
        return if record.late_minutes > 0 {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
    }
    if leave_covered {
        AttendanceStatus::OnLeave
    } else {
        AttendanceStatus::Absent
    }
}
