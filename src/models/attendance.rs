//! Attendance record model and related types.
//!
//! An [`AttendanceRecord`] is keyed by (employee, date). Its raw facts are the
//! schedule, clock events, breaks and any manual mark; every other field is
//! derived from those facts by [`crate::timekeeping`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShiftAssignment;

/// Attendance status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Arrived within the grace period.
    Present,
    /// Arrived after the grace period.
    Late,
    /// Did not attend.
    Absent,
    /// Attended for part of the day.
    HalfDay,
    /// Covered by approved leave.
    OnLeave,
}

impl AttendanceStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::OnLeave => "on_leave",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a clock event was captured. Recorded only; never verified here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMethod {
    /// Entered by a station manager.
    #[default]
    Manual,
    /// Fingerprint terminal.
    Biometric,
    /// Card reader.
    Rfid,
    /// Mobile check-in.
    Mobile,
}

/// A scheduled working window with its unpaid break allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Scheduled start time.
    pub start: NaiveTime,
    /// Scheduled end time; earlier than `start` for shifts crossing midnight.
    pub end: NaiveTime,
    /// Unpaid break minutes within the window.
    #[serde(default)]
    pub unpaid_break_minutes: u32,
}

impl WorkSchedule {
    /// Returns true if the scheduled window crosses midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the scheduled start as a datetime on `date`.
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }

    /// Returns the scheduled end for a shift starting on `date`.
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        let end = date.and_time(self.end);
        if self.crosses_midnight() {
            end + Duration::days(1)
        } else {
            end
        }
    }

    /// Returns the date of the shift an event at `at` belongs to.
    ///
    /// For a window crossing midnight, an event before the scheduled end
    /// belongs to the shift that started the previous day.
    pub fn shift_date(&self, at: NaiveDateTime) -> NaiveDate {
        if self.crosses_midnight() && at.time() < self.end {
            at.date() - Duration::days(1)
        } else {
            at.date()
        }
    }

    /// Returns the scheduled working hours: the window less unpaid breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::WorkSchedule;
    /// use chrono::NaiveTime;
    /// use rust_decimal::Decimal;
    ///
    /// let office = WorkSchedule {
    ///     start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    ///     unpaid_break_minutes: 60,
    /// };
    /// assert_eq!(office.scheduled_hours(), Decimal::new(8, 0));
    /// ```
    pub fn scheduled_hours(&self) -> Decimal {
        let span = if self.crosses_midnight() {
            24 * 60 - (self.start - self.end).num_minutes()
        } else {
            (self.end - self.start).num_minutes()
        };
        let minutes = (span - i64::from(self.unpaid_break_minutes)).max(0);
        Decimal::new(minutes, 0) / Decimal::new(60, 0)
    }
}

/// A break taken during a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    /// The start of the break.
    pub start: NaiveDateTime,
    /// The end of the break.
    pub end: NaiveDateTime,
}

impl BreakPeriod {
    /// Returns the duration of the break in minutes, never negative.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// One employee's attendance for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The attendance date (the date the shift starts on).
    pub date: NaiveDate,
    /// The rostered shift.
    pub shift: ShiftAssignment,
    /// The work location, used for location-restricted holidays.
    pub location: String,
    /// The schedule in force on this date.
    pub schedule: WorkSchedule,
    /// Actual clock-in.
    pub clock_in: Option<NaiveDateTime>,
    /// Actual clock-out.
    pub clock_out: Option<NaiveDateTime>,
    /// How the clock-in was captured.
    pub clock_method: ClockMethod,
    /// Breaks taken, in recording order.
    #[serde(default)]
    pub breaks: Vec<BreakPeriod>,
    /// An explicit status set by a manual mark.
    pub marked_status: Option<AttendanceStatus>,
    /// Free-form notes attached by the marker.
    pub notes: Option<String>,
    /// Derived: hours worked after breaks.
    pub worked_hours: Decimal,
    /// Derived: worked hours up to the scheduled hours.
    pub regular_hours: Decimal,
    /// Derived: worked hours beyond the scheduled hours.
    pub overtime_hours: Decimal,
    /// Derived: scheduled hours not worked.
    pub undertime_hours: Decimal,
    /// Derived: informational overtime multiplier for the day.
    pub overtime_multiplier: Decimal,
    /// Derived: minutes past the grace period.
    pub late_minutes: i64,
    /// Derived: minutes left before the scheduled end.
    pub early_departure_minutes: i64,
    /// Derived: the day's status.
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Creates an empty record with no clock facts.
    ///
    /// Derived fields start zeroed; callers run
    /// [`TimeAccounting::recompute`](crate::timekeeping::TimeAccounting::recompute)
    /// before exposing the record.
    pub fn new(
        employee_id: impl Into<String>,
        date: NaiveDate,
        shift: ShiftAssignment,
        location: impl Into<String>,
        schedule: WorkSchedule,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            shift,
            location: location.into(),
            schedule,
            clock_in: None,
            clock_out: None,
            clock_method: ClockMethod::default(),
            breaks: Vec::new(),
            marked_status: None,
            notes: None,
            worked_hours: Decimal::ZERO,
            regular_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            undertime_hours: Decimal::ZERO,
            overtime_multiplier: Decimal::ONE,
            late_minutes: 0,
            early_departure_minutes: 0,
            status: AttendanceStatus::Absent,
        }
    }

    /// Returns the total recorded break minutes.
    pub fn total_break_minutes(&self) -> i64 {
        self.breaks.iter().map(BreakPeriod::minutes).sum()
    }

    /// Returns true once both clock events are recorded.
    pub fn is_closed(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_some()
    }
}
