//! Time accounting for attendance records.
//!
//! [`TimeAccounting`] converts scheduled and actual clock events into worked,
//! regular, overtime and undertime hours, lateness, early departure and an
//! attendance status. Every mutator stores raw facts and then calls
//! [`TimeAccounting::recompute`], so derived fields are always a function of
//! those facts.

mod hours;
mod status;
mod summary;

pub use hours::{HoursBreakdown, early_departure_minutes, late_minutes, split_hours, worked_hours};
pub use status::derive_status;
pub use summary::AttendanceSummary;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::calendar::HolidayCalendar;
use crate::config::AttendancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, BreakPeriod, ClockMethod, EmployeeProfile,
    ShiftAssignment,
};

/// Attendance arithmetic configured with a policy and a holiday calendar.
#[derive(Debug, Clone)]
pub struct TimeAccounting {
    policy: AttendancePolicy,
    calendar: Arc<HolidayCalendar>,
}

impl TimeAccounting {
    /// Creates a new time accounting component.
    pub fn new(policy: AttendancePolicy, calendar: Arc<HolidayCalendar>) -> Self {
        Self { policy, calendar }
    }

    /// Returns the attendance policy in force.
    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    /// Opens an empty record for an employee on a date, with the schedule
    /// resolved from the employee's location and shift.
    pub fn open_record(&self, employee: &EmployeeProfile, date: NaiveDate) -> AttendanceRecord {
        let schedule = self.policy.schedule_for(&employee.location, employee.shift);
        AttendanceRecord::new(
            employee.id.clone(),
            date,
            employee.shift,
            employee.location.clone(),
            schedule,
        )
    }

    /// Returns the date of the shift a clock-in at `at` opens.
    ///
    /// An arrival after midnight but before the end of a night shift opens
    /// the shift that started the previous evening.
    pub fn shift_date(&self, employee: &EmployeeProfile, at: NaiveDateTime) -> NaiveDate {
        self.policy
            .schedule_for(&employee.location, employee.shift)
            .shift_date(at)
    }

    /// Records a clock-in and returns the resulting status.
    ///
    /// A clock-in replaces any manual mark. A record that already has a
    /// clock-in is rejected with `DuplicateRecord`; use [`Self::correct`] to
    /// re-clock a day.
    pub fn clock_in(
        &self,
        record: &mut AttendanceRecord,
        at: NaiveDateTime,
        method: ClockMethod,
        leave_covered: bool,
    ) -> EngineResult<AttendanceStatus> {
        if record.clock_in.is_some() {
            return Err(EngineError::DuplicateRecord {
                employee_id: record.employee_id.clone(),
                date: record.date,
            });
        }

        record.clock_in = Some(at);
        record.clock_method = method;
        record.marked_status = None;
        self.recompute(record, leave_covered);

        tracing::debug!(
            employee_id = %record.employee_id,
            date = %record.date,
            late_minutes = record.late_minutes,
            status = %record.status,
            "clock-in recorded"
        );
        Ok(record.status)
    }

    /// Records a clock-out.
    ///
    /// Fails with `InvalidTransition` when there is no clock-in or the day is
    /// already closed.
    pub fn clock_out(
        &self,
        record: &mut AttendanceRecord,
        at: NaiveDateTime,
        leave_covered: bool,
    ) -> EngineResult<()> {
        if record.clock_in.is_none() {
            return Err(EngineError::invalid_transition("clock_out", "not clocked in"));
        }
        if record.clock_out.is_some() {
            return Err(EngineError::invalid_transition("clock_out", "clocked out"));
        }

        record.clock_out = Some(at);
        self.recompute(record, leave_covered);

        tracing::debug!(
            employee_id = %record.employee_id,
            date = %record.date,
            worked_hours = %record.worked_hours,
            overtime_hours = %record.overtime_hours,
            "clock-out recorded"
        );
        Ok(())
    }

    /// Appends a break period to the record.
    pub fn record_break(
        &self,
        record: &mut AttendanceRecord,
        start: NaiveDateTime,
        end: NaiveDateTime,
        leave_covered: bool,
    ) -> EngineResult<()> {
        if end <= start {
            return Err(EngineError::validation("end", "break must end after it starts"));
        }
        if record.clock_in.is_none() {
            return Err(EngineError::invalid_transition("record_break", "not clocked in"));
        }

        record.breaks.push(BreakPeriod { start, end });
        self.recompute(record, leave_covered);
        Ok(())
    }

    /// Sets an explicit status, which then wins over clock facts and leave.
    pub fn mark(
        &self,
        record: &mut AttendanceRecord,
        status: AttendanceStatus,
        notes: Option<String>,
        leave_covered: bool,
    ) {
        record.marked_status = Some(status);
        if notes.is_some() {
            record.notes = notes;
        }
        self.recompute(record, leave_covered);
    }

    /// Marks the day absent: no hours worked, every scheduled hour undertime.
    pub fn mark_absent(&self, record: &mut AttendanceRecord, reason: Option<String>) {
        self.mark(record, AttendanceStatus::Absent, reason, false);
    }

    /// Overwrites the raw clock facts and recomputes every derived field.
    ///
    /// Any manual mark is cleared so the corrected facts decide the status.
    pub fn correct(
        &self,
        record: &mut AttendanceRecord,
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
        breaks: Option<Vec<BreakPeriod>>,
        leave_covered: bool,
    ) -> EngineResult<()> {
        if clock_out.is_some() && clock_in.is_none() {
            return Err(EngineError::validation(
                "clock_out",
                "a clock-out requires a clock-in",
            ));
        }
        if let Some(breaks) = &breaks {
            if breaks.iter().any(|b| b.end <= b.start) {
                return Err(EngineError::validation("breaks", "break must end after it starts"));
            }
        }

        record.clock_in = clock_in;
        record.clock_out = clock_out;
        if let Some(breaks) = breaks {
            record.breaks = breaks;
        }
        record.marked_status = None;
        self.recompute(record, leave_covered);
        Ok(())
    }

    /// Recomputes every derived field from the record's raw facts.
    ///
    /// Idempotent: running it twice leaves the record unchanged.
    pub fn recompute(&self, record: &mut AttendanceRecord, leave_covered: bool) {
        let schedule = record.schedule;
        let scheduled_hours = schedule.scheduled_hours();

        record.late_minutes = record
            .clock_in
            .map(|at| {
                late_minutes(
                    schedule.start_on(record.date),
                    at,
                    self.policy.grace_period_minutes,
                )
            })
            .unwrap_or(0);

        record.early_departure_minutes = record
            .clock_out
            .map(|at| early_departure_minutes(schedule.end_on(record.date), at))
            .unwrap_or(0);

        record.overtime_multiplier = self.overtime_multiplier(record);
        record.status = derive_status(record, leave_covered);

        let breakdown = match (record.status, record.clock_in, record.clock_out) {
            (AttendanceStatus::Absent, _, _) => HoursBreakdown::absent(scheduled_hours),
            (_, Some(clock_in), Some(clock_out)) => split_hours(
                worked_hours(clock_in, clock_out, self.break_minutes(record)),
                scheduled_hours,
            ),
            _ => HoursBreakdown::ZERO,
        };

        record.worked_hours = breakdown.worked_hours;
        record.regular_hours = breakdown.regular_hours;
        record.overtime_hours = breakdown.overtime_hours;
        record.undertime_hours = breakdown.undertime_hours;
    }

    /// Break minutes deducted from the worked span: the recorded breaks, or
    /// the schedule's unpaid allowance when none were recorded.
    fn break_minutes(&self, record: &AttendanceRecord) -> i64 {
        if record.breaks.is_empty() {
            i64::from(record.schedule.unpaid_break_minutes)
        } else {
            record.total_break_minutes()
        }
    }

    /// Informational overtime multiplier: public holiday, then night shift,
    /// then ordinary.
    fn overtime_multiplier(&self, record: &AttendanceRecord) -> Decimal {
        let multipliers = &self.policy.overtime_multipliers;
        if self.calendar.is_holiday_at(record.date, &record.location) {
            multipliers.public_holiday
        } else if record.shift == ShiftAssignment::Night || record.schedule.crosses_midnight() {
            multipliers.night_shift
        } else {
            multipliers.ordinary
        }
    }
}
