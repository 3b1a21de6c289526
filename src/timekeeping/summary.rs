//! Attendance summaries over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus};

/// Counts of attendance records by status over an inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// First date of the range.
    pub start: Option<NaiveDate>,
    /// Last date of the range.
    pub end: Option<NaiveDate>,
    /// Records counted.
    pub total: u32,
    /// Present records.
    pub present: u32,
    /// Late records.
    pub late: u32,
    /// Absent records.
    pub absent: u32,
    /// Half-day records.
    pub half_day: u32,
    /// On-leave records.
    pub on_leave: u32,
}

impl AttendanceSummary {
    /// Summarizes the records whose date falls in `[start, end]`.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a AttendanceRecord>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let mut summary = Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        };
        for record in records {
            if record.date < start || record.date > end {
                continue;
            }
            summary.total += 1;
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::HalfDay => summary.half_day += 1,
                AttendanceStatus::OnLeave => summary.on_leave += 1,
            }
        }
        summary
    }

    /// Share of counted records that attended (present, late or half-day),
    /// as a percentage. Zero when nothing was counted.
    pub fn attendance_rate(&self) -> Decimal {
        if self.total == 0 {
            return Decimal::ZERO;
        }
        let attended = self.present + self.late + self.half_day;
        (Decimal::from(attended) * Decimal::ONE_HUNDRED / Decimal::from(self.total)).round_dp(2)
    }
}
