//! Worked-hour arithmetic.
//!
//! Pure functions turning clock timestamps, breaks and a schedule into
//! worked, regular, overtime and undertime hours, lateness and early
//! departure.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;
const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// The split of a day's worked hours against its scheduled hours.
///
/// # Example
///
/// ```
/// use leave_engine::timekeeping::split_hours;
/// use rust_decimal::Decimal;
///
/// let split = split_hours(Decimal::new(10, 0), Decimal::new(8, 0));
/// assert_eq!(split.regular_hours, Decimal::new(8, 0));
/// assert_eq!(split.overtime_hours, Decimal::new(2, 0));
/// assert_eq!(split.undertime_hours, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursBreakdown {
    /// Hours worked after breaks.
    pub worked_hours: Decimal,
    /// Worked hours up to the scheduled hours.
    pub regular_hours: Decimal,
    /// Worked hours beyond the scheduled hours.
    pub overtime_hours: Decimal,
    /// Scheduled hours not worked.
    pub undertime_hours: Decimal,
}

impl HoursBreakdown {
    /// A day with nothing worked and nothing owed.
    pub const ZERO: HoursBreakdown = HoursBreakdown {
        worked_hours: Decimal::ZERO,
        regular_hours: Decimal::ZERO,
        overtime_hours: Decimal::ZERO,
        undertime_hours: Decimal::ZERO,
    };

    /// A day absent in full: every scheduled hour is undertime.
    pub fn absent(scheduled_hours: Decimal) -> Self {
        Self {
            undertime_hours: scheduled_hours,
            ..Self::ZERO
        }
    }
}

/// Splits worked hours into regular, overtime and undertime.
pub fn split_hours(worked_hours: Decimal, scheduled_hours: Decimal) -> HoursBreakdown {
    HoursBreakdown {
        worked_hours,
        regular_hours: worked_hours.min(scheduled_hours),
        overtime_hours: (worked_hours - scheduled_hours).max(Decimal::ZERO),
        undertime_hours: (scheduled_hours - worked_hours).max(Decimal::ZERO),
    }
}

/// Computes hours worked between two clock events, less breaks.
///
/// A clock-out earlier than the clock-in is taken to cross midnight and has
/// 24 hours added. The result is clamped to zero and rounded to two decimal
/// places.
///
/// # Example
///
/// ```
/// use leave_engine::timekeeping::worked_hours;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let clock_in = NaiveDateTime::parse_from_str("2025-02-03 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let clock_out = NaiveDateTime::parse_from_str("2025-02-03 17:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// assert_eq!(worked_hours(clock_in, clock_out, 60), Decimal::new(8, 0));
/// ```
pub fn worked_hours(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    break_minutes: i64,
) -> Decimal {
    let mut span = (clock_out - clock_in).num_minutes();
    if clock_out < clock_in {
        span += MINUTES_PER_DAY;
    }
    let minutes = (span - break_minutes).max(0);
    (Decimal::new(minutes, 0) / MINUTES_PER_HOUR).round_dp(2)
}

/// Minutes of lateness beyond the grace period, never negative.
///
/// # Example
///
/// ```
/// use leave_engine::timekeeping::late_minutes;
/// use chrono::NaiveDateTime;
///
/// let scheduled = NaiveDateTime::parse_from_str("2025-02-03 06:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let actual = NaiveDateTime::parse_from_str("2025-02-03 06:20:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// assert_eq!(late_minutes(scheduled, actual, 15), 5);
/// ```
pub fn late_minutes(scheduled_start: NaiveDateTime, actual: NaiveDateTime, grace_minutes: u32) -> i64 {
    let grace = Duration::minutes(i64::from(grace_minutes));
    (actual - scheduled_start - grace).num_minutes().max(0)
}

/// Minutes between an early clock-out and the scheduled end, never negative.
pub fn early_departure_minutes(scheduled_end: NaiveDateTime, actual_end: NaiveDateTime) -> i64 {
    (scheduled_end - actual_end).num_minutes().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_office_day_worked_hours() {
        let worked = worked_hours(
            make_datetime("2025-02-03", "08:00:00"),
            make_datetime("2025-02-03", "17:00:00"),
            60,
        );
        assert_eq!(worked, dec("8"));
    }

    #[test]
    fn test_night_shift_crosses_midnight() {
        let worked = worked_hours(
            make_datetime("2025-02-03", "18:00:00"),
            make_datetime("2025-02-04", "06:00:00"),
            60,
        );
        assert_eq!(worked, dec("11"));
    }

    #[test]
    fn test_clock_out_before_clock_in_adds_a_day() {
        // Same calendar date on both stamps, out earlier than in
        let worked = worked_hours(
            make_datetime("2025-02-03", "22:00:00"),
            make_datetime("2025-02-03", "02:00:00"),
            0,
        );
        assert_eq!(worked, dec("4"));
    }

    #[test]
    fn test_breaks_longer_than_span_clamp_to_zero() {
        let worked = worked_hours(
            make_datetime("2025-02-03", "08:00:00"),
            make_datetime("2025-02-03", "08:30:00"),
            60,
        );
        assert_eq!(worked, Decimal::ZERO);
    }

    #[test]
    fn test_worked_hours_rounded_to_two_places() {
        let worked = worked_hours(
            make_datetime("2025-02-03", "08:00:00"),
            make_datetime("2025-02-03", "16:10:00"),
            0,
        );
        assert_eq!(worked, dec("8.17"));
    }

    #[test]
    fn test_late_within_grace() {
        let scheduled = make_datetime("2025-02-03", "06:00:00");
        assert_eq!(late_minutes(scheduled, make_datetime("2025-02-03", "06:10:00"), 15), 0);
        assert_eq!(late_minutes(scheduled, make_datetime("2025-02-03", "06:15:00"), 15), 0);
        assert_eq!(late_minutes(scheduled, make_datetime("2025-02-03", "05:45:00"), 15), 0);
    }

    #[test]
    fn test_late_past_grace() {
        let scheduled = make_datetime("2025-02-03", "06:00:00");
        assert_eq!(late_minutes(scheduled, make_datetime("2025-02-03", "06:20:00"), 15), 5);
        assert_eq!(late_minutes(scheduled, make_datetime("2025-02-03", "07:00:00"), 0), 60);
    }

    #[test]
    fn test_early_departure() {
        let end = make_datetime("2025-02-03", "17:00:00");
        assert_eq!(early_departure_minutes(end, make_datetime("2025-02-03", "16:30:00")), 30);
        assert_eq!(early_departure_minutes(end, make_datetime("2025-02-03", "17:30:00")), 0);
    }

    #[test]
    fn test_split_under_schedule() {
        let split = split_hours(dec("6.5"), dec("8"));
        assert_eq!(split.regular_hours, dec("6.5"));
        assert_eq!(split.overtime_hours, Decimal::ZERO);
        assert_eq!(split.undertime_hours, dec("1.5"));
    }

    #[test]
    fn test_absent_breakdown() {
        let absent = HoursBreakdown::absent(dec("11"));
        assert_eq!(absent.worked_hours, Decimal::ZERO);
        assert_eq!(absent.undertime_hours, dec("11"));
    }
}
