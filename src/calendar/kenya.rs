//! Kenya's fixed-date public holidays.

use chrono::NaiveDate;

use crate::models::{Holiday, SaturdayRule};

/// Fixed-date public holidays under the Public Holidays Act: (name, month, day).
///
/// This table seeds calendars built without a configuration directory. A
/// configured jurisdiction lists every holiday for the year, fixed and
/// movable, in its `holidays/*.yaml` files and is not combined with this
/// table.
pub const KENYA_FIXED_HOLIDAYS: [(&str, u32, u32); 7] = [
    ("New Year's Day", 1, 1),
    ("Labour Day", 5, 1),
    ("Madaraka Day", 6, 1),
    ("Mashujaa Day", 10, 20),
    ("Jamhuri Day", 12, 12),
    ("Christmas Day", 12, 25),
    ("Boxing Day", 12, 26),
];

/// Generates Kenya's fixed-date public holidays for a year.
///
/// Weekend dates are observed on the following Monday.
///
/// # Example
///
/// ```
/// use leave_engine::calendar::kenya_public_holidays;
///
/// let holidays = kenya_public_holidays(2025);
/// assert_eq!(holidays.len(), 7);
/// assert_eq!(holidays[0].name, "New Year's Day");
/// ```
pub fn kenya_public_holidays(year: i32) -> Vec<Holiday> {
    KENYA_FIXED_HOLIDAYS
        .iter()
        .filter_map(|&(name, month, day)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|date| Holiday::new(name, date, SaturdayRule::FollowingMonday))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_madaraka_day_2025_falls_on_sunday() {
        let holidays = kenya_public_holidays(2025);
        let madaraka = holidays.iter().find(|h| h.name == "Madaraka Day").unwrap();

        assert!(madaraka.is_weekend());
        assert_eq!(
            madaraka.observed_date,
            NaiveDate::from_ymd_opt(2025, 6, 2)
        );
    }

    #[test]
    fn test_all_holidays_in_requested_year() {
        for holiday in kenya_public_holidays(2030) {
            assert_eq!(chrono::Datelike::year(&holiday.date), 2030);
            assert!(holiday.active);
            assert!(holiday.locations.is_empty());
        }
    }
}
