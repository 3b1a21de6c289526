//! Property-based tests for the holiday calendar.
//!
//! - Without holidays, working days are exactly the weekdays
//! - Working-day counts are additive over adjacent ranges
//! - Observed dates are unique and never fall on a weekend

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::{HolidayCalendar, is_weekend};
use crate::models::{Holiday, SaturdayRule};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..730).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn arb_rule() -> impl Strategy<Value = SaturdayRule> {
    prop_oneof![
        Just(SaturdayRule::FollowingMonday),
        Just(SaturdayRule::PrecedingFriday),
    ]
}

fn arb_holiday() -> impl Strategy<Value = Holiday> {
    (arb_date(), arb_rule()).prop_map(|(date, rule)| Holiday::new("Holiday", date, rule))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* range, an empty calendar counts every weekday and no
    /// weekend day.
    #[test]
    fn prop_empty_calendar_counts_weekdays(start in arb_date(), span in 0i64..120) {
        let calendar = HolidayCalendar::default();
        let end = start + Duration::days(span);
        let weekdays = start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !is_weekend(*d))
            .count() as u32;

        prop_assert_eq!(calendar.working_day_count(start, end), weekdays);
    }

    /// *For any* split point inside a range, the counts of the two halves
    /// add up to the count of the whole.
    #[test]
    fn prop_working_day_count_is_additive(
        holidays in prop::collection::vec(arb_holiday(), 0..15),
        start in arb_date(),
        left in 0i64..60,
        right in 1i64..60,
    ) {
        let calendar = HolidayCalendar::new(holidays);
        let middle = start + Duration::days(left);
        let end = middle + Duration::days(right);

        prop_assert_eq!(
            calendar.working_day_count(start, middle)
                + calendar.working_day_count(middle + Duration::days(1), end),
            calendar.working_day_count(start, end)
        );
    }

    /// *For any* set of observed holidays, no two active holidays share an
    /// observed date and none is observed on a weekend.
    #[test]
    fn prop_observed_dates_unique_and_on_weekdays(
        holidays in prop::collection::vec(arb_holiday(), 0..30),
    ) {
        let calendar = HolidayCalendar::new(holidays);
        let mut seen = HashSet::new();

        for holiday in calendar.holidays().iter().filter(|h| h.active) {
            let observed = holiday.effective_date();
            prop_assert!(!is_weekend(observed));
            prop_assert!(seen.insert(observed));
            prop_assert!(calendar.is_holiday(observed));
        }
    }
}
