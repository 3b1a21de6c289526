//! Holiday calendar and working-day arithmetic.
//!
//! The [`HolidayCalendar`] is the authoritative source of non-working days.
//! It resolves each holiday's observed date once, when the holiday is added,
//! and guarantees that at any location at most one active holiday resolves
//! to a given observed date.

mod kenya;

#[cfg(test)]
mod calendar_props;

pub use kenya::{KENYA_FIXED_HOLIDAYS, kenya_public_holidays};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

use crate::config::PolicyConfig;
use crate::models::Holiday;

/// Returns true if the date is a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A source of holiday records, such as a configuration file or a database.
pub trait HolidayStore {
    /// Returns every holiday the store knows about.
    fn holidays(&self) -> Vec<Holiday>;
}

impl HolidayStore for Vec<Holiday> {
    fn holidays(&self) -> Vec<Holiday> {
        self.clone()
    }
}

impl HolidayStore for PolicyConfig {
    fn holidays(&self) -> Vec<Holiday> {
        PolicyConfig::holidays(self).to_vec()
    }
}

/// The set of holidays consulted by attendance and leave accounting.
///
/// # Example
///
/// ```
/// use leave_engine::calendar::HolidayCalendar;
/// use leave_engine::models::{Holiday, SaturdayRule};
/// use chrono::NaiveDate;
///
/// let calendar = HolidayCalendar::new(vec![Holiday::new(
///     "Labour Day",
///     NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     SaturdayRule::FollowingMonday,
/// )]);
///
/// let start = NaiveDate::from_ymd_opt(2025, 4, 28).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
/// assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()));
/// assert_eq!(calendar.working_day_count(start, end), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: Vec<Holiday>,
    by_observed_date: BTreeMap<NaiveDate, Vec<usize>>,
}

impl HolidayCalendar {
    /// Builds a calendar from a set of holiday records.
    ///
    /// National holidays are resolved before location-restricted ones. Within
    /// each group, holidays observed on their nominal date claim their dates
    /// first, then weekend-shifted holidays are resolved, both in date order.
    pub fn new(mut holidays: Vec<Holiday>) -> Self {
        holidays.sort_by_key(|h| (!h.is_national(), h.observed_date.is_some(), h.date));

        let mut calendar = Self::default();
        for holiday in holidays {
            calendar.add(holiday);
        }
        calendar
    }

    /// Builds a calendar from every holiday a store holds.
    pub fn from_store(store: &impl HolidayStore) -> Self {
        Self::new(store.holidays())
    }

    /// Adds a holiday, resolving an observed-date collision.
    ///
    /// If the holiday's effective date is already observed by another
    /// active holiday sharing one of its locations, observance moves forward
    /// to the next weekday that is free at those locations. Holidays for
    /// disjoint locations may share a date. Returns the date the holiday is
    /// observed on.
    pub fn add(&mut self, mut holiday: Holiday) -> NaiveDate {
        if holiday.active {
            let mut date = holiday.effective_date();
            if self.collides(&holiday, date) {
                while is_weekend(date) || self.collides(&holiday, date) {
                    date += Duration::days(1);
                }
                tracing::debug!(
                    holiday = %holiday.name,
                    nominal = %holiday.date,
                    observed = %date,
                    "observed date moved to avoid collision"
                );
                holiday.observed_date = Some(date);
            }
            self.by_observed_date
                .entry(date)
                .or_default()
                .push(self.holidays.len());
        }

        let observed = holiday.effective_date();
        self.holidays.push(holiday);
        observed
    }

    fn collides(&self, holiday: &Holiday, date: NaiveDate) -> bool {
        self.holidays_on(date)
            .any(|other| other.shares_location_with(holiday))
    }

    /// Returns every holiday record, including inactive ones.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns the active holidays observed within a year, in date order.
    pub fn holidays_in_year(&self, year: i32) -> Vec<&Holiday> {
        self.by_observed_date
            .iter()
            .filter(|(date, _)| date.year() == year)
            .flat_map(|(_, indexes)| indexes.iter().map(|&index| &self.holidays[index]))
            .collect()
    }

    /// Returns every active holiday observed on `date`, at any location.
    pub fn holidays_on(&self, date: NaiveDate) -> impl Iterator<Item = &Holiday> {
        self.by_observed_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|&index| &self.holidays[index])
    }

    /// Returns true if an active holiday is observed on `date` at any
    /// location.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.by_observed_date.contains_key(&date)
    }

    /// Returns true if an active holiday applying to `location` is observed
    /// on `date`.
    pub fn is_holiday_at(&self, date: NaiveDate, location: &str) -> bool {
        self.holidays_on(date)
            .any(|h| h.applies_to_location(location))
    }

    /// Returns true if `date` is neither a weekend day nor a holiday.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// Counts working days in `[start, end]`, both endpoints inclusive.
    ///
    /// Returns 0 if `start > end`.
    pub fn working_day_count(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        self.count_days(start, end, |date| self.is_holiday(date))
    }

    /// Counts working days in `[start, end]` for an employee at `location`.
    pub fn working_day_count_at(&self, start: NaiveDate, end: NaiveDate, location: &str) -> u32 {
        self.count_days(start, end, |date| self.is_holiday_at(date, location))
    }

    fn count_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        is_holiday: impl Fn(NaiveDate) -> bool,
    ) -> u32 {
        if start > end {
            return 0;
        }
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| !is_weekend(*date) && !is_holiday(*date))
            .count() as u32
    }
}
