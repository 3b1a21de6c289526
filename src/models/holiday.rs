//! Public holiday model.
//!
//! A holiday carries its nominal calendar date and, when that date falls on a
//! weekend and weekend shifting applies, the observed date on which it is
//! actually non-working. The observed date is resolved once, at creation, and
//! never recomputed afterwards.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Where a holiday landing on a Saturday is observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturdayRule {
    /// Observed on the preceding Friday.
    PrecedingFriday,
    /// Observed on the following Monday.
    #[default]
    FollowingMonday,
}

/// Represents a public or company holiday.
///
/// # Example
///
/// ```
/// use leave_engine::models::{Holiday, SaturdayRule};
/// use chrono::NaiveDate;
///
/// // 2027-12-25 is a Saturday
/// let christmas = Holiday::new(
///     "Christmas Day",
///     NaiveDate::from_ymd_opt(2027, 12, 25).unwrap(),
///     SaturdayRule::FollowingMonday,
/// );
/// assert_eq!(
///     christmas.effective_date(),
///     NaiveDate::from_ymd_opt(2027, 12, 27).unwrap()
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The name of the holiday (e.g. "Madaraka Day").
    pub name: String,
    /// The nominal calendar date.
    pub date: NaiveDate,
    /// The shifted date, present only when the nominal date is a weekend
    /// and the holiday is observed.
    pub observed_date: Option<NaiveDate>,
    /// Whether weekend observance shifting applies.
    pub is_observed: bool,
    /// The Saturday rule used to derive `observed_date`.
    pub saturday_rule: SaturdayRule,
    /// Inactive holidays are kept for history but never match a date.
    pub active: bool,
    /// Locations the holiday applies to; empty means everywhere.
    #[serde(default)]
    pub locations: Vec<String>,
}

impl Holiday {
    /// Creates an active, observed holiday applying to every location.
    pub fn new(name: impl Into<String>, date: NaiveDate, saturday_rule: SaturdayRule) -> Self {
        Self::build(name.into(), date, saturday_rule, true, Vec::new())
    }

    /// Creates a holiday with explicit observance and location settings.
    pub fn with_options(
        name: impl Into<String>,
        date: NaiveDate,
        saturday_rule: SaturdayRule,
        is_observed: bool,
        locations: Vec<String>,
    ) -> Self {
        Self::build(name.into(), date, saturday_rule, is_observed, locations)
    }

    fn build(
        name: String,
        date: NaiveDate,
        saturday_rule: SaturdayRule,
        is_observed: bool,
        locations: Vec<String>,
    ) -> Self {
        let observed_date = if is_observed {
            weekend_shift(date, saturday_rule)
        } else {
            None
        };
        Self {
            name,
            date,
            observed_date,
            is_observed,
            saturday_rule,
            active: true,
            locations,
        }
    }

    /// Returns the date on which the holiday is non-working.
    pub fn effective_date(&self) -> NaiveDate {
        self.observed_date.unwrap_or(self.date)
    }

    /// Returns true if the nominal date falls on a weekend.
    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns true if the holiday applies at `location`.
    pub fn applies_to_location(&self, location: &str) -> bool {
        self.locations.is_empty() || self.locations.iter().any(|l| l == location)
    }

    /// Returns true if the holiday applies everywhere.
    pub fn is_national(&self) -> bool {
        self.locations.is_empty()
    }

    /// Returns true if some location observes both holidays.
    pub fn shares_location_with(&self, other: &Holiday) -> bool {
        self.is_national()
            || other.is_national()
            || self.locations.iter().any(|l| other.locations.contains(l))
    }
}

/// Resolves the weekend-shifted date for a nominal holiday date.
///
/// Returns `None` for weekday dates, which are observed as-is.
pub fn weekend_shift(date: NaiveDate, saturday_rule: SaturdayRule) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => Some(match saturday_rule {
            SaturdayRule::PrecedingFriday => date - Duration::days(1),
            SaturdayRule::FollowingMonday => date + Duration::days(2),
        }),
        Weekday::Sun => Some(date + Duration::days(1)),
        _ => None,
    }
}
