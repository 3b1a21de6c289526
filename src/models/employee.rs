//! Employee profile and related types.
//!
//! The engine never mutates an employee profile; it reads one to evaluate
//! entitlement eligibility (tenure, gender) and to resolve the work schedule
//! for attendance.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An employee's recorded gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Any other recorded gender.
    Other,
}

/// The shift an employee is rostered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftAssignment {
    /// Station day shift.
    Day,
    /// Station night shift, crossing midnight.
    Night,
    /// No shift rotation (office hours).
    None,
}

impl ShiftAssignment {
    /// Returns the configuration key for this shift.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftAssignment::Day => "day",
            ShiftAssignment::Night => "night",
            ShiftAssignment::None => "none",
        }
    }
}

/// Represents an employee as seen by the attendance and leave core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Unique identifier for the employee.
    pub id: String,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// The employee's gender, when recorded.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// The rostered shift.
    pub shift: ShiftAssignment,
    /// The work location code (e.g. "head_office", "dandora").
    pub location: String,
}

impl EmployeeProfile {
    /// Creates a profile.
    pub fn new(
        id: impl Into<String>,
        hire_date: NaiveDate,
        gender: Option<Gender>,
        shift: ShiftAssignment,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            hire_date,
            gender,
            shift,
            location: location.into(),
        }
    }

    /// Returns the number of completed months of service on `as_of`.
    ///
    /// A month only counts once its day-of-month anniversary has been reached.
    /// Dates before the hire date yield zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::{EmployeeProfile, ShiftAssignment};
    /// use chrono::NaiveDate;
    ///
    /// let employee = EmployeeProfile {
    ///     id: "emp_001".to_string(),
    ///     hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     gender: None,
    ///     shift: ShiftAssignment::None,
    ///     location: "head_office".to_string(),
    /// };
    /// let as_of = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    /// assert_eq!(employee.months_of_service(as_of), 13);
    /// ```
    pub fn months_of_service(&self, as_of: NaiveDate) -> u32 {
        if as_of <= self.hire_date {
            return 0;
        }
        let years = as_of.year() - self.hire_date.year();
        let mut months = years * 12 + as_of.month() as i32 - self.hire_date.month() as i32;
        if as_of.day() < self.hire_date.day() {
            months -= 1;
        }
        months.max(0) as u32
    }
}
