//! Configuration types for attendance and leave policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, together with the
//! built-in Kenyan defaults returned by [`PolicyConfig::default`].

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{Holiday, LeaveType, SaturdayRule, ShiftAssignment, WorkSchedule};

/// Metadata about the governing jurisdiction.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionMetadata {
    /// A short code for the statute (e.g. "KE-EA-2007").
    pub code: String,
    /// The human-readable name of the statute.
    pub name: String,
    /// The version or effective date of the rule set.
    pub version: String,
    /// URL to the official statute text.
    pub source_url: String,
}

/// Informational overtime multipliers.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeMultipliers {
    /// Multiplier on an ordinary working day.
    pub ordinary: Decimal,
    /// Multiplier on an observed public holiday.
    pub public_holiday: Decimal,
    /// Multiplier for night-shift work.
    pub night_shift: Decimal,
}

/// A work location and its schedules per shift.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// The human-readable name of the location.
    pub name: String,
    /// Schedules keyed by shift.
    pub schedules: HashMap<ShiftAssignment, WorkSchedule>,
}

/// Attendance policy from attendance.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendancePolicy {
    /// Minutes after the scheduled start before an arrival counts as late.
    pub grace_period_minutes: u32,
    /// Overtime multipliers.
    pub overtime_multipliers: OvertimeMultipliers,
    /// Schedule used when a location or shift is not configured.
    pub default_schedule: WorkSchedule,
    /// Work locations keyed by location code.
    #[serde(default)]
    pub locations: HashMap<String, LocationConfig>,
}

impl AttendancePolicy {
    /// Resolves the schedule for an employee's location and shift.
    ///
    /// Falls back to the location's `none` schedule, then to the default
    /// schedule.
    pub fn schedule_for(&self, location: &str, shift: ShiftAssignment) -> WorkSchedule {
        self.locations
            .get(location)
            .and_then(|l| {
                l.schedules
                    .get(&shift)
                    .or_else(|| l.schedules.get(&ShiftAssignment::None))
            })
            .copied()
            .unwrap_or(self.default_schedule)
    }
}

/// Whether a leave entitlement resets yearly or per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPeriod {
    /// Entitlement per calendar year.
    PerYear,
    /// Entitlement per occurrence (e.g. per birth).
    PerOccurrence,
}

impl EntitlementPeriod {
    /// Returns the phrase used in findings, e.g. "per year".
    pub fn as_phrase(&self) -> &'static str {
        match self {
            EntitlementPeriod::PerYear => "per year",
            EntitlementPeriod::PerOccurrence => "per occurrence",
        }
    }
}

/// Gender eligibility for a leave type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderRestriction {
    /// Open to everyone.
    #[default]
    None,
    /// Female employees only.
    FemaleOnly,
    /// Male employees only.
    MaleOnly,
}

/// The statutory rule for one leave type.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRule {
    /// Maximum days per period; `None` means no statutory limit.
    pub max_days: Option<Decimal>,
    /// The period `max_days` applies to.
    pub period: EntitlementPeriod,
    /// Minimum notice in days.
    #[serde(default)]
    pub notice_days: u32,
    /// Gender eligibility.
    #[serde(default)]
    pub gender: GenderRestriction,
    /// A certificate is required when more than this many days are requested.
    #[serde(default)]
    pub certificate_after_days: Option<u32>,
    /// A certificate is required regardless of length.
    #[serde(default)]
    pub certificate_always: bool,
    /// Months of service required for the full entitlement.
    #[serde(default)]
    pub min_tenure_months: u32,
    /// Below the tenure requirement, accrue `max_days / 12` per completed month.
    #[serde(default)]
    pub pro_rata_before_tenure: bool,
    /// Whether the balance ledger caps this type.
    #[serde(default)]
    pub balance_capped: bool,
    /// Citation of the statutory provision.
    pub citation: String,
}

/// Thresholds that route an approved request to HR.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalPolicy {
    /// Leave types that always require HR approval.
    pub hr_required_types: Vec<LeaveType>,
    /// Sick leave longer than this requires HR approval.
    pub sick_hr_threshold_days: u32,
    /// Any request longer than this requires HR approval.
    pub general_hr_threshold_days: u32,
}

/// Leave rule configuration from leave_rules.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRulesConfig {
    /// The rule table keyed by leave type.
    pub rules: HashMap<LeaveType, LeaveRule>,
    /// Approval routing thresholds.
    pub approval: ApprovalPolicy,
}

/// One holiday entry in a holidays/*.yaml file.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayEntry {
    /// The holiday name.
    pub name: String,
    /// The nominal date.
    pub date: NaiveDate,
    /// Saturday observance rule.
    #[serde(default)]
    pub saturday_rule: SaturdayRule,
    /// Whether weekend shifting applies.
    #[serde(default = "default_true")]
    pub observed: bool,
    /// Locations the holiday is restricted to.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Inactive entries are kept for history but never match.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl From<HolidayEntry> for Holiday {
    fn from(entry: HolidayEntry) -> Self {
        let mut holiday = Holiday::with_options(
            entry.name,
            entry.date,
            entry.saturday_rule,
            entry.observed,
            entry.locations,
        );
        holiday.active = entry.active;
        holiday
    }
}

/// Holidays file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysFile {
    /// The holidays in this file.
    pub holidays: Vec<HolidayEntry>,
}

/// The complete policy configuration.
///
/// This is the explicit configuration object injected into the time
/// accounting, entitlement and workflow components.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    metadata: JurisdictionMetadata,
    attendance: AttendancePolicy,
    leave_rules: LeaveRulesConfig,
    holidays: Vec<Holiday>,
}

impl PolicyConfig {
    /// Creates a new PolicyConfig from its component parts.
    pub fn new(
        metadata: JurisdictionMetadata,
        attendance: AttendancePolicy,
        leave_rules: LeaveRulesConfig,
        holidays: Vec<Holiday>,
    ) -> Self {
        let mut sorted_holidays = holidays;
        sorted_holidays.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            metadata,
            attendance,
            leave_rules,
            holidays: sorted_holidays,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.attendance
    }

    /// Returns the leave rule table and approval thresholds.
    pub fn leave_rules(&self) -> &LeaveRulesConfig {
        &self.leave_rules
    }

    /// Returns the configured holidays, oldest first.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns a copy with a different grace period.
    pub fn with_grace_period(mut self, minutes: u32) -> Self {
        self.attendance.grace_period_minutes = minutes;
        self
    }

    /// Returns a copy with the given holidays.
    pub fn with_holidays(self, holidays: Vec<Holiday>) -> Self {
        Self::new(self.metadata, self.attendance, self.leave_rules, holidays)
    }
}

impl Default for PolicyConfig {
    /// The Kenyan Employment Act 2007 policy shipped in `config/kenya`,
    /// without movable holidays.
    fn default() -> Self {
        Self::new(
            kenya_metadata(),
            kenya_attendance(),
            kenya_leave_rules(),
            Vec::new(),
        )
    }
}

fn kenya_metadata() -> JurisdictionMetadata {
    JurisdictionMetadata {
        code: "KE-EA-2007".to_string(),
        name: "Employment Act 2007 (Kenya)".to_string(),
        version: "2025-01-01".to_string(),
        source_url: "http://kenyalaw.org/kl/fileadmin/pdfdownloads/Acts/EmploymentAct_Cap226-No11of2007_01.pdf"
            .to_string(),
    }
}

fn schedule(start: (u32, u32), end: (u32, u32), unpaid_break_minutes: u32) -> WorkSchedule {
    WorkSchedule {
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
        unpaid_break_minutes,
    }
}

fn kenya_attendance() -> AttendancePolicy {
    let office = schedule((8, 0), (17, 0), 60);
    let station = |name: &str| LocationConfig {
        name: name.to_string(),
        schedules: HashMap::from([
            (ShiftAssignment::Day, schedule((6, 0), (18, 0), 60)),
            (ShiftAssignment::Night, schedule((18, 0), (6, 0), 60)),
        ]),
    };

    AttendancePolicy {
        grace_period_minutes: 15,
        overtime_multipliers: OvertimeMultipliers {
            ordinary: Decimal::new(15, 1),
            public_holiday: Decimal::new(20, 1),
            night_shift: Decimal::new(125, 2),
        },
        default_schedule: office,
        locations: HashMap::from([
            (
                "head_office".to_string(),
                LocationConfig {
                    name: "Head Office".to_string(),
                    schedules: HashMap::from([(ShiftAssignment::None, office)]),
                },
            ),
            ("dandora".to_string(), station("Dandora Station")),
            ("tassia".to_string(), station("Tassia Station")),
            ("kiambu".to_string(), station("Kiambu Station")),
        ]),
    }
}

#[allow(clippy::too_many_arguments)]
fn rule(
    max_days: Option<i64>,
    period: EntitlementPeriod,
    notice_days: u32,
    gender: GenderRestriction,
    certificate_after_days: Option<u32>,
    certificate_always: bool,
    min_tenure_months: u32,
    balance_capped: bool,
    citation: &str,
) -> LeaveRule {
    LeaveRule {
        max_days: max_days.map(|d| Decimal::new(d, 0)),
        period,
        notice_days,
        gender,
        certificate_after_days,
        certificate_always,
        min_tenure_months,
        pro_rata_before_tenure: min_tenure_months > 0,
        balance_capped,
        citation: citation.to_string(),
    }
}

fn kenya_leave_rules() -> LeaveRulesConfig {
    use EntitlementPeriod::{PerOccurrence, PerYear};
    use GenderRestriction as G;

    LeaveRulesConfig {
        rules: HashMap::from([
            (
                LeaveType::AnnualLeave,
                rule(Some(21), PerYear, 14, G::None, None, false, 12, true,
                    "Employment Act 2007, Section 28"),
            ),
            (
                LeaveType::SickLeave,
                rule(Some(14), PerYear, 0, G::None, Some(3), false, 0, true,
                    "Employment Act 2007, Section 30"),
            ),
            (
                LeaveType::MaternityLeave,
                rule(Some(90), PerOccurrence, 30, G::FemaleOnly, None, true, 0, false,
                    "Employment Act 2007, Section 29"),
            ),
            (
                LeaveType::PaternityLeave,
                rule(Some(14), PerOccurrence, 7, G::MaleOnly, None, false, 0, false,
                    "Employment Act 2007, Section 29(8)"),
            ),
            (
                LeaveType::CompassionateLeave,
                rule(Some(7), PerOccurrence, 0, G::None, None, false, 0, false,
                    "Employment Act 2007, Section 31"),
            ),
            (
                LeaveType::StudyLeave,
                rule(Some(30), PerYear, 30, G::None, None, false, 0, false,
                    "Employment Act 2007, Section 32"),
            ),
            (
                LeaveType::UnpaidLeave,
                rule(None, PerOccurrence, 14, G::None, None, false, 0, false,
                    "Employment Act 2007, general provisions"),
            ),
        ]),
        approval: ApprovalPolicy {
            hr_required_types: vec![LeaveType::MaternityLeave, LeaveType::PaternityLeave],
            sick_hr_threshold_days: 7,
            general_hr_threshold_days: 5,
        },
    }
}
