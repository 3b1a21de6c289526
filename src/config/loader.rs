//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a jurisdiction's
//! attendance and leave policy from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, LeaveType, ShiftAssignment, WorkSchedule};

use super::types::{
    AttendancePolicy, HolidaysFile, JurisdictionMetadata, LeaveRule, LeaveRulesConfig,
    PolicyConfig,
};

/// Loads and provides access to policy configuration.
///
/// # Directory Structure
///
/// ```text
/// config/kenya/
/// ├── jurisdiction.yaml   # Statute metadata
/// ├── attendance.yaml     # Grace period, multipliers, location schedules
/// ├── leave_rules.yaml    # Statutory leave rule table and approval routing
/// └── holidays/
///     └── 2025.yaml       # Movable holidays for the year
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
/// use leave_engine::models::LeaveType;
///
/// let loader = ConfigLoader::load("./config/kenya").unwrap();
/// let annual = loader.leave_rule(LeaveType::AnnualLeave).unwrap();
/// println!("Annual leave: {:?} days", annual.max_days);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or lacks a required field. The `holidays/` directory is
    /// optional.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;
        let leave_rules = Self::load_yaml::<LeaveRulesConfig>(&path.join("leave_rules.yaml"))?;
        let holidays = Self::load_holidays(&path.join("holidays"))?;

        for leave_type in LeaveType::ALL {
            if !leave_rules.rules.contains_key(&leave_type) {
                return Err(EngineError::ConfigParseError {
                    path: path.join("leave_rules.yaml").display().to_string(),
                    message: format!("missing rule for {}", leave_type),
                });
            }
        }

        tracing::debug!(
            jurisdiction = %metadata.code,
            holidays = holidays.len(),
            "loaded policy configuration"
        );

        let config = PolicyConfig::new(metadata, attendance, leave_rules, holidays);
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holidays file in the directory, if it exists.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<Holiday>> {
        if !holidays_dir.exists() {
            return Ok(Vec::new());
        }

        let dir_str = holidays_dir.display().to_string();
        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut holidays = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml::<HolidaysFile>(&path)?;
                holidays.extend(file.holidays.into_iter().map(Holiday::from));
            }
        }

        Ok(holidays)
    }

    /// Returns the underlying policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PolicyConfig {
        self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        self.config.metadata()
    }

    /// Gets the statutory rule for a leave type.
    pub fn leave_rule(&self, leave_type: LeaveType) -> EngineResult<&LeaveRule> {
        self.config
            .leave_rules()
            .rules
            .get(&leave_type)
            .ok_or_else(|| EngineError::NotFound {
                entity: "leave rule",
                id: leave_type.to_string(),
            })
    }

    /// Resolves the schedule for a location and shift.
    pub fn schedule_for(&self, location: &str, shift: ShiftAssignment) -> WorkSchedule {
        self.config.attendance().schedule_for(location, shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/kenya"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "KE-EA-2007");
        assert_eq!(loader.metadata().name, "Employment Act 2007 (Kenya)");
    }

    #[test]
    fn test_loaded_attendance_policy() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let attendance = loader.config().attendance();

        assert_eq!(attendance.grace_period_minutes, 15);
        assert_eq!(attendance.overtime_multipliers.ordinary, dec("1.5"));
        assert_eq!(attendance.overtime_multipliers.public_holiday, dec("2.0"));
        assert_eq!(attendance.overtime_multipliers.night_shift, dec("1.25"));
    }

    #[test]
    fn test_loaded_station_night_schedule() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let schedule = loader.schedule_for("tassia", ShiftAssignment::Night);

        assert_eq!(schedule.start, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(schedule.end, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(schedule.unpaid_break_minutes, 60);
    }

    #[test]
    fn test_loaded_rules_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = PolicyConfig::default();

        for leave_type in LeaveType::ALL {
            let loaded = loader.leave_rule(leave_type).unwrap();
            let built_in = &defaults.leave_rules().rules[&leave_type];
            assert_eq!(loaded.max_days, built_in.max_days, "{}", leave_type);
            assert_eq!(loaded.notice_days, built_in.notice_days, "{}", leave_type);
            assert_eq!(loaded.gender, built_in.gender, "{}", leave_type);
            assert_eq!(loaded.balance_capped, built_in.balance_capped, "{}", leave_type);
        }
    }

    #[test]
    fn test_unpaid_leave_has_no_cap() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let unpaid = loader.leave_rule(LeaveType::UnpaidLeave).unwrap();
        assert_eq!(unpaid.max_days, None);
        assert!(!unpaid.balance_capped);
    }

    #[test]
    fn test_loaded_approval_thresholds() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let approval = &loader.config().leave_rules().approval;

        assert_eq!(approval.sick_hr_threshold_days, 7);
        assert_eq!(approval.general_hr_threshold_days, 5);
        assert!(approval.hr_required_types.contains(&LeaveType::MaternityLeave));
    }

    #[test]
    fn test_loaded_holidays_are_sorted_and_resolved() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let holidays = loader.config().holidays();

        assert!(!holidays.is_empty());
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));

        let good_friday = holidays
            .iter()
            .find(|h| h.name == "Good Friday")
            .expect("Good Friday configured");
        assert_eq!(good_friday.date, NaiveDate::from_ymd_opt(2025, 4, 18).unwrap());
    }

    #[test]
    fn test_loaded_holidays_include_each_fixed_holiday_once() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let holidays = loader.config().holidays();

        for fixed in crate::calendar::kenya_public_holidays(2025) {
            let matching = holidays
                .iter()
                .filter(|h| h.name == fixed.name && h.date == fixed.date)
                .count();
            assert_eq!(matching, 1, "{} configured once", fixed.name);
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("jurisdiction.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
