//! Policy configuration for the leave engine.
//!
//! This module loads a jurisdiction's attendance policy, statutory leave rule
//! table, approval thresholds and holidays from YAML files. The resulting
//! [`PolicyConfig`] is injected into the accounting and workflow components.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/kenya").unwrap();
//! println!("Loaded jurisdiction: {}", loader.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApprovalPolicy, AttendancePolicy, EntitlementPeriod, GenderRestriction, HolidayEntry,
    HolidaysFile, JurisdictionMetadata, LeaveRule, LeaveRulesConfig, LocationConfig,
    OvertimeMultipliers, PolicyConfig,
};
