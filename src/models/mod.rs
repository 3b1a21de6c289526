//! Core data models for the leave engine.
//!
//! This module contains the domain models shared by attendance accounting,
//! entitlement validation, the balance ledger and the leave workflow.

mod attendance;
mod balance;
mod employee;
mod holiday;
mod leave_request;

pub use attendance::{AttendanceRecord, AttendanceStatus, BreakPeriod, ClockMethod, WorkSchedule};
pub use balance::{Availability, BalanceAccount, BalanceKey};
pub use employee::{EmployeeProfile, Gender, ShiftAssignment};
pub use holiday::{Holiday, SaturdayRule, weekend_shift};
pub use leave_request::{
    LeaveRequest, LeaveStatus, LeaveType, WorkflowAction, WorkflowEntry, calendar_days,
    format_request_number,
};
pub(crate) use leave_request::add_days;
