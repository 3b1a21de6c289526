//! Attendance and leave accounting engine
//!
//! This crate keeps the attendance and leave books for an employer bound by the
//! Kenyan Employment Act 2007: a holiday calendar with working-day arithmetic,
//! clock-event time accounting, statutory leave entitlement rules, a per-year
//! leave balance ledger and the leave approval workflow that drives it.
//!
//! [`service::HrService`] ties the components together behind one facade and
//! [`api`] exposes that facade over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod ledger;
pub mod models;
pub mod service;
pub mod timekeeping;
pub mod workflow;
