//! Error types for the leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts an attendance or leave operation.
//! Insufficient notice is not an error: it is advisory and travels
//! as a [`Finding`](crate::entitlement::Finding) alongside a successful result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the leave engine.
///
/// Every variant except the configuration ones is raised before any state
/// mutation, so a caller that receives one can assume nothing was written.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "leave_request",
///     id: "LR20250013".to_string(),
/// };
/// assert_eq!(error.to_string(), "leave_request not found: LR20250013");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input, e.g. an end date before the start date.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A statutory cap or eligibility rule blocks the request.
    #[error("{leave_type} request violates entitlement rules: {}", .messages.join("; "))]
    EntitlementExceeded {
        /// The leave type being requested.
        leave_type: String,
        /// Messages of every error-severity finding.
        messages: Vec<String>,
    },

    /// The balance ledger cannot hold the requested days.
    #[error("Insufficient {leave_type} balance: requested {requested} days, {available} available")]
    InsufficientBalance {
        /// The leave type of the account.
        leave_type: String,
        /// Days requested.
        requested: Decimal,
        /// Days still available on the account.
        available: Decimal,
    },

    /// An attendance record already exists for the key.
    #[error("Attendance already recorded for employee '{employee_id}' on {date}")]
    DuplicateRecord {
        /// The employee identifier.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The action is not valid from the current state.
    #[error("Cannot {action} from state '{from}'")]
    InvalidTransition {
        /// The attempted action.
        action: String,
        /// The state the entity was in.
        from: String,
    },

    /// An employee, request or record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A commit, release or refund larger than what the account holds.
    #[error("Cannot remove {requested} days from {bucket} days; account holds {held}")]
    LedgerUnderflow {
        /// The bucket being decremented ("reserved" or "consumed").
        bucket: &'static str,
        /// Days the operation tried to remove.
        requested: Decimal,
        /// Days currently in the bucket.
        held: Decimal,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::InvalidTransition`] error.
    pub fn invalid_transition(action: impl Into<String>, from: impl ToString) -> Self {
        EngineError::InvalidTransition {
            action: action.into(),
            from: from.to_string(),
        }
    }

    /// Returns the stable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::EntitlementExceeded { .. } => "ENTITLEMENT_EXCEEDED",
            EngineError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            EngineError::DuplicateRecord { .. } => "DUPLICATE_RECORD",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::LedgerUnderflow { .. } => "LEDGER_UNDERFLOW",
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
