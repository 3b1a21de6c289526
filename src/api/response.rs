//! Response types for the leave engine API.
//!
//! This module defines the response bodies that are not domain types
//! themselves, and the mapping from [`EngineError`] to HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entitlement::ComplianceReport;
use crate::error::EngineError;
use crate::models::{Availability, LeaveRequest, LeaveType};
use crate::timekeeping::AttendanceSummary;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.code();
        let message = error.to_string();
        match error {
            EngineError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(code, message, format!("field: {}", field)),
            },
            EngineError::EntitlementExceeded { messages, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(code, message, messages.join("; ")),
            },
            EngineError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(code, message),
            },
            EngineError::InsufficientBalance { .. }
            | EngineError::DuplicateRecord { .. }
            | EngineError::InvalidTransition { .. }
            | EngineError::LedgerUnderflow { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(code, message),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    code,
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    code,
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

/// Body of `GET /employees/:id/balances/:year/:leave_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// The employee.
    pub employee_id: String,
    /// The leave type.
    pub leave_type: LeaveType,
    /// The ledger year.
    pub year: i32,
    /// What the account still allows.
    pub availability: Availability,
}

/// Body of `GET /employees/:id/leave-coverage/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    /// The employee.
    pub employee_id: String,
    /// The date asked about.
    pub date: NaiveDate,
    /// True when an approved request covers the date.
    pub covered: bool,
    /// The covering request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<LeaveRequest>,
}

/// Body of `GET /attendance/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The counts by status.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    /// Share of records that attended, as a percentage.
    pub attendance_rate: Decimal,
}

impl From<AttendanceSummary> for SummaryResponse {
    fn from(summary: AttendanceSummary) -> Self {
        Self {
            attendance_rate: summary.attendance_rate(),
            summary,
        }
    }
}

/// Body of `GET /reports/compliance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceResponse {
    /// The report.
    #[serde(flatten)]
    pub report: ComplianceReport,
    /// Requests with at least one blocking finding.
    pub violation_count: usize,
    /// Share of compliant requests, as a percentage.
    pub compliance_rate: Decimal,
}

impl From<ComplianceReport> for ComplianceResponse {
    fn from(report: ComplianceReport) -> Self {
        Self {
            violation_count: report.violation_count(),
            compliance_rate: report.compliance_rate(),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_entitlement_error_maps_to_400_with_findings() {
        let api_error: ApiErrorResponse = EngineError::EntitlementExceeded {
            leave_type: "annual_leave".to_string(),
            messages: vec!["exceeds 21 days".to_string()],
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "ENTITLEMENT_EXCEEDED");
        assert_eq!(api_error.error.details.as_deref(), Some("exceeds 21 days"));
    }

    #[test]
    fn test_engine_error_status_codes() {
        let cases = [
            (
                EngineError::NotFound {
                    entity: "leave_request",
                    id: "LR20250001".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::invalid_transition("cancel", "rejected"),
                StatusCode::CONFLICT,
            ),
            (
                EngineError::InsufficientBalance {
                    leave_type: "annual_leave".to_string(),
                    requested: Decimal::new(5, 0),
                    available: Decimal::new(2, 0),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::ConfigNotFound {
                    path: "jurisdiction.yaml".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let api_error: ApiErrorResponse = error.into();
            assert_eq!(api_error.status, status);
        }
    }
}
