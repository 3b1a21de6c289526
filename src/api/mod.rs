//! HTTP API module for the leave engine.
//!
//! This module exposes the attendance and leave service as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BreakRequest, CancelRequest, ClockInRequest, ClockOutRequest, ComplianceQuery,
    CorrectClockRequest, DecisionRequest, ExtendRequest, MarkAttendanceRequest,
    ReturnEarlyRequest, SummaryQuery,
};
pub use response::{
    ApiError, ApiErrorResponse, BalanceResponse, ComplianceResponse, CoverageResponse,
    SummaryResponse,
};
pub use state::AppState;
