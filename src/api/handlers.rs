//! HTTP request handlers for the leave engine API.
//!
//! Every handler tags its log lines with a fresh correlation id, calls one
//! [`HrService`](crate::service::HrService) operation and maps the outcome to
//! a JSON response.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;
use crate::workflow::LeaveApplication;

use super::request::{
    BreakRequest, CancelRequest, ClockInRequest, ClockOutRequest, ComplianceQuery,
    CorrectClockRequest, DecisionRequest, ExtendRequest, MarkAttendanceRequest,
    ReturnEarlyRequest, SummaryQuery,
};
use super::response::{
    ApiError, ApiErrorResponse, BalanceResponse, ComplianceResponse, CoverageResponse,
    SummaryResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/leave-requests", post(submit_leave_handler))
        .route("/leave-requests/:number", get(get_leave_handler))
        .route(
            "/leave-requests/:number/supervisor-decision",
            post(supervisor_decision_handler),
        )
        .route("/leave-requests/:number/hr-decision", post(hr_decision_handler))
        .route("/leave-requests/:number/cancel", post(cancel_handler))
        .route("/leave-requests/:number/extend", post(extend_handler))
        .route("/leave-requests/:number/return-early", post(return_early_handler))
        .route(
            "/employees/:employee_id/leave-requests",
            get(employee_requests_handler),
        )
        .route(
            "/employees/:employee_id/leave-coverage/:date",
            get(coverage_handler),
        )
        .route("/employees/:employee_id/balances/:year", get(statement_handler))
        .route(
            "/employees/:employee_id/balances/:year/:leave_type",
            get(balance_handler),
        )
        .route(
            "/employees/:employee_id/attendance/:date",
            get(attendance_record_handler),
        )
        .route("/attendance/clock-in", post(clock_in_handler))
        .route("/attendance/clock-out", post(clock_out_handler))
        .route("/attendance/breaks", post(break_handler))
        .route("/attendance/mark", post(mark_handler))
        .route("/attendance/correct", post(correct_handler))
        .route("/attendance/summary", get(summary_handler))
        .route("/reports/compliance", get(compliance_handler))
        .with_state(state)
}

/// Handler for POST /leave-requests.
async fn submit_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave submission");

    let application = match parse_json(correlation_id, payload) {
        Ok(application) => application,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "submit_leave_request",
        StatusCode::CREATED,
        state.service().submit_leave_request(&application),
    )
}

/// Handler for GET /leave-requests/:number.
async fn get_leave_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "get_leave_request",
        StatusCode::OK,
        state.service().get_leave_request(&number),
    )
}

/// Handler for POST /leave-requests/:number/supervisor-decision.
async fn supervisor_decision_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, request = %number, "Processing supervisor decision");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "decide_supervisor",
        StatusCode::OK,
        state
            .service()
            .decide_supervisor(&number, body.decision, &body.actor_id, body.note),
    )
}

/// Handler for POST /leave-requests/:number/hr-decision.
async fn hr_decision_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
    payload: Result<Json<DecisionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, request = %number, "Processing HR decision");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "decide_hr",
        StatusCode::OK,
        state
            .service()
            .decide_hr(&number, body.decision, &body.actor_id, body.note),
    )
}

/// Handler for POST /leave-requests/:number/cancel.
async fn cancel_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, request = %number, "Processing cancellation");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "cancel_leave_request",
        StatusCode::OK,
        state
            .service()
            .cancel_leave_request(&number, &body.actor_id, body.reason),
    )
}

/// Handler for POST /leave-requests/:number/extend.
async fn extend_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
    payload: Result<Json<ExtendRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, request = %number, "Processing extension");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "extend_leave_request",
        StatusCode::OK,
        state.service().extend_leave_request(
            &number,
            body.additional_days,
            &body.actor_id,
            body.reason,
        ),
    )
}

/// Handler for POST /leave-requests/:number/return-early.
async fn return_early_handler(
    State(state): State<AppState>,
    Path(number): Path<String>,
    payload: Result<Json<ReturnEarlyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, request = %number, "Processing early return");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "return_early",
        StatusCode::OK,
        state.service().return_early(
            &number,
            body.actual_end_date,
            &body.actor_id,
            body.reason,
        ),
    )
}

/// Handler for GET /employees/:employee_id/leave-requests.
async fn employee_requests_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "leave_requests_for",
        StatusCode::OK,
        Ok(state.service().leave_requests_for(&employee_id)),
    )
}

/// Handler for GET /employees/:employee_id/leave-coverage/:date.
async fn coverage_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .service()
        .leave_coverage(&employee_id, date)
        .map(|request| CoverageResponse {
            employee_id: employee_id.clone(),
            date,
            covered: request.is_some(),
            request,
        });
    respond(correlation_id, "leave_coverage", StatusCode::OK, result)
}

/// Handler for GET /employees/:employee_id/balances/:year.
async fn statement_handler(
    State(state): State<AppState>,
    Path((employee_id, year)): Path<(String, i32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "balance_statement",
        StatusCode::OK,
        state.service().balance_statement(&employee_id, year),
    )
}

/// Handler for GET /employees/:employee_id/balances/:year/:leave_type.
async fn balance_handler(
    State(state): State<AppState>,
    Path((employee_id, year, leave_type)): Path<(String, i32, LeaveType)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .service()
        .query_balance(&employee_id, leave_type, year)
        .map(|availability| BalanceResponse {
            employee_id: employee_id.clone(),
            leave_type,
            year,
            availability,
        });
    respond(correlation_id, "query_balance", StatusCode::OK, result)
}

/// Handler for GET /employees/:employee_id/attendance/:date.
async fn attendance_record_handler(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "attendance_record",
        StatusCode::OK,
        state.service().attendance_record(&employee_id, date),
    )
}

/// Handler for POST /attendance/clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockInRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-in");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "clock_in",
        StatusCode::OK,
        state
            .service()
            .clock_in(&body.employee_id, body.timestamp, body.method),
    )
}

/// Handler for POST /attendance/clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockOutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-out");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "clock_out",
        StatusCode::OK,
        state.service().clock_out(&body.employee_id, body.timestamp),
    )
}

/// Handler for POST /attendance/breaks.
async fn break_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreakRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "record_break",
        StatusCode::OK,
        state.service().record_break(
            &body.employee_id,
            body.date,
            body.period.start,
            body.period.end,
        ),
    )
}

/// Handler for POST /attendance/mark.
async fn mark_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "mark_attendance",
        StatusCode::OK,
        state.service().mark_attendance(
            &body.employee_id,
            body.date,
            body.status,
            body.notes,
            &body.actor_id,
        ),
    )
}

/// Handler for POST /attendance/correct.
async fn correct_handler(
    State(state): State<AppState>,
    payload: Result<Json<CorrectClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock correction");

    let body = match parse_json(correlation_id, payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "correct_clock",
        StatusCode::OK,
        state.service().correct_clock(
            &body.employee_id,
            body.date,
            body.correction,
            &body.actor_id,
            body.reason,
        ),
    )
}

/// Handler for GET /attendance/summary.
async fn summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return reject_query(correlation_id, rejection),
    };
    let result = state
        .service()
        .attendance_summary(query.employee_id.as_deref(), query.start, query.end)
        .map(SummaryResponse::from);
    respond(correlation_id, "attendance_summary", StatusCode::OK, result)
}

/// Handler for GET /reports/compliance.
async fn compliance_handler(
    State(state): State<AppState>,
    query: Result<Query<ComplianceQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return reject_query(correlation_id, rejection),
    };
    let result = state
        .service()
        .compliance_report(query.year)
        .map(ComplianceResponse::from);
    respond(correlation_id, "compliance_report", StatusCode::OK, result)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a service outcome to a response, logging it under the correlation id.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                "Request completed successfully"
            );
            json_response(status, body)
        }
        Err(err) => engine_error(correlation_id, operation, err),
    }
}

fn engine_error(correlation_id: Uuid, operation: &'static str, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation,
        code = err.code(),
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Unwraps a JSON body, or builds the 400 response for a rejected one.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    let response = ApiErrorResponse::bad_request(error);
    Err(json_response(response.status, response.error))
}

fn reject_query(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let message = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %message,
        "Query string error"
    );
    let response = ApiErrorResponse::bad_request(ApiError::validation_error(message));
    json_response(response.status, response.error)
}
