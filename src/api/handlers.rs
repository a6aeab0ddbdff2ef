//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payslip;
use crate::models::{Employee, PayPeriod, RosterEntry};
use crate::run::CancelToken;

use super::request::{PayrollRunRequest, PayslipRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payslip", post(payslip_handler))
        .route("/payroll-run", post(payroll_run_handler))
        .with_state(state)
}

/// Maps a JSON extraction failure onto an [`ApiError`] body.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed serde error
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
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for the POST /payslip endpoint.
///
/// Accepts one employee with a pay structure and returns the computed
/// payslip line item.
async fn payslip_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayslipRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let employee: Employee = request.employee.into();
    let pay_period: PayPeriod = request.pay_period.into();

    let start_time = Instant::now();
    match calculate_payslip(
        &employee,
        &request.structure,
        pay_period,
        state.config().config(),
    ) {
        Ok(item) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                net_pay = %item.totals.net_pay,
                duration_us = duration.as_micros(),
                "Payslip calculated"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(item),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                error = %err,
                "Payslip calculation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}

/// Handler for the POST /payroll-run endpoint.
///
/// Creates a run over the requested roster, processes it, and completes
/// it, returning the finished run including any per-item errors.
async fn payroll_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRunRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let pay_period: PayPeriod = request.pay_period.into();
    let payment_date = request.payment_date;
    let roster: Vec<RosterEntry> = request.roster.into_iter().map(Into::into).collect();
    let roster_size = roster.len();

    let orchestrator = state.orchestrator();
    let start_time = Instant::now();
    // The fan-in barrier blocks, so the run is driven off the async runtime.
    let joined = tokio::task::spawn_blocking(move || {
        let mut run = orchestrator.create(pay_period, payment_date, roster);
        orchestrator.start(&mut run, &CancelToken::new())?;
        orchestrator.finish(&mut run)?;
        Ok::<_, crate::error::EngineError>(run)
    })
    .await;

    let result = match joined {
        Ok(result) => result,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll run task failed"
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                Json(ApiError::new(
                    "INTERNAL_ERROR",
                    "Payroll run task failed unexpectedly",
                )),
            )
                .into_response();
        }
    };

    match result {
        Ok(run) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                run_id = %run.id,
                roster_size,
                items = run.items.len(),
                errors = run.item_errors.len(),
                total = %run.total_amount,
                duration_us = duration.as_micros(),
                "Payroll run completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(run),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll run failed"
            );
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}
