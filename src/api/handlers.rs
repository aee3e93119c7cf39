//! HTTP request handlers for the attendance engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{RecordIndex, analyze, months_in_term, simulate};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{AnalysisResult, AuditTrace, Policy, PolicySpec, ProjectionResult};

use super::request::{AnalyzeRequest, ProjectRequest, TermMonthsQuery};
use super::response::{ApiError, ApiErrorResponse, PolicyResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/project", post(project_handler))
        .route("/term/months", get(term_months_handler))
        .route("/policy", get(policy_handler))
        .with_state(state)
}

/// Handler for POST /analyze endpoint.
///
/// Merges the monthly batches, classifies every record and returns the
/// metrics, day listings and lookup table.
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing analysis request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json_rejection_error(rejection, correlation_id),
            );
        }
    };

    let batch_count = request.batches.len();
    match perform_analysis(request, state.config()) {
        Ok(result) => {
            for warning in result
                .audit_trace
                .warnings
                .iter()
                .filter(|w| matches!(w.code.as_str(), "INVALID_RECORD" | "UNREADABLE_TIMESTAMP"))
            {
                warn!(
                    correlation_id = %correlation_id,
                    code = %warning.code,
                    reason = %warning.message,
                    "Record not fully readable"
                );
            }
            info!(
                correlation_id = %correlation_id,
                batches = batch_count,
                records = result.records.len(),
                current_score = %result.metrics.current_score,
                duration_us = result.audit_trace.duration_us,
                "Analysis completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Analysis failed"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /project endpoint.
///
/// Recomputes the projected grade from the supplied base metrics.
async fn project_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json_rejection_error(rejection, correlation_id),
            );
        }
    };

    match perform_projection(request, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                clamped = result.clamped,
                projected_score = %result.metrics.projected_score,
                outlook = ?result.outlook,
                duration_us = result.audit_trace.duration_us,
                "Projection completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Projection failed"
            );
            error_response(err)
        }
    }
}

/// Handler for GET /term/months endpoint.
///
/// Lists the months from the start of the term through `today`.
async fn term_months_handler(
    State(state): State<AppState>,
    query: Result<Query<TermMonthsQuery>, QueryRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Query string rejected"
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    let Some(today) = query.today else {
        warn!(correlation_id = %correlation_id, "Term months requested without today");
        return error_response(EngineError::MissingContext {
            what: "today".to_string(),
        });
    };

    let months = months_in_term(state.config().policy(), today);
    info!(
        correlation_id = %correlation_id,
        today = %today,
        months = months.len(),
        "Listed term months"
    );
    json_response(StatusCode::OK, months)
}

/// Handler for GET /policy endpoint.
async fn policy_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();
    json_response(
        StatusCode::OK,
        PolicyResponse {
            program: config.program().clone(),
            policy: config.policy().clone(),
        },
    )
}

/// Runs the analysis pipeline for one request.
fn perform_analysis(request: AnalyzeRequest, config: &ConfigLoader) -> EngineResult<AnalysisResult> {
    let start_time = Instant::now();

    let today = request.today.ok_or_else(|| EngineError::MissingContext {
        what: "today".to_string(),
    })?;
    let policy = resolve_policy(request.policy, config)?;

    let index = RecordIndex::from_batches(request.batches);
    let analysis = analyze(index, &policy, today);
    let records = analysis.index.lookup_table();

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(AnalysisResult {
        analysis_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        student_id: request.student_id,
        as_of: today,
        metrics: analysis.metrics,
        late_days: analysis.late_days,
        vacation_days: analysis.vacation_days,
        missing_days: analysis.missing_days,
        records,
        audit_trace: AuditTrace {
            steps: analysis.steps,
            warnings: analysis.warnings,
            duration_us,
        },
    })
}

/// Runs one simulator recomputation for a request.
fn perform_projection(
    request: ProjectRequest,
    config: &ConfigLoader,
) -> EngineResult<ProjectionResult> {
    let start_time = Instant::now();
    let policy = resolve_policy(request.policy, config)?;

    let mut result = simulate(&request.base, &policy, request.delta, request.changed)?;
    result.audit_trace.duration_us = start_time.elapsed().as_micros() as u64;

    Ok(result)
}

/// Picks the request's policy override if present, else the configured one.
fn resolve_policy(policy: Option<PolicySpec>, config: &ConfigLoader) -> EngineResult<Policy> {
    match policy {
        Some(spec) => Policy::try_from(spec),
        None => Ok(config.policy().clone()),
    }
}

/// Maps a JSON body rejection to an API error.
fn json_rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
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
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}
