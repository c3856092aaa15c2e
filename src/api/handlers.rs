//! HTTP request handlers for the evaluation engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Catalog;
use crate::error::EngineError;
use crate::models::{Criterion, EvaluationRecord, Period};
use crate::scoring::{bonus_achieved, build_report, completion_for, next_criterion, target_met};
use crate::store::RecordStore;

use super::request::SubmissionRequest;
use super::response::{
    ApiError, ApiErrorResponse, ResultsResponse, StatusLine, StatusResponse, SubmissionResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluations", post(submit_handler))
        .route("/results", get(results_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Handler for POST /evaluations.
///
/// Accepts a bulk submission by one evaluator for one period, validates
/// every catalog reference, computes the derived scoring fields, and
/// atomically upserts the batch.
async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation submission");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let catalog = state.catalog().catalog();

    let start_time = Instant::now();
    let batch = match build_batch(&request, catalog) {
        Ok(batch) => batch,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                evaluator_id = %request.evaluator_id,
                error = %err,
                "Submission rejected"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let batch_len = batch.len();
    let summary = match state.store().upsert_batch(batch) {
        Ok(summary) => summary,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Batch upsert failed"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        evaluator_id = %request.evaluator_id,
        period = %request.period,
        records = batch_len,
        inserted = summary.inserted,
        replaced = summary.replaced,
        duration_us = start_time.elapsed().as_micros(),
        "Submission stored"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(SubmissionResponse {
            submission_id: correlation_id,
            timestamp: Utc::now(),
            evaluator_id: request.evaluator_id,
            period: request.period,
            inserted: summary.inserted,
            replaced: summary.replaced,
        }),
    )
        .into_response()
}

/// Resolves a submission into a validated record batch.
///
/// Every entry must reference a known evaluator, evaluatee, and
/// criterion; the first unknown reference rejects the whole submission.
fn build_batch(
    request: &SubmissionRequest,
    catalog: &Catalog,
) -> Result<Vec<EvaluationRecord>, EngineError> {
    catalog.get_operator(&request.evaluator_id)?;

    let mut batch = Vec::with_capacity(request.entries.len());
    for entry in &request.entries {
        let criterion_id = entry.criterion_id(request.criterion_id.as_deref())?;
        let criterion = catalog.get_criterion(criterion_id)?;
        catalog.get_operator(&entry.evaluatee_id)?;

        batch.push(EvaluationRecord {
            evaluatee_id: entry.evaluatee_id.clone(),
            evaluator_id: request.evaluator_id.clone(),
            period: request.period,
            criterion_id: criterion.id.clone(),
            achieved_value: entry.achieved_value,
            bonus_achieved: bonus_achieved(criterion, entry.achieved_value),
            target_met: target_met(criterion, entry.achieved_value),
        });
    }
    Ok(batch)
}

/// Query parameters for GET /results.
#[derive(Debug, Deserialize)]
struct ResultsQuery {
    period: String,
    #[serde(default)]
    operator: Option<String>,
}

/// Handler for GET /results.
///
/// Returns consolidated reports for the period, for one operator when
/// `operator` is given, otherwise for every participating operator.
async fn results_handler(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> impl IntoResponse {
    let period: Period = match query.period.parse() {
        Ok(period) => period,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    let catalog = state.catalog().catalog();
    let records = state.store().fetch(period, None);

    let operator_ids: Vec<String> = match query.operator {
        Some(id) => vec![id],
        None => catalog
            .operators()
            .iter()
            .filter(|o| o.active && o.participates_in_evaluation)
            .map(|o| o.id.clone())
            .collect(),
    };

    let mut reports = Vec::with_capacity(operator_ids.len());
    for operator_id in &operator_ids {
        match build_report(catalog, operator_id, period, &records) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(operator_id = %operator_id, error = %err, "Report build failed");
                return ApiErrorResponse::from(err).into_response();
            }
        }
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(ResultsResponse { period, reports }),
    )
        .into_response()
}

/// Query parameters for GET /status.
#[derive(Debug, Deserialize)]
struct StatusQuery {
    period: String,
}

/// Handler for GET /status.
///
/// Returns giving/receiving completion for every active operator plus
/// each evaluator's next-criterion cursor.
async fn status_handler(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    let period: Period = match query.period.parse() {
        Ok(period) => period,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    let catalog = state.catalog().catalog();
    let records = state.store().fetch(period, None);
    let roles = catalog.roles();

    let operators = catalog
        .operators()
        .iter()
        .filter(|o| o.active)
        .map(|operator| {
            // Peers only ever evaluate their designated criterion, so
            // the cursor must not offer them the rest of the catalog.
            let scope: Vec<Criterion> = if roles.role_of(operator).evaluates_all_criteria() {
                catalog.criteria().to_vec()
            } else {
                catalog
                    .criteria()
                    .iter()
                    .filter(|c| c.id == roles.peer_criterion_id())
                    .cloned()
                    .collect()
            };
            let next_criterion_id =
                next_criterion(&scope, &operator.id, period, &records).map(|c| c.id.clone());

            StatusLine {
                completion: completion_for(operator, catalog.criteria(), roles, &records, period),
                next_criterion_id,
            }
        })
        .collect();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(StatusResponse { period, operators }),
    )
        .into_response()
}
