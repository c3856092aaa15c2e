//! Response types for the evaluation engine API.
//!
//! This module defines the submission summary and the error envelope
//! returned by the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{OperatorCompletion, OperatorReport, Period};

/// Summary returned after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Correlation identifier for the submission.
    pub submission_id: Uuid,
    /// When the submission was processed.
    pub timestamp: DateTime<Utc>,
    /// The submitting evaluator.
    pub evaluator_id: String,
    /// The period the scores belong to.
    pub period: Period,
    /// How many records were written for the first time.
    pub inserted: usize,
    /// How many existing records were overwritten.
    pub replaced: usize,
}

/// Response body for the `/results` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    /// The period the reports cover.
    pub period: Period,
    /// One consolidated report per requested operator.
    pub reports: Vec<OperatorReport>,
}

/// One operator's row in the `/status` endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLine {
    /// Giving and receiving progress for the operator.
    #[serde(flatten)]
    pub completion: OperatorCompletion,
    /// The next criterion the operator should evaluate, if any remain.
    pub next_criterion_id: Option<String>,
}

/// Response body for the `/status` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// The period the status covers.
    pub period: Period,
    /// Per-operator completion, in catalog order.
    pub operators: Vec<StatusLine>,
}

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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidCriterion { id, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid criterion '{}'", id),
                    message,
                ),
            },
            EngineError::InvalidOperator { id, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid operator '{}'", id),
                    message,
                ),
            },
            EngineError::CriterionNotFound { id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "CRITERION_NOT_FOUND",
                    format!("Criterion not found: {}", id),
                    format!("The criterion '{}' is not part of the loaded catalog", id),
                ),
            },
            EngineError::OperatorNotFound { name } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "OPERATOR_NOT_FOUND",
                    format!("Operator not found: {}", name),
                    format!("The operator '{}' is not part of the loaded catalog", name),
                ),
            },
            EngineError::LevelPoolNotFound { level } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "LEVEL_POOL_NOT_FOUND",
                    format!("No bonus pool configured for level {}", level),
                ),
            },
            EngineError::InvalidPeriod { value } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid period: {}", value),
                    "Periods use the YYYY-MM format",
                ),
            },
            EngineError::InvalidRecord { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_RECORD",
                    format!("Invalid record field '{}': {}", field, message),
                    "The submitted record contains invalid information",
                ),
            },
        }
    }
}
