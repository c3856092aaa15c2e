//! Request types for the evaluation engine API.
//!
//! This module defines the JSON request structures for the
//! `/evaluations` endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Period;

/// Request body for the `/evaluations` endpoint.
///
/// One evaluator submits a batch of scores for one period. A
/// request-level `criterion_id` covers the common flow of rating every
/// evaluatee on the same criterion; individual entries may override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// The operator submitting the scores.
    pub evaluator_id: String,
    /// The evaluation period (`YYYY-MM`).
    pub period: Period,
    /// Default criterion for every entry that does not name its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_id: Option<String>,
    /// The scores being submitted.
    pub entries: Vec<SubmissionEntry>,
}

/// One score within a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionEntry {
    /// The operator being evaluated.
    pub evaluatee_id: String,
    /// The criterion being scored; falls back to the request-level
    /// criterion when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_id: Option<String>,
    /// The achieved value on the criterion's scale.
    pub achieved_value: Decimal,
}

impl SubmissionEntry {
    /// Resolves the criterion this entry scores, falling back to the
    /// request-level default.
    pub fn criterion_id<'a>(&'a self, default: Option<&'a str>) -> EngineResult<&'a str> {
        self.criterion_id
            .as_deref()
            .or(default)
            .ok_or_else(|| EngineError::InvalidRecord {
                field: "criterion_id".to_string(),
                message: "entry names no criterion and the request has no default".to_string(),
            })
    }
}
