//! Completion status models.
//!
//! Completion status is derived from the current record set each time it
//! is queried; it is never stored, so there are no regression transitions
//! to guard against.

use serde::{Deserialize, Serialize};

/// The completion state for one operator in one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// No expected criterion has a record yet.
    Pending,
    /// Some, but not all, expected criteria have records.
    InProgress,
    /// Every expected criterion has at least one record.
    Completed,
    /// Terminal state for operators outside the workflow, e.g. an
    /// operator who does not participate in evaluation as a receiver.
    NotApplicable,
}

/// Progress within one role (giving or receiving).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProgress {
    /// The derived completion status.
    pub status: CompletionStatus,
    /// How many distinct criteria are expected in this role.
    pub expected: u32,
    /// How many distinct criteria have at least one record.
    pub done: u32,
}

/// Per-operator completion across both roles for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCompletion {
    /// The operator the statuses apply to.
    pub operator_id: String,
    /// Progress as an evaluator.
    pub giving: RoleProgress,
    /// Progress as an evaluatee.
    pub receiving: RoleProgress,
}
