//! Consolidated report models.
//!
//! This module contains the [`OperatorReport`] type and its associated
//! structures that capture the consolidated outcome of one evaluation
//! cycle for one operator, including per-criterion lines, totals, and
//! data-integrity warnings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// Severity of a data-integrity warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational only.
    Low,
    /// Worth reviewing but the result stands.
    Medium,
    /// The result may be misleading.
    High,
}

/// A non-fatal data-integrity warning raised while computing results.
///
/// Warnings never block a calculation; they enumerate conditions such as
/// unresolvable record references, ambiguous manager records, degenerate
/// pool weights, and backup checksum mismatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataWarning {
    /// A stable code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

impl DataWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// The consolidated outcome for one criterion and one operator.
///
/// This is derived on demand from the full record set and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    /// The criterion this line applies to.
    pub criterion_id: String,
    /// The single authoritative achieved value after consolidation.
    pub achieved_value: Decimal,
    /// Whether the consolidated value satisfied the criterion's target.
    pub target_met: bool,
    /// The bonus amount earned for this criterion.
    pub bonus_achieved: Decimal,
    /// How many evaluator records contributed to the consolidation.
    pub record_count: u32,
}

/// Aggregated totals for an operator's report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// The total bonus earned across all active criteria.
    pub bonus_total: Decimal,
    /// The number of active criteria with at least one contributing record.
    pub criteria_evaluated: u32,
    /// The number of criteria whose target was met.
    pub targets_met: u32,
}

/// The consolidated result of one evaluation cycle for one operator.
///
/// # Example
///
/// ```
/// use evaluation_engine::models::{OperatorReport, ReportTotals};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let report = OperatorReport {
///     report_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     operator_id: "op_001".to_string(),
///     period: "2026-03".parse().unwrap(),
///     lines: vec![],
///     totals: ReportTotals {
///         bonus_total: Decimal::ZERO,
///         criteria_evaluated: 0,
///         targets_met: 0,
///     },
///     warnings: vec![],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorReport {
    /// Unique identifier for this report computation.
    pub report_id: Uuid,
    /// When the report was computed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that computed the report.
    pub engine_version: String,
    /// The operator the report is for.
    pub operator_id: String,
    /// The evaluation cycle covered by the report.
    pub period: Period,
    /// One line per active criterion.
    pub lines: Vec<ReportLine>,
    /// Aggregated totals for the report.
    pub totals: ReportTotals,
    /// Data-integrity warnings raised during consolidation.
    pub warnings: Vec<DataWarning>,
}
