//! Import reconciler.
//!
//! This module maps external percentage rows onto importable criteria,
//! resolves operator names with a tolerant fuzzy match, and merges the
//! produced records with previously stored manual entries so a re-import
//! never erases them.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::Catalog;
use crate::error::EngineError;
use crate::models::{EvaluationRecord, Operator, Period};
use crate::scoring::{bonus_achieved, target_met};

/// One external row: an operator name, a period, and named percentage
/// fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    /// The operator name as spelled in the external system.
    pub operator_name: String,
    /// The evaluation period in `YYYY-MM` format.
    pub period: String,
    /// Named values keyed by the external field names.
    #[serde(flatten)]
    pub values: HashMap<String, Decimal>,
}

/// A row that could not be imported, with the reason.
///
/// Rejections never abort the batch; the remaining rows continue.
#[derive(Debug)]
pub struct RowRejection {
    /// Zero-based index of the rejected row.
    pub row_index: usize,
    /// The operator name from the row, for operator feedback.
    pub operator_name: String,
    /// Why the row was rejected.
    pub error: EngineError,
}

/// The result of reconciling an import batch.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// The merged batch to upsert: imported records plus carried-over
    /// manual records.
    pub records: Vec<EvaluationRecord>,
    /// The subset of `records` carried over unchanged from previous
    /// manual entries on non-importable criteria.
    pub preserved: Vec<EvaluationRecord>,
    /// Rows rejected with their reasons.
    pub errors: Vec<RowRejection>,
}

/// Matches an external operator name against the catalog.
///
/// Matching is case-insensitive substring containment in either
/// direction, so "Ana" matches "Ana Souza" and "Ana Souza dos Santos"
/// matches "Ana Souza". The first catalog match wins.
fn match_operator<'a>(operators: &'a [Operator], name: &str) -> Option<&'a Operator> {
    let needle = name.trim().to_lowercase();
    operators.iter().find(|o| {
        let candidate = o.name.to_lowercase();
        candidate.contains(&needle) || needle.contains(&candidate)
    })
}

/// Reconciles external rows into an upsert batch.
///
/// For each row: the operator name is fuzzy-matched against the catalog
/// (no match rejects the row with an explicit error), and every active
/// import-allowed criterion picks its value from the row by the
/// criterion's `import_field` mapping. Achieved values are clamped at
/// zero and run through the bonus calculator.
///
/// Previously stored records for the same operator and period on
/// non-importable criteria are carried into the batch unchanged, so a
/// re-import merges rather than overwrites.
pub fn reconcile(
    rows: &[ImportRow],
    catalog: &Catalog,
    existing: &[EvaluationRecord],
    importer_id: &str,
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (row_index, row) in rows.iter().enumerate() {
        if row.operator_name.trim().is_empty() {
            outcome.errors.push(RowRejection {
                row_index,
                operator_name: row.operator_name.clone(),
                error: EngineError::InvalidRecord {
                    field: "operator_name".to_string(),
                    message: "must not be empty".to_string(),
                },
            });
            continue;
        }

        let period: Period = match row.period.parse() {
            Ok(period) => period,
            Err(error) => {
                outcome.errors.push(RowRejection {
                    row_index,
                    operator_name: row.operator_name.clone(),
                    error,
                });
                continue;
            }
        };

        let Some(operator) = match_operator(catalog.operators(), &row.operator_name) else {
            outcome.errors.push(RowRejection {
                row_index,
                operator_name: row.operator_name.clone(),
                error: EngineError::OperatorNotFound {
                    name: row.operator_name.clone(),
                },
            });
            continue;
        };

        for criterion in catalog.active_criteria().filter(|c| c.is_importable()) {
            let field = criterion
                .import_field
                .as_deref()
                .unwrap_or_default();
            let Some(raw) = row.values.get(field) else {
                continue;
            };

            let achieved = (*raw).max(Decimal::ZERO);
            outcome.records.push(EvaluationRecord {
                evaluatee_id: operator.id.clone(),
                evaluator_id: importer_id.to_string(),
                period,
                criterion_id: criterion.id.clone(),
                achieved_value: achieved,
                bonus_achieved: bonus_achieved(criterion, achieved),
                target_met: target_met(criterion, achieved),
            });
        }

        // Carry manual entries on non-importable criteria through the
        // batch so the merge never loses them.
        for record in existing.iter().filter(|r| {
            r.evaluatee_id == operator.id
                && r.period == period
                && catalog
                    .get_criterion(&r.criterion_id)
                    .map(|c| !c.is_importable())
                    .unwrap_or(false)
        }) {
            outcome.preserved.push(record.clone());
            outcome.records.push(record.clone());
        }
    }

    outcome
}
