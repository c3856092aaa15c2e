//! Backup document contract.
//!
//! The export format is consumed by an external restore tool, so the
//! wire field names (`operadores`, `criterios`, `avaliacoes`) are fixed
//! and must not be renamed. The checksum is advisory: a mismatch on
//! import raises a warning and never blocks the restore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Criterion, DataWarning, EvaluationRecord, Operator, WarningSeverity};

/// A full backup of the evaluation data for one deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    /// Engine version that produced the backup.
    pub version: String,
    /// When the backup was taken.
    pub timestamp: DateTime<Utc>,
    /// The operator catalog at backup time.
    #[serde(rename = "operadores")]
    pub operators: Vec<Operator>,
    /// The criteria catalog at backup time.
    #[serde(rename = "criterios")]
    pub criteria: Vec<Criterion>,
    /// Every stored evaluation record.
    #[serde(rename = "avaliacoes")]
    pub evaluations: Vec<EvaluationRecord>,
    /// Advisory integrity checksum over every field except this one.
    pub checksum: String,
}

/// Outcome of verifying a backup checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// The stored checksum matches the recomputed one.
    Verified,
    /// The stored checksum differs from the recomputed one.
    Mismatch {
        /// The checksum recorded in the document.
        stored: String,
        /// The checksum recomputed from the document contents.
        computed: String,
    },
}

impl ChecksumStatus {
    /// Returns the warning to attach on import, if any.
    pub fn warning(&self) -> Option<DataWarning> {
        match self {
            Self::Verified => None,
            Self::Mismatch { stored, computed } => Some(DataWarning::new(
                "CHECKSUM_MISMATCH",
                format!("backup checksum {stored} does not match computed {computed}"),
                WarningSeverity::Medium,
            )),
        }
    }
}

/// Hashes one scalar field rendered as a string.
fn field_hash(value: &str) -> u64 {
    value
        .bytes()
        .fold(0u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

/// Sums the field hashes of one operator.
fn operator_hash(operator: &Operator) -> u64 {
    [
        field_hash(&operator.id),
        field_hash(&operator.name),
        field_hash(&operator.login),
        field_hash(&operator.active.to_string()),
        field_hash(&operator.group.to_string()),
        field_hash(&operator.participates_in_evaluation.to_string()),
        field_hash(&operator.level.to_string()),
        field_hash(&operator.created_at.to_rfc3339()),
    ]
    .into_iter()
    .fold(0u64, u64::wrapping_add)
}

/// Sums the field hashes of one criterion.
fn criterion_hash(criterion: &Criterion) -> u64 {
    let import_field = criterion.import_field.as_deref().unwrap_or_default();
    [
        field_hash(&criterion.id),
        field_hash(&criterion.name),
        field_hash(&format!("{:?}", criterion.kind)),
        field_hash(&format!("{:?}", criterion.target_direction)),
        field_hash(&criterion.target_value.to_string()),
        field_hash(&criterion.bonus_value.to_string()),
        field_hash(&criterion.weight.to_string()),
        field_hash(&criterion.order.to_string()),
        field_hash(&criterion.active.to_string()),
        field_hash(&criterion.allows_bulk_import.to_string()),
        field_hash(&criterion.manager_only.to_string()),
        field_hash(import_field),
    ]
    .into_iter()
    .fold(0u64, u64::wrapping_add)
}

/// Sums the field hashes of one evaluation record.
fn record_hash(record: &EvaluationRecord) -> u64 {
    [
        field_hash(&record.evaluatee_id),
        field_hash(&record.evaluator_id),
        field_hash(&record.period.to_string()),
        field_hash(&record.criterion_id),
        field_hash(&record.achieved_value.to_string()),
        field_hash(&record.bonus_achieved.to_string()),
        field_hash(&record.target_met.to_string()),
    ]
    .into_iter()
    .fold(0u64, u64::wrapping_add)
}

impl BackupDocument {
    /// Builds a backup of the given data, stamping the current time and
    /// engine version and computing the checksum.
    pub fn new(
        operators: Vec<Operator>,
        criteria: Vec<Criterion>,
        evaluations: Vec<EvaluationRecord>,
    ) -> Self {
        let mut document = Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            operators,
            criteria,
            evaluations,
            checksum: String::new(),
        };
        document.checksum = document.compute_checksum();
        document
    }

    /// Computes the advisory checksum over every field except
    /// `checksum` itself.
    ///
    /// Per-entity field hashes are combined with wrapping addition, so
    /// the result is independent of the order of the entity lists. The
    /// checksum detects accidental corruption, not tampering.
    pub fn compute_checksum(&self) -> String {
        let total = [
            field_hash(&self.version),
            field_hash(&self.timestamp.to_rfc3339()),
        ]
        .into_iter()
        .chain(self.operators.iter().map(operator_hash))
        .chain(self.criteria.iter().map(criterion_hash))
        .chain(self.evaluations.iter().map(record_hash))
        .fold(0u64, u64::wrapping_add);

        format!("{total:016x}")
    }

    /// Verifies the stored checksum against the document contents.
    pub fn verify(&self) -> ChecksumStatus {
        let computed = self.compute_checksum();
        if computed == self.checksum {
            ChecksumStatus::Verified
        } else {
            ChecksumStatus::Mismatch {
                stored: self.checksum.clone(),
                computed,
            }
        }
    }
}
