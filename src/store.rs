//! Evaluation record store.
//!
//! The real store is an external collaborator (a key/value or relational
//! database); this module defines the seam the engine depends on plus an
//! in-memory implementation used by the HTTP shell and the tests.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{EvaluationRecord, Period, RecordKey};

/// Summary of a batch upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertSummary {
    /// How many keys were written for the first time.
    pub inserted: usize,
    /// How many existing records were overwritten.
    pub replaced: usize,
}

/// Storage abstraction so the engine can be exercised in isolation.
///
/// Implementations must guarantee at most one stored record per
/// [`RecordKey`]: submission is an upsert keyed on the
/// (evaluator, evaluatee, criterion, period) tuple, never an append.
pub trait RecordStore: Send + Sync {
    /// Fetches all records for a period, optionally limited to one
    /// evaluatee.
    fn fetch(&self, period: Period, evaluatee_id: Option<&str>) -> Vec<EvaluationRecord>;

    /// Atomically upserts a batch of records.
    ///
    /// Either every row in the batch persists or none do, so that
    /// completion tracking never observes a half-committed criterion.
    /// Duplicate keys within one batch collapse last-write-wins.
    fn upsert_batch(&mut self, batch: Vec<EvaluationRecord>) -> EngineResult<UpsertSummary>;

    /// Returns whether the evaluator has already submitted any record for
    /// the criterion in the period. Used to resume the next-criterion
    /// cursor after a reload.
    fn already_evaluated(&self, period: Period, evaluator_id: &str, criterion_id: &str) -> bool;
}

/// In-memory record store keyed by the record tuple.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    records: HashMap<RecordKey, EvaluationRecord>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates one record before it may enter the store.
    fn validate(record: &EvaluationRecord) -> EngineResult<()> {
        if record.evaluator_id.trim().is_empty() {
            return Err(EngineError::InvalidRecord {
                field: "evaluator_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if record.evaluatee_id.trim().is_empty() {
            return Err(EngineError::InvalidRecord {
                field: "evaluatee_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if record.criterion_id.trim().is_empty() {
            return Err(EngineError::InvalidRecord {
                field: "criterion_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordStore for InMemoryStore {
    fn fetch(&self, period: Period, evaluatee_id: Option<&str>) -> Vec<EvaluationRecord> {
        self.records
            .values()
            .filter(|r| r.period == period)
            .filter(|r| evaluatee_id.is_none_or(|id| r.evaluatee_id == id))
            .cloned()
            .collect()
    }

    fn upsert_batch(&mut self, batch: Vec<EvaluationRecord>) -> EngineResult<UpsertSummary> {
        // Validate the whole batch before touching the map so a failure
        // leaves the store untouched.
        for record in &batch {
            Self::validate(record)?;
        }

        let mut summary = UpsertSummary::default();
        for record in batch {
            let key = record.key();
            if self.records.insert(key, record).is_some() {
                summary.replaced += 1;
            } else {
                summary.inserted += 1;
            }
        }
        Ok(summary)
    }

    fn already_evaluated(&self, period: Period, evaluator_id: &str, criterion_id: &str) -> bool {
        self.records.values().any(|r| {
            r.period == period
                && r.evaluator_id == evaluator_id
                && r.criterion_id == criterion_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(evaluator: &str, evaluatee: &str, criterion_id: &str, value: &str) -> EvaluationRecord {
        EvaluationRecord {
            evaluatee_id: evaluatee.to_string(),
            evaluator_id: evaluator.to_string(),
            period: "2026-03".parse().unwrap(),
            criterion_id: criterion_id.to_string(),
            achieved_value: dec(value),
            bonus_achieved: dec("0"),
            target_met: false,
        }
    }

    fn period() -> Period {
        "2026-03".parse().unwrap()
    }

    /// ST-001: re-submission overwrites, never duplicates
    #[test]
    fn test_resubmission_overwrites() {
        let mut store = InMemoryStore::new();
        store
            .upsert_batch(vec![record("e1", "t1", "quality_audit", "80")])
            .unwrap();
        let summary = store
            .upsert_batch(vec![record("e1", "t1", "quality_audit", "95")])
            .unwrap();

        assert_eq!(summary.replaced, 1);
        assert_eq!(store.len(), 1);

        let fetched = store.fetch(period(), Some("t1"));
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].achieved_value, dec("95"));
    }

    /// ST-002: distinct tuples coexist
    #[test]
    fn test_distinct_keys_coexist() {
        let mut store = InMemoryStore::new();
        let summary = store
            .upsert_batch(vec![
                record("e1", "t1", "quality_audit", "80"),
                record("e1", "t2", "quality_audit", "70"),
                record("e2", "t1", "quality_audit", "60"),
                record("e1", "t1", "defect_count", "5"),
            ])
            .unwrap();

        assert_eq!(summary.inserted, 4);
        assert_eq!(store.len(), 4);
    }

    /// ST-003: invalid row aborts the whole batch
    #[test]
    fn test_invalid_row_aborts_batch() {
        let mut store = InMemoryStore::new();
        let result = store.upsert_batch(vec![
            record("e1", "t1", "quality_audit", "80"),
            record("", "t1", "quality_audit", "70"),
        ]);

        assert!(result.is_err());
        assert!(store.is_empty(), "a failed batch must not partially commit");
    }

    /// ST-004: duplicate keys within one batch collapse last-write-wins
    #[test]
    fn test_batch_duplicates_collapse() {
        let mut store = InMemoryStore::new();
        store
            .upsert_batch(vec![
                record("e1", "t1", "quality_audit", "80"),
                record("e1", "t1", "quality_audit", "90"),
            ])
            .unwrap();

        assert_eq!(store.len(), 1);
        let fetched = store.fetch(period(), None);
        assert_eq!(fetched[0].achieved_value, dec("90"));
    }

    /// ST-005: fetch filters by period and optional evaluatee
    #[test]
    fn test_fetch_filters() {
        let mut store = InMemoryStore::new();
        let mut old = record("e1", "t1", "quality_audit", "80");
        old.period = "2026-02".parse().unwrap();
        store
            .upsert_batch(vec![
                old,
                record("e1", "t1", "quality_audit", "85"),
                record("e1", "t2", "quality_audit", "75"),
            ])
            .unwrap();

        assert_eq!(store.fetch(period(), None).len(), 2);
        assert_eq!(store.fetch(period(), Some("t1")).len(), 1);
        assert_eq!(store.fetch("2026-02".parse().unwrap(), None).len(), 1);
    }

    /// ST-006: already_evaluated resumes the cursor
    #[test]
    fn test_already_evaluated() {
        let mut store = InMemoryStore::new();
        store
            .upsert_batch(vec![record("e1", "t1", "quality_audit", "80")])
            .unwrap();

        assert!(store.already_evaluated(period(), "e1", "quality_audit"));
        assert!(!store.already_evaluated(period(), "e1", "defect_count"));
        assert!(!store.already_evaluated(period(), "e2", "quality_audit"));
        assert!(!store.already_evaluated("2026-02".parse().unwrap(), "e1", "quality_audit"));
    }
}
