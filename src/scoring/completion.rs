//! Completion tracker.
//!
//! This module derives per-operator completion status for the giving and
//! receiving roles from the current record set, and drives the
//! next-unevaluated-criterion cursor used by the bulk-evaluation
//! workflow. Status is recomputed on every query, never stored.

use std::collections::HashSet;

use crate::models::{
    CompletionStatus, Criterion, EvaluationRecord, Operator, OperatorCompletion, Period,
    RoleProgress, RoleTable,
};

/// Compares done against expected counts.
fn status_for(done: u32, expected: u32) -> CompletionStatus {
    if expected == 0 {
        CompletionStatus::NotApplicable
    } else if done >= expected {
        CompletionStatus::Completed
    } else if done > 0 {
        CompletionStatus::InProgress
    } else {
        CompletionStatus::Pending
    }
}

/// Counts the distinct active criteria among an operator's records,
/// selected by the given key extractor.
fn distinct_active_criteria<F>(
    criteria: &[Criterion],
    records: &[EvaluationRecord],
    period: Period,
    matches: F,
) -> u32
where
    F: Fn(&EvaluationRecord) -> bool,
{
    let active_ids: HashSet<&str> = criteria
        .iter()
        .filter(|c| c.active)
        .map(|c| c.id.as_str())
        .collect();

    records
        .iter()
        .filter(|r| r.period == period && matches(r))
        .map(|r| r.criterion_id.as_str())
        .filter(|id| active_ids.contains(id))
        .collect::<HashSet<_>>()
        .len() as u32
}

/// Derives an operator's progress as an evaluator for one period.
///
/// Managers and supervisors are expected to rate every active criterion;
/// peers are expected to rate only the designated peer criterion. A peer
/// whose designated criterion is inactive has nothing to give and is
/// reported as not applicable.
pub fn giving_progress(
    operator: &Operator,
    criteria: &[Criterion],
    roles: &RoleTable,
    records: &[EvaluationRecord],
    period: Period,
) -> RoleProgress {
    let expected = if roles.role_of(operator).evaluates_all_criteria() {
        criteria.iter().filter(|c| c.active).count() as u32
    } else {
        criteria
            .iter()
            .filter(|c| c.active && c.id == roles.peer_criterion_id())
            .count() as u32
    };

    let done = distinct_active_criteria(criteria, records, period, |r| {
        r.evaluator_id == operator.id
    });

    RoleProgress {
        status: status_for(done, expected),
        expected,
        done: done.min(expected),
    }
}

/// Derives an operator's progress as an evaluatee for one period.
///
/// An operator with `participates_in_evaluation == false` is forced to
/// the terminal not-applicable state regardless of record count.
pub fn receiving_progress(
    operator: &Operator,
    criteria: &[Criterion],
    records: &[EvaluationRecord],
    period: Period,
) -> RoleProgress {
    if !operator.participates_in_evaluation {
        return RoleProgress {
            status: CompletionStatus::NotApplicable,
            expected: 0,
            done: 0,
        };
    }

    let expected = criteria.iter().filter(|c| c.active).count() as u32;
    let done = distinct_active_criteria(criteria, records, period, |r| {
        r.evaluatee_id == operator.id
    });

    RoleProgress {
        status: status_for(done, expected),
        expected,
        done: done.min(expected),
    }
}

/// Derives both role statuses for one operator and period.
pub fn completion_for(
    operator: &Operator,
    criteria: &[Criterion],
    roles: &RoleTable,
    records: &[EvaluationRecord],
    period: Period,
) -> OperatorCompletion {
    OperatorCompletion {
        operator_id: operator.id.clone(),
        giving: giving_progress(operator, criteria, roles, records, period),
        receiving: receiving_progress(operator, criteria, records, period),
    }
}

/// Returns the next criterion the evaluator has not yet rated in the
/// period, in ascending `order`.
///
/// The bulk-evaluation workflow rates one criterion for all operators at
/// once, so a criterion counts as evaluated as soon as the evaluator has
/// any record for it. Returns `None` when no criterion remains; the
/// caller opens its blocking confirmation at that point.
pub fn next_criterion<'a>(
    criteria: &'a [Criterion],
    evaluator_id: &str,
    period: Period,
    records: &[EvaluationRecord],
) -> Option<&'a Criterion> {
    let evaluated: HashSet<&str> = records
        .iter()
        .filter(|r| r.period == period && r.evaluator_id == evaluator_id)
        .map(|r| r.criterion_id.as_str())
        .collect();

    criteria
        .iter()
        .filter(|c| c.active)
        .filter(|c| !evaluated.contains(c.id.as_str()))
        .min_by_key(|c| c.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriterionKind, TargetDirection};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn criterion(id: &str, order: u32, active: bool) -> Criterion {
        Criterion {
            id: id.to_string(),
            name: id.to_string(),
            kind: CriterionKind::Qualitative,
            target_direction: TargetDirection::HigherIsBetter,
            target_value: dec("80"),
            bonus_value: dec("50.00"),
            weight: 2,
            order,
            active,
            allows_bulk_import: false,
            manager_only: false,
            import_field: None,
        }
    }

    fn operator(id: &str, group: u32, participates: bool) -> Operator {
        Operator {
            id: id.to_string(),
            name: id.to_string(),
            login: format!("{id}@empresa.com.br"),
            active: true,
            group,
            participates_in_evaluation: participates,
            level: 1,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn record(evaluator: &str, evaluatee: &str, criterion_id: &str) -> EvaluationRecord {
        EvaluationRecord {
            evaluatee_id: evaluatee.to_string(),
            evaluator_id: evaluator.to_string(),
            period: "2026-03".parse().unwrap(),
            criterion_id: criterion_id.to_string(),
            achieved_value: dec("90"),
            bonus_achieved: dec("50.00"),
            target_met: true,
        }
    }

    fn criteria() -> Vec<Criterion> {
        vec![
            criterion("quality_audit", 1, true),
            criterion("defect_count", 2, true),
            criterion("team_rating", 3, true),
            criterion("dormant", 4, false),
        ]
    }

    fn roles() -> RoleTable {
        RoleTable::new(vec![6], vec![7], "team_rating".to_string())
    }

    fn period() -> Period {
        "2026-03".parse().unwrap()
    }

    /// CT-001: no records means pending
    #[test]
    fn test_giving_pending_with_no_records() {
        let manager = operator("manager", 6, true);
        let progress = giving_progress(&manager, &criteria(), &roles(), &[], period());
        assert_eq!(progress.status, CompletionStatus::Pending);
        assert_eq!(progress.expected, 3);
        assert_eq!(progress.done, 0);
    }

    /// CT-002: some but not all criteria means in progress
    #[test]
    fn test_giving_in_progress() {
        let manager = operator("manager", 6, true);
        let records = vec![
            record("manager", "a", "quality_audit"),
            record("manager", "b", "quality_audit"),
            record("manager", "a", "defect_count"),
        ];
        let progress = giving_progress(&manager, &criteria(), &roles(), &records, period());
        assert_eq!(progress.status, CompletionStatus::InProgress);
        assert_eq!(progress.done, 2);
    }

    /// CT-003: every expected criterion recorded means completed
    #[test]
    fn test_giving_completed() {
        let manager = operator("manager", 6, true);
        let records = vec![
            record("manager", "a", "quality_audit"),
            record("manager", "a", "defect_count"),
            record("manager", "a", "team_rating"),
        ];
        let progress = giving_progress(&manager, &criteria(), &roles(), &records, period());
        assert_eq!(progress.status, CompletionStatus::Completed);
        assert_eq!(progress.done, 3);
    }

    /// CT-004: peers are expected to rate only the designated criterion
    #[test]
    fn test_peer_expected_single_criterion() {
        let peer = operator("peer", 2, true);
        let progress = giving_progress(&peer, &criteria(), &roles(), &[], period());
        assert_eq!(progress.expected, 1);
        assert_eq!(progress.status, CompletionStatus::Pending);

        let records = vec![record("peer", "a", "team_rating")];
        let progress = giving_progress(&peer, &criteria(), &roles(), &records, period());
        assert_eq!(progress.status, CompletionStatus::Completed);
    }

    /// CT-005: peer with inactive designated criterion is not applicable
    #[test]
    fn test_peer_with_inactive_designated_criterion() {
        let peer = operator("peer", 2, true);
        let table = RoleTable::new(vec![6], vec![7], "dormant".to_string());
        let progress = giving_progress(&peer, &criteria(), &table, &[], period());
        assert_eq!(progress.status, CompletionStatus::NotApplicable);
        assert_eq!(progress.expected, 0);
    }

    /// CT-006: records on inactive criteria never count
    #[test]
    fn test_inactive_criteria_do_not_count() {
        let manager = operator("manager", 6, true);
        let records = vec![record("manager", "a", "dormant")];
        let progress = giving_progress(&manager, &criteria(), &roles(), &records, period());
        assert_eq!(progress.status, CompletionStatus::Pending);
        assert_eq!(progress.done, 0);
    }

    /// CT-007: records in another period never count
    #[test]
    fn test_other_period_records_do_not_count() {
        let manager = operator("manager", 6, true);
        let mut other = record("manager", "a", "quality_audit");
        other.period = "2026-02".parse().unwrap();
        let progress = giving_progress(&manager, &criteria(), &roles(), &[other], period());
        assert_eq!(progress.status, CompletionStatus::Pending);
    }

    /// CT-008: receiving mirrors the three-way comparison
    #[test]
    fn test_receiving_transitions() {
        let target = operator("target", 2, true);

        let progress = receiving_progress(&target, &criteria(), &[], period());
        assert_eq!(progress.status, CompletionStatus::Pending);

        let some = vec![record("manager", "target", "quality_audit")];
        let progress = receiving_progress(&target, &criteria(), &some, period());
        assert_eq!(progress.status, CompletionStatus::InProgress);

        let all = vec![
            record("manager", "target", "quality_audit"),
            record("manager", "target", "defect_count"),
            record("peer", "target", "team_rating"),
        ];
        let progress = receiving_progress(&target, &criteria(), &all, period());
        assert_eq!(progress.status, CompletionStatus::Completed);
    }

    /// CT-009: non-participant is terminally not applicable
    #[test]
    fn test_non_participant_receiving_not_applicable() {
        let outsider = operator("outsider", 2, false);
        let records = vec![
            record("manager", "outsider", "quality_audit"),
            record("manager", "outsider", "defect_count"),
        ];
        let progress = receiving_progress(&outsider, &criteria(), &records, period());
        assert_eq!(progress.status, CompletionStatus::NotApplicable);
        assert_eq!(progress.expected, 0);
        assert_eq!(progress.done, 0);
    }

    /// CT-010: completion_for combines both roles
    #[test]
    fn test_completion_for_combines_roles() {
        let manager = operator("manager", 6, true);
        let records = vec![record("manager", "a", "quality_audit")];
        let completion = completion_for(&manager, &criteria(), &roles(), &records, period());
        assert_eq!(completion.operator_id, "manager");
        assert_eq!(completion.giving.status, CompletionStatus::InProgress);
        assert_eq!(completion.receiving.status, CompletionStatus::Pending);
    }

    /// NC-001: cursor walks criteria in ascending order
    #[test]
    fn test_next_criterion_ascending_order() {
        let all = criteria();
        let next = next_criterion(&all, "manager", period(), &[]).unwrap();
        assert_eq!(next.id, "quality_audit");
    }

    /// NC-002: cursor skips already-evaluated criteria
    #[test]
    fn test_next_criterion_skips_evaluated() {
        let all = criteria();
        let records = vec![record("manager", "a", "quality_audit")];
        let next = next_criterion(&all, "manager", period(), &records).unwrap();
        assert_eq!(next.id, "defect_count");
    }

    /// NC-003: cursor skips inactive criteria
    #[test]
    fn test_next_criterion_skips_inactive() {
        let all = criteria();
        let records = vec![
            record("manager", "a", "quality_audit"),
            record("manager", "a", "defect_count"),
            record("manager", "a", "team_rating"),
        ];
        assert!(next_criterion(&all, "manager", period(), &records).is_none());
    }

    /// NC-004: cursor resumes after reload from existing records
    #[test]
    fn test_next_criterion_ignores_other_evaluators() {
        let all = criteria();
        let records = vec![record("someone_else", "a", "quality_audit")];
        let next = next_criterion(&all, "manager", period(), &records).unwrap();
        assert_eq!(next.id, "quality_audit");
    }
}
