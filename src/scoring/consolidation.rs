//! Consolidation engine.
//!
//! This module reduces the set of evaluation records for one criterion,
//! evaluatee, and period to the single authoritative achieved value, and
//! assembles full per-operator reports by combining consolidation with
//! the bonus calculator.
//!
//! Management-graded criteria are authoritative-single-source: a
//! supervisor's judgment is never diluted with peer noise. Peer-graded
//! criteria average across the panel to smooth individual bias.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Catalog;
use crate::error::EngineResult;
use crate::models::{
    Criterion, DataWarning, EvaluationRecord, EvaluatorRole, Operator, OperatorReport, Period,
    ReportLine, ReportTotals, RoleTable, WarningSeverity,
};
use crate::scoring::{bonus_achieved, target_met};

/// The consolidated value for one criterion and evaluatee.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidationOutcome {
    /// The single authoritative achieved value.
    pub achieved_value: Decimal,
    /// How many records contributed to the value.
    pub record_count: u32,
    /// Data-integrity warnings raised while consolidating.
    pub warnings: Vec<DataWarning>,
}

/// Consolidates all evaluation records for one criterion and evaluatee
/// into the single authoritative achieved value.
///
/// The records passed in must already be scoped to the target period.
///
/// - For a manager-only criterion, the first record from a manager-role
///   evaluator wins; peer records never contribute. Additional manager
///   records raise an `AMBIGUOUS_MANAGER_RECORDS` warning. With no
///   manager record the value is zero.
/// - For any other criterion, the achieved values of all non-manager
///   evaluators are averaged (arithmetic mean). With no such records the
///   value is zero.
///
/// Records whose evaluator is not in the operator catalog are treated as
/// absent and raise an `UNKNOWN_EVALUATOR` warning.
///
/// The function is pure: the same inputs always produce the same output.
pub fn consolidate(
    criterion: &Criterion,
    evaluatee_id: &str,
    records: &[EvaluationRecord],
    operators: &[Operator],
    roles: &RoleTable,
) -> ConsolidationOutcome {
    let mut warnings = Vec::new();
    let mut resolved: Vec<(&EvaluationRecord, EvaluatorRole)> = Vec::new();

    for record in records
        .iter()
        .filter(|r| r.criterion_id == criterion.id && r.evaluatee_id == evaluatee_id)
    {
        match operators.iter().find(|o| o.id == record.evaluator_id) {
            Some(evaluator) => resolved.push((record, roles.role_of(evaluator))),
            None => warnings.push(DataWarning::new(
                "UNKNOWN_EVALUATOR",
                format!(
                    "record for criterion '{}' references unknown evaluator '{}'",
                    criterion.id, record.evaluator_id
                ),
                WarningSeverity::Low,
            )),
        }
    }

    if criterion.manager_only {
        let mut managers = resolved
            .iter()
            .filter(|(_, role)| *role == EvaluatorRole::Manager);

        match managers.next() {
            Some((record, _)) => {
                let extras = managers.count();
                if extras > 0 {
                    warnings.push(DataWarning::new(
                        "AMBIGUOUS_MANAGER_RECORDS",
                        format!(
                            "{} manager records for criterion '{}' and evaluatee '{}'; first wins",
                            extras + 1,
                            criterion.id,
                            evaluatee_id
                        ),
                        WarningSeverity::Medium,
                    ));
                }
                ConsolidationOutcome {
                    achieved_value: record.achieved_value,
                    record_count: 1,
                    warnings,
                }
            }
            None => ConsolidationOutcome {
                achieved_value: Decimal::ZERO,
                record_count: 0,
                warnings,
            },
        }
    } else {
        let peers: Vec<&EvaluationRecord> = resolved
            .iter()
            .filter(|(_, role)| *role != EvaluatorRole::Manager)
            .map(|(record, _)| *record)
            .collect();

        if peers.is_empty() {
            return ConsolidationOutcome {
                achieved_value: Decimal::ZERO,
                record_count: 0,
                warnings,
            };
        }

        let sum: Decimal = peers.iter().map(|r| r.achieved_value).sum();
        let mean = sum / Decimal::from(peers.len() as u64);
        ConsolidationOutcome {
            achieved_value: mean,
            record_count: peers.len() as u32,
            warnings,
        }
    }
}

/// Builds the consolidated report for one operator and period.
///
/// One line is produced per active criterion with at least one
/// contributing record; the bonus calculator runs on each consolidated
/// value. Warnings from every consolidation are aggregated on the
/// report, and records referencing criteria outside the catalog raise
/// an `UNKNOWN_CRITERION` warning each.
pub fn build_report(
    catalog: &Catalog,
    operator_id: &str,
    period: Period,
    records: &[EvaluationRecord],
) -> EngineResult<OperatorReport> {
    catalog.get_operator(operator_id)?;

    let scoped: Vec<EvaluationRecord> = records
        .iter()
        .filter(|r| r.period == period)
        .cloned()
        .collect();

    let mut lines = Vec::new();
    let mut warnings = Vec::new();
    let mut bonus_total = Decimal::ZERO;
    let mut targets_met = 0u32;

    let mut unknown: Vec<&str> = scoped
        .iter()
        .filter(|r| r.evaluatee_id == operator_id)
        .map(|r| r.criterion_id.as_str())
        .filter(|id| catalog.get_criterion(id).is_err())
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    for id in unknown {
        warnings.push(DataWarning::new(
            "UNKNOWN_CRITERION",
            format!("records reference criterion '{id}' which is not in the catalog"),
            WarningSeverity::Low,
        ));
    }

    for criterion in catalog.active_criteria() {
        let outcome = consolidate(
            criterion,
            operator_id,
            &scoped,
            catalog.operators(),
            catalog.roles(),
        );
        warnings.extend(outcome.warnings);

        if outcome.record_count == 0 {
            continue;
        }

        let met = target_met(criterion, outcome.achieved_value);
        let bonus = bonus_achieved(criterion, outcome.achieved_value);
        bonus_total += bonus;
        if met {
            targets_met += 1;
        }

        lines.push(ReportLine {
            criterion_id: criterion.id.clone(),
            achieved_value: outcome.achieved_value,
            target_met: met,
            bonus_achieved: bonus,
            record_count: outcome.record_count,
        });
    }

    let criteria_evaluated = lines.len() as u32;
    Ok(OperatorReport {
        report_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        operator_id: operator_id.to_string(),
        period,
        lines,
        totals: ReportTotals {
            bonus_total,
            criteria_evaluated,
            targets_met,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriterionKind, TargetDirection};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn criterion(id: &str, manager_only: bool) -> Criterion {
        Criterion {
            id: id.to_string(),
            name: id.to_string(),
            kind: CriterionKind::Qualitative,
            target_direction: TargetDirection::HigherIsBetter,
            target_value: dec("80"),
            bonus_value: dec("50.00"),
            weight: 2,
            order: 1,
            active: true,
            allows_bulk_import: false,
            manager_only,
            import_field: None,
        }
    }

    fn operator(id: &str, group: u32) -> Operator {
        Operator {
            id: id.to_string(),
            name: id.to_string(),
            login: format!("{id}@empresa.com.br"),
            active: true,
            group,
            participates_in_evaluation: true,
            level: 1,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn record(evaluator: &str, evaluatee: &str, criterion_id: &str, value: &str) -> EvaluationRecord {
        EvaluationRecord {
            evaluatee_id: evaluatee.to_string(),
            evaluator_id: evaluator.to_string(),
            period: "2026-03".parse().unwrap(),
            criterion_id: criterion_id.to_string(),
            achieved_value: dec(value),
            bonus_achieved: Decimal::ZERO,
            target_met: false,
        }
    }

    fn roles() -> RoleTable {
        RoleTable::new(vec![6], vec![7], "team_rating".to_string())
    }

    fn panel() -> Vec<Operator> {
        vec![
            operator("manager", 6),
            operator("supervisor", 7),
            operator("peer_a", 2),
            operator("peer_b", 3),
        ]
    }

    /// CE-001: peer criterion averages non-manager records
    #[test]
    fn test_peer_consolidation_averages() {
        let c = criterion("team_rating", false);
        let records = vec![
            record("peer_a", "target", "team_rating", "10"),
            record("peer_b", "target", "team_rating", "20"),
            record("supervisor", "target", "team_rating", "30"),
        ];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, dec("20"));
        assert_eq!(outcome.record_count, 3);
        assert!(outcome.warnings.is_empty());
    }

    /// CE-002: manager records are excluded from the peer mean
    #[test]
    fn test_peer_consolidation_ignores_manager_records() {
        let c = criterion("team_rating", false);
        let records = vec![
            record("peer_a", "target", "team_rating", "10"),
            record("peer_b", "target", "team_rating", "20"),
            record("manager", "target", "team_rating", "100"),
        ];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, dec("15"));
        assert_eq!(outcome.record_count, 2);
    }

    /// CE-003: manager-only takes the manager's value, never an average
    #[test]
    fn test_manager_only_uses_manager_record() {
        let c = criterion("leadership_review", true);
        let records = vec![
            record("manager", "target", "leadership_review", "85"),
            record("peer_a", "target", "leadership_review", "10"),
            record("peer_b", "target", "leadership_review", "5"),
        ];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, dec("85"));
        assert_eq!(outcome.record_count, 1);
    }

    /// CE-004: adding peer records never changes a manager-only result
    #[test]
    fn test_manager_only_unaffected_by_peer_noise() {
        let c = criterion("leadership_review", true);
        let base = vec![record("manager", "target", "leadership_review", "85")];
        let with_noise = vec![
            record("manager", "target", "leadership_review", "85"),
            record("peer_a", "target", "leadership_review", "1"),
            record("supervisor", "target", "leadership_review", "99"),
        ];

        let without = consolidate(&c, "target", &base, &panel(), &roles());
        let with = consolidate(&c, "target", &with_noise, &panel(), &roles());
        assert_eq!(without.achieved_value, with.achieved_value);
    }

    /// CE-005: manager-only with no manager record resolves to zero
    #[test]
    fn test_manager_only_without_manager_record_is_zero() {
        let c = criterion("leadership_review", true);
        let records = vec![record("peer_a", "target", "leadership_review", "95")];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, Decimal::ZERO);
        assert_eq!(outcome.record_count, 0);
    }

    /// CE-006: multiple manager records flag ambiguity, first wins
    #[test]
    fn test_multiple_manager_records_flagged() {
        let c = criterion("leadership_review", true);
        let mut operators = panel();
        operators.push(operator("second_manager", 6));
        let records = vec![
            record("manager", "target", "leadership_review", "85"),
            record("second_manager", "target", "leadership_review", "40"),
        ];

        let outcome = consolidate(&c, "target", &records, &operators, &roles());
        assert_eq!(outcome.achieved_value, dec("85"));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, "AMBIGUOUS_MANAGER_RECORDS");
    }

    /// CE-007: records from unknown evaluators are treated as absent
    #[test]
    fn test_unknown_evaluator_treated_as_absent() {
        let c = criterion("team_rating", false);
        let records = vec![
            record("peer_a", "target", "team_rating", "10"),
            record("ghost", "target", "team_rating", "90"),
        ];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, dec("10"));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, "UNKNOWN_EVALUATOR");
    }

    /// CE-008: no records at all resolves to zero
    #[test]
    fn test_no_records_resolves_to_zero() {
        let c = criterion("team_rating", false);
        let outcome = consolidate(&c, "target", &[], &panel(), &roles());
        assert_eq!(outcome.achieved_value, Decimal::ZERO);
        assert_eq!(outcome.record_count, 0);
    }

    /// CE-009: consolidation is deterministic
    #[test]
    fn test_consolidation_is_deterministic() {
        let c = criterion("team_rating", false);
        let records = vec![
            record("peer_a", "target", "team_rating", "33"),
            record("peer_b", "target", "team_rating", "67"),
        ];

        let first = consolidate(&c, "target", &records, &panel(), &roles());
        let second = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(first, second);
    }

    #[test]
    fn test_records_for_other_evaluatees_ignored() {
        let c = criterion("team_rating", false);
        let records = vec![
            record("peer_a", "target", "team_rating", "10"),
            record("peer_a", "someone_else", "team_rating", "90"),
        ];

        let outcome = consolidate(&c, "target", &records, &panel(), &roles());
        assert_eq!(outcome.achieved_value, dec("10"));
    }

    fn test_catalog() -> Catalog {
        let mut pools = HashMap::new();
        pools.insert(1, dec("300.00"));
        let mut quality = criterion("quality_audit", false);
        quality.target_direction = TargetDirection::HigherIsBetter;
        quality.target_value = dec("90");
        quality.bonus_value = dec("100.00");
        quality.order = 1;
        let mut leadership = criterion("leadership_review", true);
        leadership.order = 2;
        Catalog::new(
            vec![quality, leadership],
            panel().into_iter().chain([operator("target", 2)]).collect(),
            roles(),
            pools,
        )
    }

    #[test]
    fn test_build_report_combines_consolidation_and_bonus() {
        let catalog = test_catalog();
        let period: Period = "2026-03".parse().unwrap();
        let records = vec![
            record("peer_a", "target", "quality_audit", "92"),
            record("peer_b", "target", "quality_audit", "96"),
            record("manager", "target", "leadership_review", "85"),
        ];

        let report = build_report(&catalog, "target", period, &records).unwrap();
        assert_eq!(report.lines.len(), 2);

        let quality = &report.lines[0];
        assert_eq!(quality.criterion_id, "quality_audit");
        assert_eq!(quality.achieved_value, dec("94"));
        assert!(quality.target_met);
        assert_eq!(quality.bonus_achieved, dec("100.00"));

        let leadership = &report.lines[1];
        assert!(leadership.target_met);
        assert_eq!(leadership.bonus_achieved, dec("50.00"));

        assert_eq!(report.totals.bonus_total, dec("150.00"));
        assert_eq!(report.totals.criteria_evaluated, 2);
        assert_eq!(report.totals.targets_met, 2);
    }

    #[test]
    fn test_build_report_skips_unevaluated_criteria() {
        let catalog = test_catalog();
        let period: Period = "2026-03".parse().unwrap();
        let records = vec![record("peer_a", "target", "quality_audit", "50")];

        let report = build_report(&catalog, "target", period, &records).unwrap();
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].criterion_id, "quality_audit");
        assert!(!report.lines[0].target_met);
    }

    #[test]
    fn test_build_report_filters_by_period() {
        let catalog = test_catalog();
        let period: Period = "2026-04".parse().unwrap();
        let records = vec![record("peer_a", "target", "quality_audit", "92")];

        let report = build_report(&catalog, "target", period, &records).unwrap();
        assert!(report.lines.is_empty());
        assert_eq!(report.totals.bonus_total, Decimal::ZERO);
    }

    #[test]
    fn test_build_report_warns_on_unknown_criterion() {
        let catalog = test_catalog();
        let period: Period = "2026-03".parse().unwrap();
        let records = vec![
            record("peer_a", "target", "quality_audit", "92"),
            record("peer_a", "target", "retired_criterion", "50"),
        ];

        let report = build_report(&catalog, "target", period, &records).unwrap();
        assert_eq!(report.lines.len(), 1);
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.code == "UNKNOWN_CRITERION" && w.message.contains("retired_criterion"))
        );
    }

    #[test]
    fn test_build_report_unknown_operator_errors() {
        let catalog = test_catalog();
        let period: Period = "2026-03".parse().unwrap();
        assert!(build_report(&catalog, "nobody", period, &[]).is_err());
    }
}
