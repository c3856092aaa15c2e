//! Criterion model and related types.
//!
//! A criterion is a named, weighted evaluation dimension with a target
//! threshold and a monetary bonus value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a criterion is rated as a percentage or counted as raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Rated as a percentage (e.g., a quality audit score).
    Qualitative,
    /// Counted as raw events (e.g., number of incidents).
    Quantitative,
}

/// The direction in which an achieved value is compared to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDirection {
    /// The target is met when the achieved value is at or above it.
    HigherIsBetter,
    /// The target is met when the achieved value is at or below it.
    LowerIsBetter,
}

/// A measurable evaluation dimension.
///
/// Criteria are defined by configuration administrators and drive every
/// aggregate calculation in the engine. Inactive criteria contribute zero
/// to every total.
///
/// # Example
///
/// ```
/// use evaluation_engine::models::{Criterion, CriterionKind, TargetDirection};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let criterion = Criterion {
///     id: "quality_audit".to_string(),
///     name: "Quality Audit".to_string(),
///     kind: CriterionKind::Qualitative,
///     target_direction: TargetDirection::HigherIsBetter,
///     target_value: Decimal::from_str("90").unwrap(),
///     bonus_value: Decimal::from_str("100.00").unwrap(),
///     weight: 5,
///     order: 1,
///     active: true,
///     allows_bulk_import: true,
///     manager_only: false,
///     import_field: Some("quality".to_string()),
/// };
/// assert!(criterion.active);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Stable unique identifier for the criterion.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Whether the criterion is qualitative or quantitative.
    pub kind: CriterionKind,
    /// The direction in which achieved values are compared to the target.
    pub target_direction: TargetDirection,
    /// The numeric threshold for meeting the target.
    pub target_value: Decimal,
    /// The monetary bonus paid when this criterion is active in a
    /// non-pooled context.
    pub bonus_value: Decimal,
    /// Weight used only for pooled, level-based distribution. Must be 1-5.
    pub weight: u8,
    /// Display and cursor ordering; the bulk-evaluation workflow presents
    /// criteria in ascending order.
    pub order: u32,
    /// Inactive criteria are excluded from all aggregate calculations.
    pub active: bool,
    /// Whether values for this criterion may come from a bulk import.
    #[serde(default)]
    pub allows_bulk_import: bool,
    /// Whether the authoritative value comes only from a manager-role
    /// evaluator. Peer records never influence a manager-only criterion.
    #[serde(default)]
    pub manager_only: bool,
    /// The external row field this criterion is mapped to during imports.
    /// `None` for criteria that are entered manually.
    #[serde(default)]
    pub import_field: Option<String>,
}

impl Criterion {
    /// Returns true if this criterion participates in aggregate
    /// calculations.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if this criterion can receive values from a bulk
    /// import.
    pub fn is_importable(&self) -> bool {
        self.active && self.allows_bulk_import && self.import_field.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_criterion() -> Criterion {
        Criterion {
            id: "quality_audit".to_string(),
            name: "Quality Audit".to_string(),
            kind: CriterionKind::Qualitative,
            target_direction: TargetDirection::HigherIsBetter,
            target_value: dec("90"),
            bonus_value: dec("100.00"),
            weight: 5,
            order: 1,
            active: true,
            allows_bulk_import: true,
            manager_only: false,
            import_field: Some("quality".to_string()),
        }
    }

    #[test]
    fn test_deserialize_criterion() {
        let json = r#"{
            "id": "defect_count",
            "name": "Defect Count",
            "kind": "quantitative",
            "target_direction": "lower_is_better",
            "target_value": "10",
            "bonus_value": "60.00",
            "weight": 3,
            "order": 2,
            "active": true
        }"#;

        let criterion: Criterion = serde_json::from_str(json).unwrap();
        assert_eq!(criterion.id, "defect_count");
        assert_eq!(criterion.kind, CriterionKind::Quantitative);
        assert_eq!(criterion.target_direction, TargetDirection::LowerIsBetter);
        assert_eq!(criterion.target_value, dec("10"));
        assert_eq!(criterion.bonus_value, dec("60.00"));
        assert!(!criterion.allows_bulk_import);
        assert!(!criterion.manager_only);
        assert!(criterion.import_field.is_none());
    }

    #[test]
    fn test_serialize_criterion_round_trip() {
        let criterion = create_test_criterion();
        let json = serde_json::to_string(&criterion).unwrap();
        let deserialized: Criterion = serde_json::from_str(&json).unwrap();
        assert_eq!(criterion, deserialized);
    }

    #[test]
    fn test_is_importable_requires_active_flag_and_field() {
        let mut criterion = create_test_criterion();
        assert!(criterion.is_importable());

        criterion.active = false;
        assert!(!criterion.is_importable());

        criterion.active = true;
        criterion.allows_bulk_import = false;
        assert!(!criterion.is_importable());

        criterion.allows_bulk_import = true;
        criterion.import_field = None;
        assert!(!criterion.is_importable());
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&CriterionKind::Qualitative).unwrap(),
            "\"qualitative\""
        );
        assert_eq!(
            serde_json::to_string(&CriterionKind::Quantitative).unwrap(),
            "\"quantitative\""
        );
    }

    #[test]
    fn test_target_direction_serialization() {
        assert_eq!(
            serde_json::to_string(&TargetDirection::HigherIsBetter).unwrap(),
            "\"higher_is_better\""
        );
        assert_eq!(
            serde_json::to_string(&TargetDirection::LowerIsBetter).unwrap(),
            "\"lower_is_better\""
        );
    }
}
