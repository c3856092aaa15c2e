//! Bonus calculator.
//!
//! This module provides the pure functions mapping a criterion and a raw
//! achieved value to a target-met flag and a bonus amount. Both functions
//! are side-effect free and never fail; inputs are clamped by the caller.

use rust_decimal::Decimal;

use crate::models::{Criterion, TargetDirection};

/// Half, used to scale the overshoot reduction for lower-is-better
/// criteria: every full target-width of overshoot costs 50% of the bonus.
fn overshoot_scale() -> Decimal {
    Decimal::new(5, 1)
}

/// Returns whether an achieved value satisfies the criterion's
/// direction-aware threshold.
///
/// # Example
///
/// ```
/// use evaluation_engine::models::{Criterion, CriterionKind, TargetDirection};
/// use evaluation_engine::scoring::target_met;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let criterion = Criterion {
///     id: "defect_count".to_string(),
///     name: "Defect Count".to_string(),
///     kind: CriterionKind::Quantitative,
///     target_direction: TargetDirection::LowerIsBetter,
///     target_value: Decimal::from_str("10").unwrap(),
///     bonus_value: Decimal::from_str("60.00").unwrap(),
///     weight: 3,
///     order: 2,
///     active: true,
///     allows_bulk_import: false,
///     manager_only: false,
///     import_field: None,
/// };
///
/// assert!(target_met(&criterion, Decimal::from_str("8").unwrap()));
/// assert!(!target_met(&criterion, Decimal::from_str("15").unwrap()));
/// ```
pub fn target_met(criterion: &Criterion, achieved_value: Decimal) -> bool {
    match criterion.target_direction {
        TargetDirection::LowerIsBetter => achieved_value <= criterion.target_value,
        TargetDirection::HigherIsBetter => achieved_value >= criterion.target_value,
    }
}

/// Returns the bonus amount earned for an achieved value.
///
/// When the target is met the full `bonus_value` is paid; there is no
/// partial credit once met. Otherwise:
///
/// - higher-is-better: proportional credit,
///   `bonus_value * min(achieved / target, 1)`, floored at zero;
/// - lower-is-better: decreasing credit based on overshoot distance,
///   `bonus_value * max(0, 1 - (distance / target) * 0.5)` where
///   `distance = max(0, achieved - target)`.
///
/// A non-positive achieved value in the lower-is-better branch pays the
/// full bonus, matching the legacy calculator. With a non-negative
/// target the met check already covers that case.
///
/// A zero target in either not-met branch yields zero credit rather than
/// a division failure.
pub fn bonus_achieved(criterion: &Criterion, achieved_value: Decimal) -> Decimal {
    if target_met(criterion, achieved_value) {
        return criterion.bonus_value;
    }

    match criterion.target_direction {
        TargetDirection::HigherIsBetter => {
            let ratio = achieved_value
                .checked_div(criterion.target_value)
                .unwrap_or(Decimal::ZERO);
            // Only reachable when achieved < target, so the upper clamp
            // never bites; it stays to bound the result regardless.
            let ratio = ratio.min(Decimal::ONE).max(Decimal::ZERO);
            criterion.bonus_value * ratio
        }
        TargetDirection::LowerIsBetter => {
            if achieved_value <= Decimal::ZERO {
                return criterion.bonus_value;
            }
            let distance = (achieved_value - criterion.target_value).max(Decimal::ZERO);
            let overshoot_ratio = distance
                .checked_div(criterion.target_value)
                .unwrap_or(Decimal::ONE);
            let reduction_factor =
                (Decimal::ONE - overshoot_ratio * overshoot_scale()).max(Decimal::ZERO);
            criterion.bonus_value * reduction_factor
        }
    }
}
