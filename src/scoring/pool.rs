//! Weighted bonus pool distribution.
//!
//! This module splits a fixed per-level monetary pool across the active
//! criteria proportionally to their weights. It is used by the
//! criteria-configuration view only and never feeds persisted scoring.

use rust_decimal::Decimal;

use crate::models::{Criterion, DataWarning, WarningSeverity};

/// One criterion's monetary share of a bonus pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolShare {
    /// The criterion receiving the share.
    pub criterion_id: String,
    /// The criterion's weight.
    pub weight: u8,
    /// The monetary share of the pool.
    pub amount: Decimal,
}

/// The result of distributing a bonus pool across active criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolDistribution {
    /// The pool amount that was distributed.
    pub pool: Decimal,
    /// Per-criterion shares, in catalog order. Inactive criteria do not
    /// appear.
    pub shares: Vec<PoolShare>,
    /// True when the total active weight was zero and every share is
    /// zero. Surfaced explicitly rather than as a NaN or infinity.
    pub degenerate: bool,
    /// Warnings raised during distribution.
    pub warnings: Vec<DataWarning>,
}

/// Distributes a fixed monetary pool across the active criteria
/// proportionally to weight.
///
/// Criterion `c`'s share is `(c.weight / total active weight) * pool`.
/// When the total active weight is zero, every share is zero and the
/// distribution is flagged degenerate with a `DEGENERATE_WEIGHTS`
/// warning.
///
/// # Example
///
/// ```
/// use evaluation_engine::scoring::distribute_pool;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let distribution = distribute_pool(Decimal::from_str("300.00").unwrap(), &[]);
/// assert!(distribution.degenerate);
/// assert!(distribution.shares.is_empty());
/// ```
pub fn distribute_pool(pool: Decimal, criteria: &[Criterion]) -> PoolDistribution {
    let active: Vec<&Criterion> = criteria.iter().filter(|c| c.active).collect();
    let total_weight: u32 = active.iter().map(|c| u32::from(c.weight)).sum();

    if total_weight == 0 {
        return PoolDistribution {
            pool,
            shares: active
                .iter()
                .map(|c| PoolShare {
                    criterion_id: c.id.clone(),
                    weight: c.weight,
                    amount: Decimal::ZERO,
                })
                .collect(),
            degenerate: true,
            warnings: vec![DataWarning::new(
                "DEGENERATE_WEIGHTS",
                "total active weight is zero; every share is zero",
                WarningSeverity::Medium,
            )],
        };
    }

    let total = Decimal::from(total_weight);
    let shares = active
        .iter()
        .map(|c| PoolShare {
            criterion_id: c.id.clone(),
            weight: c.weight,
            amount: pool * Decimal::from(c.weight) / total,
        })
        .collect();

    PoolDistribution {
        pool,
        shares,
        degenerate: false,
        warnings: vec![],
    }
}
