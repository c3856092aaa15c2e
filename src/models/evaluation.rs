//! Evaluation period and record models.
//!
//! This module defines the `Period` type identifying one monthly
//! evaluation cycle and the `EvaluationRecord` holding one evaluator's
//! input for one criterion, evaluatee, and period.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// A calendar month identifying one evaluation cycle.
///
/// Periods parse from and serialize to the `YYYY-MM` wire format.
///
/// # Example
///
/// ```
/// use evaluation_engine::models::Period;
///
/// let period: Period = "2026-03".parse().unwrap();
/// assert_eq!(period.to_string(), "2026-03");
/// assert!("2026-13".parse::<Period>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, returning an error when the month is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) || !(1900..=9999).contains(&year) {
            return Err(EngineError::InvalidPeriod {
                value: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod {
            value: s.to_string(),
        };

        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(|_| {
            D::Error::custom(format!("invalid period '{value}': expected YYYY-MM"))
        })
    }
}

/// The unique key identifying an evaluation record.
///
/// At most one record exists per key; re-submission overwrites, never
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// The operator who submitted the evaluation.
    pub evaluator_id: String,
    /// The operator being evaluated.
    pub evaluatee_id: String,
    /// The criterion the value applies to.
    pub criterion_id: String,
    /// The evaluation cycle.
    pub period: Period,
}

/// One evaluator's input for one criterion, evaluatee, and period.
///
/// `bonus_achieved` and `target_met` are derived from `achieved_value`
/// through the bonus calculator at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// The operator being evaluated.
    pub evaluatee_id: String,
    /// The operator who submitted the evaluation.
    pub evaluator_id: String,
    /// The evaluation cycle this record belongs to.
    pub period: Period,
    /// The criterion the value applies to.
    pub criterion_id: String,
    /// The raw input: a percentage for qualitative criteria, a count for
    /// quantitative ones.
    pub achieved_value: Decimal,
    /// The bonus amount derived from the achieved value.
    pub bonus_achieved: Decimal,
    /// Whether the achieved value satisfied the criterion's target.
    pub target_met: bool,
}

impl EvaluationRecord {
    /// Returns the unique key for this record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            evaluator_id: self.evaluator_id.clone(),
            evaluatee_id: self.evaluatee_id.clone(),
            criterion_id: self.criterion_id.clone(),
            period: self.period,
        }
    }
}
