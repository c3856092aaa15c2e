//! Core data models for the Evaluation Scoring & Consolidation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod completion;
mod criterion;
mod evaluation;
mod operator;
mod report;

pub use completion::{CompletionStatus, OperatorCompletion, RoleProgress};
pub use criterion::{Criterion, CriterionKind, TargetDirection};
pub use evaluation::{EvaluationRecord, Period, RecordKey};
pub use operator::{EvaluatorRole, Operator, RoleTable};
pub use report::{DataWarning, OperatorReport, ReportLine, ReportTotals, WarningSeverity};
