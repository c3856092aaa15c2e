//! Scoring logic for the Evaluation Scoring & Consolidation Engine.
//!
//! This module contains the core calculations: the bonus calculator
//! mapping achieved values to bonus amounts, the weighted bonus pool
//! distributor, the consolidation engine reducing multiple evaluators'
//! inputs to one authoritative value, and the completion tracker deriving
//! per-operator status across the giving and receiving roles.

mod bonus;
mod completion;
mod consolidation;
mod pool;

pub use bonus::{bonus_achieved, target_met};
pub use completion::{completion_for, giving_progress, next_criterion, receiving_progress};
pub use consolidation::{ConsolidationOutcome, build_report, consolidate};
pub use pool::{PoolDistribution, PoolShare, distribute_pool};
