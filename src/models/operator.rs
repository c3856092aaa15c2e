//! Operator model and evaluator role mapping.
//!
//! This module defines the Operator struct along with the role table that
//! maps numeric group classifications to evaluator capabilities.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an operator's group entitles them to rate.
///
/// The source system encoded this as magic group numbers; the engine keeps
/// the numbers in configuration only and works with explicit roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorRole {
    /// Rates every active criterion and is the authoritative source for
    /// manager-only criteria.
    Manager,
    /// Rates every active criterion but is never authoritative for
    /// manager-only criteria.
    Supervisor,
    /// Rates only the single designated peer criterion.
    Peer,
}

impl EvaluatorRole {
    /// Returns true if this role is expected to rate every active
    /// criterion.
    pub fn evaluates_all_criteria(&self) -> bool {
        matches!(self, EvaluatorRole::Manager | EvaluatorRole::Supervisor)
    }
}

/// An employee who may evaluate others and/or be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    /// Unique identifier for the operator.
    pub id: String,
    /// The operator's display name.
    pub name: String,
    /// Unique, domain-restricted login.
    pub login: String,
    /// Whether the operator is currently active.
    pub active: bool,
    /// Numeric group classification; mapped to a role via [`RoleTable`].
    pub group: u32,
    /// When false, the operator is never a target of evaluation.
    pub participates_in_evaluation: bool,
    /// Tier used only for the weighted bonus-pool distribution.
    pub level: u8,
    /// When the operator record was created.
    pub created_at: DateTime<Utc>,
}

/// Injectable lookup table from group classification to evaluator role.
///
/// Groups not listed as manager or supervisor groups default to
/// [`EvaluatorRole::Peer`]. The table also carries the ID of the single
/// designated criterion that peer evaluators rate.
///
/// # Example
///
/// ```
/// use evaluation_engine::models::{EvaluatorRole, RoleTable};
///
/// let table = RoleTable::new(vec![6], vec![7], "team_rating".to_string());
/// assert_eq!(table.role_for(6), EvaluatorRole::Manager);
/// assert_eq!(table.role_for(7), EvaluatorRole::Supervisor);
/// assert_eq!(table.role_for(2), EvaluatorRole::Peer);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoleTable {
    roles: HashMap<u32, EvaluatorRole>,
    peer_criterion_id: String,
}

impl RoleTable {
    /// Creates a role table from the manager and supervisor group lists
    /// and the designated peer criterion.
    pub fn new(
        manager_groups: Vec<u32>,
        supervisor_groups: Vec<u32>,
        peer_criterion_id: String,
    ) -> Self {
        let mut roles = HashMap::new();
        for group in manager_groups {
            roles.insert(group, EvaluatorRole::Manager);
        }
        for group in supervisor_groups {
            roles.entry(group).or_insert(EvaluatorRole::Supervisor);
        }
        Self {
            roles,
            peer_criterion_id,
        }
    }

    /// Returns the role for a group classification.
    pub fn role_for(&self, group: u32) -> EvaluatorRole {
        self.roles.get(&group).copied().unwrap_or(EvaluatorRole::Peer)
    }

    /// Returns the role for an operator.
    pub fn role_of(&self, operator: &Operator) -> EvaluatorRole {
        self.role_for(operator.group)
    }

    /// Returns the ID of the single criterion rated by peer evaluators.
    pub fn peer_criterion_id(&self) -> &str {
        &self.peer_criterion_id
    }
}
