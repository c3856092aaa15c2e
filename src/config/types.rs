//! Configuration types for the evaluation catalogs.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the aggregated
//! [`Catalog`] they assemble into.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Criterion, Operator, RoleTable};

/// Criteria configuration file structure (`criteria.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct CriteriaConfig {
    /// The evaluation criteria, in any order.
    pub criteria: Vec<Criterion>,
}

/// Operators configuration file structure (`operators.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorsConfig {
    /// The domain every operator login must belong to.
    pub login_domain: String,
    /// The operator catalog.
    pub operators: Vec<Operator>,
}

/// Evaluator role configuration file structure (`roles.yaml`).
///
/// Group numbers are an encoding internal to the HR system; they appear
/// only here and are mapped to explicit roles everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    /// Groups whose members are manager-role evaluators.
    pub manager_groups: Vec<u32>,
    /// Groups whose members are supervisor-role evaluators.
    pub supervisor_groups: Vec<u32>,
    /// The single criterion rated by peer evaluators.
    pub peer_criterion: String,
}

/// Bonus pool configuration file structure (`pools.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PoolsConfig {
    /// Fixed monetary pool per operator level.
    pub level_pools: HashMap<u8, Decimal>,
}

/// The complete evaluation catalog loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various YAML
/// files in a catalog configuration directory. Criteria are kept sorted
/// by their `order` field.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Criteria sorted by ascending order.
    criteria: Vec<Criterion>,
    /// Operator catalog.
    operators: Vec<Operator>,
    /// Group-to-role lookup table.
    roles: RoleTable,
    /// Fixed monetary pool per operator level.
    level_pools: HashMap<u8, Decimal>,
}

impl Catalog {
    /// Creates a new Catalog from its component parts.
    pub fn new(
        criteria: Vec<Criterion>,
        operators: Vec<Operator>,
        roles: RoleTable,
        level_pools: HashMap<u8, Decimal>,
    ) -> Self {
        let mut sorted_criteria = criteria;
        sorted_criteria.sort_by_key(|c| c.order);
        Self {
            criteria: sorted_criteria,
            operators,
            roles,
            level_pools,
        }
    }

    /// Returns all criteria, sorted by ascending order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Returns the active criteria, sorted by ascending order.
    pub fn active_criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| c.active)
    }

    /// Returns all operators.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Returns the evaluator role table.
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Gets a criterion by its ID.
    pub fn get_criterion(&self, id: &str) -> EngineResult<&Criterion> {
        self.criteria
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::CriterionNotFound { id: id.to_string() })
    }

    /// Gets an operator by its ID.
    pub fn get_operator(&self, id: &str) -> EngineResult<&Operator> {
        self.operators
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| EngineError::OperatorNotFound {
                name: id.to_string(),
            })
    }

    /// Gets the bonus pool for an operator level.
    pub fn pool_for_level(&self, level: u8) -> EngineResult<Decimal> {
        self.level_pools
            .get(&level)
            .copied()
            .ok_or(EngineError::LevelPoolNotFound { level })
    }
}
