//! Catalog loading functionality.
//!
//! This module provides the [`CatalogLoader`] type for loading the
//! evaluation catalogs from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::RoleTable;

use super::types::{Catalog, CriteriaConfig, OperatorsConfig, PoolsConfig, RolesConfig};

/// Loads and provides access to the evaluation catalogs.
///
/// The `CatalogLoader` reads YAML configuration files from a directory
/// and provides access to criteria, operators, roles, and bonus pools.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/catalog/
/// ├── criteria.yaml   # Evaluation criteria
/// ├── operators.yaml  # Operator catalog and login domain
/// ├── roles.yaml      # Group-to-role mapping and peer criterion
/// └── pools.yaml      # Bonus pool per operator level
/// ```
///
/// # Example
///
/// ```no_run
/// use evaluation_engine::config::CatalogLoader;
///
/// let loader = CatalogLoader::load("./config/catalog").unwrap();
/// let criterion = loader.catalog().get_criterion("quality_audit").unwrap();
/// println!("Criterion: {}", criterion.name);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: Catalog,
}

impl CatalogLoader {
    /// Loads the catalogs from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/catalog")
    ///
    /// # Returns
    ///
    /// Returns a `CatalogLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A criterion weight falls outside 1-5
    /// - An operator login is outside the configured domain or duplicated
    /// - The designated peer criterion does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let criteria_config = Self::load_yaml::<CriteriaConfig>(&path.join("criteria.yaml"))?;
        let operators_config = Self::load_yaml::<OperatorsConfig>(&path.join("operators.yaml"))?;
        let roles_config = Self::load_yaml::<RolesConfig>(&path.join("roles.yaml"))?;
        let pools_config = Self::load_yaml::<PoolsConfig>(&path.join("pools.yaml"))?;

        Self::validate_criteria(&criteria_config)?;
        Self::validate_operators(&operators_config)?;

        if !criteria_config
            .criteria
            .iter()
            .any(|c| c.id == roles_config.peer_criterion)
        {
            return Err(EngineError::CriterionNotFound {
                id: roles_config.peer_criterion,
            });
        }

        let roles = RoleTable::new(
            roles_config.manager_groups,
            roles_config.supervisor_groups,
            roles_config.peer_criterion,
        );

        let catalog = Catalog::new(
            criteria_config.criteria,
            operators_config.operators,
            roles,
            pools_config.level_pools,
        );

        Ok(Self { catalog })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Validates criterion weights and ID uniqueness.
    fn validate_criteria(config: &CriteriaConfig) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for criterion in &config.criteria {
            if !(1..=5).contains(&criterion.weight) {
                return Err(EngineError::InvalidCriterion {
                    id: criterion.id.clone(),
                    message: format!("weight {} is outside 1-5", criterion.weight),
                });
            }
            if !seen.insert(criterion.id.as_str()) {
                return Err(EngineError::InvalidCriterion {
                    id: criterion.id.clone(),
                    message: "duplicate criterion id".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validates operator logins against the configured domain and
    /// enforces login uniqueness.
    fn validate_operators(config: &OperatorsConfig) -> EngineResult<()> {
        let suffix = format!("@{}", config.login_domain);
        let mut seen = HashSet::new();
        for operator in &config.operators {
            if !operator.login.ends_with(&suffix) {
                return Err(EngineError::InvalidOperator {
                    id: operator.id.clone(),
                    message: format!(
                        "login '{}' is outside domain '{}'",
                        operator.login, config.login_domain
                    ),
                });
            }
            if !seen.insert(operator.login.as_str()) {
                return Err(EngineError::InvalidOperator {
                    id: operator.id.clone(),
                    message: format!("duplicate login '{}'", operator.login),
                });
            }
        }
        Ok(())
    }

    /// Returns the loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
