//! Catalog configuration for the Evaluation Scoring & Consolidation Engine.
//!
//! This module loads the criterion catalog, operator catalog, evaluator
//! role table, and per-level bonus pools from YAML files.

mod loader;
mod types;

pub use loader::CatalogLoader;
pub use types::{Catalog, CriteriaConfig, OperatorsConfig, PoolsConfig, RolesConfig};
