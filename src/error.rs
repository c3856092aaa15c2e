//! Error types for the Evaluation Scoring & Consolidation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during scoring, consolidation,
//! and catalog loading.

use thiserror::Error;

/// The main error type for the Evaluation Scoring & Consolidation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use evaluation_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A criterion in the catalog failed validation.
    #[error("Invalid criterion '{id}': {message}")]
    InvalidCriterion {
        /// The ID of the invalid criterion.
        id: String,
        /// A description of what made the criterion invalid.
        message: String,
    },

    /// An operator in the catalog failed validation.
    #[error("Invalid operator '{id}': {message}")]
    InvalidOperator {
        /// The ID of the invalid operator.
        id: String,
        /// A description of what made the operator invalid.
        message: String,
    },

    /// Criterion ID was not found in the catalog.
    #[error("Criterion not found: {id}")]
    CriterionNotFound {
        /// The criterion ID that was not found.
        id: String,
    },

    /// Operator could not be resolved against the catalog.
    #[error("Operator not found: {name}")]
    OperatorNotFound {
        /// The operator ID or name that was not found.
        name: String,
    },

    /// No bonus pool is configured for the given operator level.
    #[error("No bonus pool configured for level {level}")]
    LevelPoolNotFound {
        /// The operator level without a configured pool.
        level: u8,
    },

    /// A period string did not match the `YYYY-MM` format.
    #[error("Invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod {
        /// The value that failed to parse.
        value: String,
    },

    /// An evaluation record was missing a required field or contained
    /// inconsistent data.
    #[error("Invalid evaluation record field '{field}': {message}")]
    InvalidRecord {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
