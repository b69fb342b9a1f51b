//! # Error Types
//!
//! Structured error types for takeoff_core. Only structural configuration
//! problems are errors; advisory mismatches (custom heights, jack base counts)
//! are reported through [`crate::validation::ValidationResult`] and never
//! abort a calculation.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::errors::{CalcError, CalcResult};
//!
//! fn validate_levels(level_count: u32) -> CalcResult<()> {
//!     if level_count == 0 {
//!         return Err(CalcError::invalid_input(
//!             "level_count",
//!             level_count.to_string(),
//!             "A scaffold needs at least one level",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_levels(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for takeoff_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// so a front end can point the user at the offending field.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is outside its legal domain
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The configuration cannot describe a scaffold (no spans, no columns)
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A chain of same-as level selectors refers back to itself
    #[error("Cyclic level selector reference: {chain}")]
    CyclicSelector { chain: String },

    /// A category was given a policy it does not support
    #[error("Unknown policy '{tag}' for {category}")]
    UnknownPolicy { category: String, tag: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        CalcError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create a CyclicSelector error
    pub fn cyclic_selector(chain: impl Into<String>) -> Self {
        CalcError::CyclicSelector {
            chain: chain.into(),
        }
    }

    /// Create an UnknownPolicy error
    pub fn unknown_policy(category: impl Into<String>, tag: impl Into<String>) -> Self {
        CalcError::UnknownPolicy {
            category: category.into(),
            tag: tag.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the configuration itself, which abort
    /// the calculation pipeline.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::InvalidConfiguration { .. }
                | CalcError::CyclicSelector { .. }
                | CalcError::UnknownPolicy { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CalcError::CyclicSelector { .. } => "CYCLIC_SELECTOR",
            CalcError::UnknownPolicy { .. } => "UNKNOWN_POLICY",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}
