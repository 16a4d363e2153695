//! # Error Types
//!
//! Structured error types for fabric_core. Two kinds of failure exist in the
//! engines and they are kept apart on purpose:
//!
//! - **Insufficient input** (empty field, non-numeric text, zero divisor) is
//!   not an error at all. Engines return zero/placeholder results.
//! - **Constraint violations** (residue heavier than the sample, target
//!   concentration at or above stock) are reported as
//!   [`CalcError::ConstraintViolated`] inside the engine result, naming the
//!   field a form should highlight.
//!
//! The remaining variants come from the structured dispatch layer and from
//! preference persistence.
//!
//! ## Example
//!
//! ```rust
//! use fabric_core::errors::{CalcError, CalcResult};
//!
//! fn check_wash_count(count: usize) -> CalcResult<()> {
//!     if count > 10 {
//!         return Err(CalcError::InvalidInput {
//!             field: "wash_weights".to_string(),
//!             value: count.to_string(),
//!             reason: "At most 10 washes are supported".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fabric_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value breaks the engine's contract (bad id, too many rows, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unit name not present in the category's conversion table
    #[error("Unknown unit '{unit}' for category {category}")]
    UnknownUnit { category: String, unit: String },

    /// Inputs parse fine but violate a physical constraint of the test
    #[error("{reason}")]
    ConstraintViolated { field: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
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

    /// Create an UnknownUnit error
    pub fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit {
            category: category.into(),
            unit: unit.into(),
        }
    }

    /// Create a ConstraintViolated error
    pub fn constraint_violated(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConstraintViolated {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for domain-level violations a form should surface next to a field
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, CalcError::ConstraintViolated { .. })
    }

    /// The input field this error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::InvalidInput { field, .. } | CalcError::ConstraintViolated { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::ConstraintViolated { .. } => "CONSTRAINT_VIOLATED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::constraint_violated("after_weight", "Final weight cannot exceed initial weight");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"ConstraintViolated\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_unit("Length", "furlongs").error_code(), "UNKNOWN_UNIT");
        assert_eq!(CalcError::invalid_input("rows", "x", "bad").error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_constraint_violation_is_distinguishable() {
        let domain = CalcError::constraint_violated("target_concentration", "too high");
        assert!(domain.is_constraint_violation());
        assert_eq!(domain.field(), Some("target_concentration"));
        assert_eq!(domain.to_string(), "too high");

        let contract = CalcError::invalid_input("wash_weights", "11", "too many");
        assert!(!contract.is_constraint_violation());
    }
}
