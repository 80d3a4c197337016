//! Schema validation verdict types.
//!
//! The store's validation battery produces a [`ValidationResult`]: blocking
//! errors mean the ingested data is unusable for reporting, while warnings
//! flag degraded but usable data (an empty optional table). Errors and
//! warnings are independent — a result can carry both — and validity is
//! decided by errors alone.
//!
//! # Examples
//!
//! ```
//! use vm_inventory_core::{ValidationIssue, ValidationResult, codes};
//!
//! let mut result = ValidationResult::default();
//! result.warnings.push(ValidationIssue::new(codes::EMPTY_HOSTS, "no hosts"));
//! assert!(result.is_valid());
//!
//! result.errors.push(ValidationIssue::new(codes::NO_VMS, "vinfo is empty"));
//! assert!(!result.is_valid());
//! assert!(result.to_error().is_some());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable issue codes emitted by the validation battery.
pub mod codes {
    /// The primary VM table contains no rows.
    pub const NO_VMS: &str = "NO_VMS";
    /// No VM row carries a non-empty VM identifier.
    pub const MISSING_VM_ID: &str = "MISSING_VM_ID";
    /// No VM row carries a non-empty VM name.
    pub const MISSING_VM_NAME: &str = "MISSING_VM_NAME";
    pub const EMPTY_HOSTS: &str = "EMPTY_HOSTS";
    pub const EMPTY_DATASTORES: &str = "EMPTY_DATASTORES";
    pub const EMPTY_NETWORKS: &str = "EMPTY_NETWORKS";
    pub const EMPTY_CPU: &str = "EMPTY_CPU";
    pub const EMPTY_MEMORY: &str = "EMPTY_MEMORY";
    pub const EMPTY_DISKS: &str = "EMPTY_DISKS";
    pub const EMPTY_NICS: &str = "EMPTY_NICS";
}

/// A single validation finding with a stable code and a human-readable
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The outcome of the validation battery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Valid iff there are zero blocking errors, regardless of warnings.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Folds the blocking errors into a single error value, or `None`
    /// when the result is valid.
    pub fn to_error(&self) -> Option<InvalidSchema> {
        if self.errors.is_empty() {
            return None;
        }
        let joined = self
            .errors
            .iter()
            .map(|issue| format!("[{}] {}", issue.code, issue.message))
            .collect::<Vec<_>>()
            .join("; ");
        Some(InvalidSchema(joined))
    }
}

/// Blocking validation errors folded into one value, suitable for `?`
/// propagation by callers that refuse to report on invalid data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema validation failed: {0}")]
pub struct InvalidSchema(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_invalidate() {
        let result = ValidationResult {
            errors: vec![],
            warnings: vec![ValidationIssue::new(codes::EMPTY_DISKS, "no disks")],
        };
        assert!(result.is_valid());
        assert!(result.has_warnings());
        assert!(result.to_error().is_none());
    }

    #[test]
    fn to_error_includes_all_codes_and_messages() {
        let result = ValidationResult {
            errors: vec![
                ValidationIssue::new("ERROR_1", "first error"),
                ValidationIssue::new("ERROR_2", "second error"),
            ],
            warnings: vec![],
        };
        let err = result.to_error().unwrap();
        let text = err.to_string();
        assert!(text.contains("ERROR_1"));
        assert!(text.contains("ERROR_2"));
        assert!(text.contains("first error"));
    }
}
