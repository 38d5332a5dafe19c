//! Validation violation and result types.

use serde::{Deserialize, Serialize};

/// A single field-level rule violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Path of the offending field, e.g. `pages[1].seo_data.schema`.
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Aggregated result of evaluating all rules against one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<FieldViolation>,
}

impl ValidationResult {
    /// Build a result from a flat list of violations.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_violations_is_valid() {
        let result = ValidationResult::from_violations(vec![]);
        assert!(result.is_valid);
    }

    #[test]
    fn any_violation_invalidates() {
        let result = ValidationResult::from_violations(vec![FieldViolation::new(
            "slug",
            "required",
            "The slug field is required",
        )]);
        assert!(!result.is_valid);
        assert_eq!(result.violations.len(), 1);
    }
}
