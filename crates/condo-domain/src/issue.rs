//! Validation results reported by the non-committing validation endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Single business-rule violation reported by the API.
///
/// `field` arrives loosely normalized (any case, stray spaces) and must be
/// normalized before it is matched against a form's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Response of a `commit = false` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    pub fn invalid(issues: Vec<ValidationIssue>) -> Self {
        Self {
            valid: false,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_without_issues_key_defaults_to_empty() {
        let report: ValidationReport = serde_json::from_str(r#"{"valid":true}"#).unwrap();
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn report_parses_issue_list() {
        let report: ValidationReport = serde_json::from_str(
            r#"{"valid":false,"issues":[{"field":"doc","message":"CNPJ invalid"}]}"#,
        )
        .unwrap();
        assert_eq!(
            report,
            ValidationReport::invalid(vec![ValidationIssue::new("doc", "CNPJ invalid")])
        );
    }
}
