//! Per-Step Validator: local checks for the active step and routing of
//! server-reported issues back to the step that owns each field.

use condo_domain::ValidationIssue;

use super::steps::{StepFieldMap, WizardDescriptor};
use super::store::{FieldErrors, FieldValues, FormStateStore};

/// Checks every field owned by `step`.
///
/// Returns the normalized values on success, or one message per failing field.
pub fn validate_step(
    descriptor: &WizardDescriptor,
    step: usize,
    store: &FormStateStore,
) -> Result<FieldValues, FieldErrors> {
    let Some(step) = descriptor.steps.get(step) else {
        return Ok(FieldValues::new());
    };

    let mut normalized = FieldValues::new();
    let mut errors = FieldErrors::new();
    for field in &step.fields {
        let raw = store.value(field.key).unwrap_or_default();
        match field.check(raw) {
            Ok(value) => {
                normalized.insert(field.key.to_string(), value);
            }
            Err(err) => {
                errors.insert(field.key.to_string(), err.message);
            }
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Result of matching server issues against a [`StepFieldMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRouting {
    /// Inline errors keyed by form field key.
    pub errors: FieldErrors,
    /// Lowest step owning a failing field.
    pub target_step: Option<usize>,
    /// Issues naming a field no step owns.
    pub unroutable: Vec<ValidationIssue>,
}

/// Turns every matched issue into an inline error, whichever step owns it.
///
/// When several issues name the same field the first message wins.
pub fn route_issues(map: &StepFieldMap, issues: &[ValidationIssue]) -> IssueRouting {
    let mut routing = IssueRouting::default();
    for issue in issues {
        let owner = map
            .step_of(&issue.field)
            .zip(map.canonical_key(&issue.field));
        match owner {
            Some((step, key)) => {
                routing
                    .errors
                    .entry(key.to_string())
                    .or_insert_with(|| issue.message.clone());
                routing.target_step = Some(routing.target_step.map_or(step, |t| t.min(step)));
            }
            None => routing.unroutable.push(issue.clone()),
        }
    }
    routing
}
