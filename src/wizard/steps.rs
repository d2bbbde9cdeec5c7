//! Step layout of a wizard and the field → step ownership map.

use std::collections::HashMap;

use thiserror::Error;

use super::field::FieldDescriptor;

/// One page of a wizard.
#[derive(Clone)]
pub struct StepDescriptor {
    pub label: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
    pub fn new(label: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { label, fields }
    }
}

/// Metadata describing a full wizard, including step and field order.
#[derive(Clone)]
pub struct WizardDescriptor {
    /// Machine name, e.g. `condominium`.
    pub name: &'static str,
    /// Display name used in notifications, e.g. `Condominium`.
    pub title: &'static str,
    /// API collection the drafts are sent to, e.g. `condominiums`.
    pub resource: &'static str,
    pub steps: Vec<StepDescriptor>,
}

impl WizardDescriptor {
    pub fn new(
        name: &'static str,
        title: &'static str,
        resource: &'static str,
        steps: Vec<StepDescriptor>,
    ) -> Self {
        Self {
            name,
            title,
            resource,
            steps,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| field.key == key)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("wizard `{0}` has no steps")]
    NoSteps(&'static str),
    #[error("step `{0}` has no fields")]
    EmptyStep(&'static str),
    #[error("field `{field}` is owned by both step {first} and step {second}")]
    DuplicateField {
        field: String,
        first: usize,
        second: usize,
    },
}

/// Lower-cases and drops whitespace, so `" Doc "`, `"DOC"` and `"d oc"` all
/// match the `doc` field.
pub fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Owner {
    step: usize,
    key: &'static str,
}

/// Static association between steps and the fields they validate.
///
/// Every field key and alias resolves to exactly one step.
#[derive(Debug, Clone)]
pub struct StepFieldMap {
    owners: HashMap<String, Owner>,
    steps: Vec<Vec<&'static str>>,
}

impl StepFieldMap {
    pub fn from_descriptor(descriptor: &WizardDescriptor) -> Result<Self, DefinitionError> {
        if descriptor.steps.is_empty() {
            return Err(DefinitionError::NoSteps(descriptor.name));
        }

        let mut owners: HashMap<String, Owner> = HashMap::new();
        let mut steps = Vec::with_capacity(descriptor.steps.len());

        for (index, step) in descriptor.steps.iter().enumerate() {
            if step.fields.is_empty() {
                return Err(DefinitionError::EmptyStep(step.label));
            }
            let mut keys = Vec::with_capacity(step.fields.len());
            for field in &step.fields {
                keys.push(field.key);
                let names = std::iter::once(field.key).chain(field.aliases.iter().copied());
                for name in names {
                    let normalized = normalize_field_name(name);
                    let owner = Owner {
                        step: index,
                        key: field.key,
                    };
                    if let Some(existing) = owners.insert(normalized.clone(), owner) {
                        return Err(DefinitionError::DuplicateField {
                            field: normalized,
                            first: existing.step,
                            second: index,
                        });
                    }
                }
            }
            steps.push(keys);
        }

        Ok(Self { owners, steps })
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step owning `field`, matched after normalization.
    pub fn step_of(&self, field: &str) -> Option<usize> {
        self.owners
            .get(&normalize_field_name(field))
            .map(|owner| owner.step)
    }

    /// Form key for `field`, resolving aliases.
    pub fn canonical_key(&self, field: &str) -> Option<&'static str> {
        self.owners
            .get(&normalize_field_name(field))
            .map(|owner| owner.key)
    }

    pub fn fields_of(&self, step: usize) -> &[&'static str] {
        self.steps.get(step).map(Vec::as_slice).unwrap_or(&[])
    }
}
