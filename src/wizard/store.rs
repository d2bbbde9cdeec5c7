//! Form State Store: current field values and inline errors.

use std::collections::BTreeMap;

pub type FieldValues = BTreeMap<String, String>;
pub type FieldErrors = BTreeMap<String, String>;

/// Values of the entity draft plus the inline error shown under each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStateStore {
    seed: FieldValues,
    values: FieldValues,
    errors: FieldErrors,
}

impl FormStateStore {
    /// Starts from `seed` (form defaults, or the record being edited).
    pub fn new(seed: FieldValues) -> Self {
        Self {
            values: seed.clone(),
            seed,
            errors: FieldErrors::new(),
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stores `value` and clears the inline error of that field.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
        self.errors.remove(key);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_error(&mut self, key: &str, message: impl Into<String>) {
        self.errors.insert(key.to_string(), message.into());
    }

    pub fn extend_errors(&mut self, errors: FieldErrors) {
        self.errors.extend(errors);
    }

    pub fn clear_errors_for<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.errors.remove(key);
        }
    }

    /// Back to the seeded values with no errors.
    pub fn reset(&mut self) {
        self.values = self.seed.clone();
        self.errors.clear();
    }
}
