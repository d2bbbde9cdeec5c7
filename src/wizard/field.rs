//! Field descriptors and the built-in local validators.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use condo_domain::documents;

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Supported data kinds for form fields. Front ends use it to pick a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Choice(Vec<String>),
    /// Identifier of another entity (condominium, block, unit).
    Reference,
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

/// Built-in validation helpers. `validate` returns the normalized value that
/// is written back into the form state.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    Integer,
    IntegerRange { min: i64, max: i64 },
    PositiveNumber,
    Decimal,
    Date,
    OneOf(Vec<String>),
    MaxLength(usize),
    Email,
    Cnpj,
    Cpf,
    Cep,
    Phone,
    StateCode,
    Custom(SharedValidatorCallback),
}

impl Validator {
    pub fn custom(
        func: impl Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Validator::Custom(Arc::new(func))
    }

    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        match self {
            Validator::None => Ok(trimmed.to_string()),
            Validator::NonEmpty => {
                if trimmed.is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Validator::Integer => trimmed
                .parse::<i64>()
                .map(|v| v.to_string())
                .map_err(|_| ValidationError::new("Enter a whole number (e.g., 42)")),
            Validator::IntegerRange { min, max } => trimmed
                .parse::<i64>()
                .map_err(|_| ValidationError::new("Enter a whole number"))
                .and_then(|v| {
                    if (*min..=*max).contains(&v) {
                        Ok(v.to_string())
                    } else {
                        Err(ValidationError::new(format!(
                            "Value must be between {} and {}",
                            min, max
                        )))
                    }
                }),
            Validator::PositiveNumber => trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| ValidationError::new("Enter a numeric value"))
                .and_then(|v| {
                    if v > 0.0 {
                        Ok(v.to_string())
                    } else {
                        Err(ValidationError::new("Value must be greater than zero"))
                    }
                }),
            Validator::Decimal => trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map(|v| v.to_string())
                .map_err(|_| ValidationError::new("Enter a numeric value")),
            Validator::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|d| d.to_string())
                .map_err(|_| ValidationError::new("Use YYYY-MM-DD format")),
            Validator::OneOf(options) => {
                let normalized = trimmed.to_lowercase();
                options
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == normalized)
                    .cloned()
                    .ok_or_else(|| {
                        ValidationError::new(format!(
                            "Value must be one of: {}",
                            options.join(", ")
                        ))
                    })
            }
            Validator::MaxLength(max) => {
                let count = trimmed.chars().count();
                if count > *max {
                    Err(ValidationError::new(format!(
                        "Cannot exceed {} characters (got {})",
                        max, count
                    )))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Validator::Email => {
                let valid = trimmed
                    .split_once('@')
                    .map(|(user, domain)| {
                        !user.is_empty()
                            && domain.contains('.')
                            && !domain.starts_with('.')
                            && !domain.ends_with('.')
                    })
                    .unwrap_or(false);
                if valid && !trimmed.contains(char::is_whitespace) {
                    Ok(trimmed.to_ascii_lowercase())
                } else {
                    Err(ValidationError::new("Enter a valid e-mail address"))
                }
            }
            Validator::Cnpj => {
                if documents::is_valid_cnpj(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(ValidationError::new("Enter a valid CNPJ (14 digits)"))
                }
            }
            Validator::Cpf => {
                if documents::is_valid_cpf(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(ValidationError::new("Enter a valid CPF (11 digits)"))
                }
            }
            Validator::Cep => {
                if documents::is_valid_cep(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(ValidationError::new("Enter a valid CEP (e.g., 01310-100)"))
                }
            }
            Validator::Phone => {
                if documents::is_valid_phone(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(ValidationError::new("Enter a phone number with area code"))
                }
            }
            Validator::StateCode => documents::normalize_state_code(trimmed)
                .ok_or_else(|| ValidationError::new("Use a two-letter state code (e.g., SP)")),
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
    /// Other names the API may use for this field in validation issues.
    pub aliases: Vec<&'static str>,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
            aliases: Vec::new(),
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Runs the required check and the field validator against `raw`.
    ///
    /// Blank optional fields pass without consulting the validator.
    pub fn check(&self, raw: &str) -> Result<String, ValidationError> {
        if raw.trim().is_empty() {
            return if self.required {
                Err(ValidationError::new("This field is required"))
            } else {
                Ok(String::new())
            };
        }
        match (&self.kind, &self.validator) {
            (FieldKind::Integer, Validator::None) => Validator::Integer.validate(raw),
            (FieldKind::Decimal, Validator::None) => Validator::Decimal.validate(raw),
            (FieldKind::Date, Validator::None) => Validator::Date.validate(raw),
            (FieldKind::Choice(options), Validator::None) => {
                Validator::OneOf(options.clone()).validate(raw)
            }
            (_, validator) => validator.validate(raw),
        }
    }
}
