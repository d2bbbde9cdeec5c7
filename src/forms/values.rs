//! Helpers shared by the draft-to-wire mappings and the edit-mode seeding.

use std::str::FromStr;

use chrono::NaiveDate;
use condo_domain::documents::digits_only;

use crate::wizard::{DraftError, FieldValues};

pub(crate) fn text(values: &FieldValues, key: &str) -> String {
    values
        .get(key)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn optional_text(values: &FieldValues, key: &str) -> Option<String> {
    let value = text(values, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn digits(values: &FieldValues, key: &str) -> String {
    values.get(key).map(|value| digits_only(value)).unwrap_or_default()
}

pub(crate) fn optional_digits(values: &FieldValues, key: &str) -> Option<String> {
    let value = digits(values, key);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn whole<T: FromStr>(
    values: &FieldValues,
    key: &'static str,
    label: &str,
) -> Result<T, DraftError> {
    text(values, key)
        .parse()
        .map_err(|_| DraftError::new(key, format!("{} must be a whole number", label)))
}

pub(crate) fn optional_decimal(
    values: &FieldValues,
    key: &'static str,
    label: &str,
) -> Result<Option<f64>, DraftError> {
    match optional_text(values, key) {
        None => Ok(None),
        Some(raw) => raw
            .replace(',', ".")
            .parse()
            .map(Some)
            .map_err(|_| DraftError::new(key, format!("{} must be a number", label))),
    }
}

pub(crate) fn optional_date(
    values: &FieldValues,
    key: &'static str,
) -> Result<Option<NaiveDate>, DraftError> {
    match optional_text(values, key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DraftError::new(key, "Use YYYY-MM-DD format")),
    }
}

/// Seeds `key` unless `value` is absent.
pub(crate) fn seed(defaults: &mut FieldValues, key: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        defaults.insert(key.to_string(), value.to_string());
    }
}

pub(crate) fn format_cnpj(digits: &str) -> String {
    if digits.len() != 14 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}

pub(crate) fn format_cpf(digits: &str) -> String {
    if digits.len() != 11 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

pub(crate) fn format_cep(digits: &str) -> String {
    if digits.len() != 8 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return digits.to_string();
    }
    format!("{}-{}", &digits[..5], &digits[5..])
}
