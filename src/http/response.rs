//! Request shaping and response decoding, kept free of any I/O.

use condo_domain::{ValidationIssue, ValidationReport};
use serde_json::{Map, Value};

use crate::errors::{Result, WizardError};

/// Adds the `commit` flag separating a validation pass from a real save.
pub(crate) fn with_commit_flag(payload: &Value, commit: bool) -> Value {
    match payload {
        Value::Object(map) => {
            let mut map = map.clone();
            map.insert("commit".to_string(), Value::Bool(commit));
            Value::Object(map)
        }
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other.clone());
            map.insert("commit".to_string(), Value::Bool(commit));
            Value::Object(map)
        }
    }
}

/// Maps a non-2xx response to an error.
///
/// 400 and 422 bodies listing `issues` (or `errors`) become
/// [`WizardError::Rejected`]; anything else is a [`WizardError::Server`].
pub(crate) fn decode_error(status: u16, body: &str) -> WizardError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(extract_message);
    let issues = parsed.as_ref().map(extract_issues).unwrap_or_default();

    if matches!(status, 400 | 422) && !issues.is_empty() {
        WizardError::Rejected { message, issues }
    } else {
        WizardError::Server { status, message }
    }
}

pub(crate) fn decode_report(body: &str) -> Result<ValidationReport> {
    serde_json::from_str(body)
        .map_err(|err| WizardError::UnexpectedShape(format!("validation report: {}", err)))
}

/// Reads `id` (string or number) from the body or from its `data` object.
pub(crate) fn decode_identifier(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| WizardError::UnexpectedShape(format!("response body: {}", err)))?;
    let id = value
        .get("id")
        .or_else(|| value.get("data").and_then(|data| data.get("id")));
    match id {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(WizardError::UnexpectedShape(
            "response carries no id".to_string(),
        )),
    }
}

/// Unwraps a `{ "data": { .. } }` envelope when present.
pub(crate) fn decode_record(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| WizardError::UnexpectedShape(format!("record: {}", err)))?;
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            Ok(map.remove("data").unwrap_or_default())
        }
        other => Ok(other),
    }
}

fn extract_message(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

fn extract_issues(body: &Value) -> Vec<ValidationIssue> {
    ["issues", "errors"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| serde_json::from_value::<Vec<ValidationIssue>>(value.clone()).ok())
        .unwrap_or_default()
}
