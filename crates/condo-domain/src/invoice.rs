//! Condominium fee slips ("boletos").

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub unit_id: String,
    /// Billing month as `YYYY-MM`.
    pub reference_month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount in centavos.
    pub amount_cents: u64,
    pub due_date: NaiveDate,
    /// Digits only.
    pub digitable_line: String,
}

/// Parses a Real amount such as `R$ 1.234,56`, `1234.56` or `850` into
/// centavos.
///
/// With a comma present, dots are thousand separators. Without one, a single
/// dot followed by one or two digits is the decimal point.
pub fn parse_amount_cents(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | ','))
    {
        return None;
    }

    let (whole, fraction) = match trimmed.rsplit_once(',') {
        Some((whole, fraction)) => (whole.replace('.', ""), fraction.to_string()),
        None => match trimmed.rsplit_once('.') {
            Some((whole, fraction)) if fraction.len() <= 2 && !whole.contains('.') => {
                (whole.to_string(), fraction.to_string())
            }
            _ => (trimmed.replace('.', ""), String::new()),
        },
    };
    if whole.contains(',') || fraction.len() > 2 || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: u64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(fraction)
}

/// Renders centavos as `1234.56`.
pub fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
