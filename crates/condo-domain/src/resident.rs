//! Resident records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKind {
    Owner,
    Tenant,
    Dependent,
}

impl ResidentKind {
    pub const ALL: [ResidentKind; 3] = [
        ResidentKind::Owner,
        ResidentKind::Tenant,
        ResidentKind::Dependent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResidentKind::Owner => "Owner",
            ResidentKind::Tenant => "Tenant",
            ResidentKind::Dependent => "Dependent",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(normalized))
    }
}

impl fmt::Display for ResidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPayload {
    pub name: String,
    /// Taxpayer number, digits only.
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub unit_id: String,
    pub kind: ResidentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_round_trip_case_insensitively() {
        assert_eq!(ResidentKind::from_label("tenant"), Some(ResidentKind::Tenant));
        assert_eq!(ResidentKind::from_label(" OWNER "), Some(ResidentKind::Owner));
        assert_eq!(ResidentKind::from_label("visitor"), None);
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let payload = ResidentPayload {
            name: "Ana".into(),
            cpf: "52998224725".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12),
            email: None,
            phone: "11987654321".into(),
            unit_id: "u-1".into(),
            kind: ResidentKind::Owner,
            move_in_date: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["birthDate"], "1990-04-12");
        assert_eq!(json["kind"], "owner");
        assert!(json.get("email").is_none());
    }
}
