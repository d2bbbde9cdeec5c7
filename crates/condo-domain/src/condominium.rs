//! Condominium records.

use serde::{Deserialize, Serialize};

use crate::address::AddressPayload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CondominiumPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub name: String,
    /// Company registration number, digits only.
    pub cnpj: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: AddressPayload,
    pub block_count: u32,
    /// Day of month invoices ("boletos") fall due.
    pub due_day: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
