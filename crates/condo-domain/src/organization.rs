use serde::{Deserialize, Serialize};

/// Management company (administradora) owning condominiums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub name: String,
    pub cnpj: String,
    pub email: String,
    pub phone: String,
    pub cep: String,
    pub city: String,
    pub state: String,
}
