use serde::{Deserialize, Serialize};

/// Building block (tower) inside a condominium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPayload {
    pub condominium_id: String,
    pub name: String,
    pub floors: u32,
    pub units_per_floor: u32,
}
