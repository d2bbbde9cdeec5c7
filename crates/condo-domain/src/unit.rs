use serde::{Deserialize, Serialize};

/// Apartment or house inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
    pub block_id: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    pub bedrooms: u32,
    pub parking_spaces: u32,
}
