//! Shared NCloud API models

use serde::{Deserialize, Serialize};

/// Code/name pair used for statuses and types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonCode {
    #[serde(default)]
    pub code: String,
    pub code_name: Option<String>,
}

/// Region as returned by both the classic and the VPC platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Classic platform only
    pub region_no: Option<String>,
    pub region_code: String,
    pub region_name: Option<String>,
}

/// Zone as returned by both the classic and the VPC platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Classic platform only
    pub zone_no: Option<String>,
    pub zone_name: Option<String>,
    pub zone_code: String,
    pub zone_description: Option<String>,
    pub region_no: Option<String>,
    pub region_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionListResponse {
    #[serde(default)]
    pub region_list: Vec<Region>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneListResponse {
    #[serde(default)]
    pub zone_list: Vec<Zone>,
}
