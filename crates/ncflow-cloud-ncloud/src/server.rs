//! Classic platform API (`server/v2`)

use crate::client::ServiceClient;
use crate::error::Result;
use crate::types::{RegionListResponse, ZoneListResponse};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetZoneListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_no: Option<String>,
}

#[derive(Clone)]
pub struct ServerApi {
    service: ServiceClient,
}

impl ServerApi {
    pub(crate) fn new(service: ServiceClient) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ServiceClient {
        &self.service
    }

    pub async fn get_region_list(&self) -> Result<RegionListResponse> {
        self.service.call("getRegionList", &[] as &[(&str, &str)]).await
    }

    pub async fn get_zone_list(&self, request: &GetZoneListRequest) -> Result<ZoneListResponse> {
        self.service.call("getZoneList", request).await
    }
}
