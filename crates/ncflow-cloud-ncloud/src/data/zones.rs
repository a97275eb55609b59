//! `ncloud_zones` data source

use super::{data_resource_id_hash, write_to_file};
use crate::config::Site;
use crate::error::NcloudError;
use crate::provider::NcloudProvider;
use crate::server;
use crate::types::Zone;
use crate::vserver;
use async_trait::async_trait;
use ncflow_cloud::DataSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZonesQuery {
    /// Region code; the provider's region when omitted
    pub region: Option<String>,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_no: Option<String>,
    pub zone_code: String,
    pub zone_name: Option<String>,
    pub zone_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_no: Option<String>,
    pub region_code: Option<String>,
}

impl From<Zone> for ZoneRecord {
    fn from(zone: Zone) -> Self {
        Self {
            zone_no: zone.zone_no,
            zone_code: zone.zone_code,
            zone_name: zone.zone_name,
            zone_description: zone.zone_description,
            region_no: zone.region_no,
            region_code: zone.region_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonesOutput {
    pub id: String,
    pub zones: Vec<ZoneRecord>,
}

pub struct ZonesLookup<'a> {
    provider: &'a NcloudProvider,
}

impl<'a> ZonesLookup<'a> {
    pub(crate) fn new(provider: &'a NcloudProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DataSource for ZonesLookup<'_> {
    type Query = ZonesQuery;
    type Output = ZonesOutput;

    fn type_name(&self) -> &'static str {
        "ncloud_zones"
    }

    async fn read(&self, query: &ZonesQuery) -> ncflow_cloud::Result<ZonesOutput> {
        let client = self.provider.client();

        let zones = if self.provider.site() == Site::Fin {
            let request = vserver::GetZoneListRequest {
                region_code: query.region.clone(),
            };
            client.vserver.get_zone_list(&request).await?.zone_list
        } else {
            let code = query.region.as_deref().unwrap_or(self.provider.region());
            let region_no = self.provider.regions().region_no(code).await?;
            tracing::debug!(region = code, %region_no, "Resolved classic region");
            let request = server::GetZoneListRequest {
                region_no: Some(region_no),
            };
            client.server.get_zone_list(&request).await?.zone_list
        };

        if zones.is_empty() {
            return Err(NcloudError::NoResults.into());
        }

        let zones: Vec<ZoneRecord> = zones.into_iter().map(ZoneRecord::from).collect();
        let ids: Vec<&str> = zones
            .iter()
            .map(|z| z.zone_no.as_deref().unwrap_or(&z.zone_code))
            .collect();
        let id = data_resource_id_hash(&ids);

        if let Some(path) = &query.output_file {
            write_to_file(path, &zones).await?;
        }

        Ok(ZonesOutput { id, zones })
    }
}
