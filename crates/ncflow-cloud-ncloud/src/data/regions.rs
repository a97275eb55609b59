//! `ncloud_regions` data source

use super::{data_resource_id_hash, write_to_file};
use crate::config::Site;
use crate::error::{NcloudError, Result};
use crate::provider::NcloudProvider;
use crate::types::Region;
use async_trait::async_trait;
use ncflow_cloud::DataSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionsQuery {
    /// Keep only the region with this code
    pub code: Option<String>,
    /// List VPC platform regions
    pub support_vpc: bool,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_no: Option<String>,
    pub region_code: String,
    pub region_name: Option<String>,
}

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        Self {
            region_no: region.region_no,
            region_code: region.region_code,
            region_name: region.region_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionsOutput {
    pub id: String,
    pub regions: Vec<RegionRecord>,
}

pub struct RegionsLookup<'a> {
    provider: &'a NcloudProvider,
}

impl<'a> RegionsLookup<'a> {
    pub(crate) fn new(provider: &'a NcloudProvider) -> Self {
        Self { provider }
    }

    /// All regions of the classic or VPC platform
    pub async fn list(&self, support_vpc: bool) -> Result<Vec<Region>> {
        let client = self.provider.client();
        let response = if support_vpc || self.provider.site() == Site::Fin {
            client.vserver.get_region_list().await?
        } else {
            client.server.get_region_list().await?
        };
        Ok(response.region_list)
    }

    /// Classic platform `regionNo` for a region code
    pub async fn region_no(&self, code: &str) -> Result<String> {
        self.list(false)
            .await?
            .into_iter()
            .find(|r| r.region_code == code)
            .and_then(|r| r.region_no)
            .ok_or_else(|| NcloudError::invalid("region", format!("no region matching `{}`", code)))
    }
}

#[async_trait]
impl DataSource for RegionsLookup<'_> {
    type Query = RegionsQuery;
    type Output = RegionsOutput;

    fn type_name(&self) -> &'static str {
        "ncloud_regions"
    }

    async fn read(&self, query: &RegionsQuery) -> ncflow_cloud::Result<RegionsOutput> {
        let mut regions = self.list(query.support_vpc).await?;
        if let Some(code) = &query.code {
            regions.retain(|r| &r.region_code == code);
            regions.truncate(1);
        }
        if regions.is_empty() {
            return Err(NcloudError::NoResults.into());
        }

        let regions: Vec<RegionRecord> = regions.into_iter().map(RegionRecord::from).collect();
        let ids: Vec<&str> = regions
            .iter()
            .map(|r| r.region_no.as_deref().unwrap_or(&r.region_code))
            .collect();
        let id = data_resource_id_hash(&ids);

        if let Some(path) = &query.output_file {
            write_to_file(path, &regions).await?;
        }

        Ok(RegionsOutput { id, regions })
    }
}
