//! NCloud provider

use crate::client::ApiClient;
use crate::config::{Config, Site, Timeouts};
use crate::data::{NatGatewayLookup, RegionsLookup, ZonesLookup};
use crate::error::{NcloudError, Result};
use crate::resources::{NatGatewayResource, VpcResource};

/// Explicitly constructed provider context.
///
/// Resources and data sources borrow it; nothing is held in globals.
pub struct NcloudProvider {
    client: ApiClient,
    site: Site,
    region: String,
    support_vpc: bool,
    timeouts: Timeouts,
}

impl NcloudProvider {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: config.client()?,
            site: config.site,
            region: config.region.clone(),
            support_vpc: config.support_vpc,
            timeouts: Timeouts::default(),
        })
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// VPC platform APIs are available on the fin site, or when enabled
    pub fn supports_vpc(&self) -> bool {
        self.site == Site::Fin || self.support_vpc
    }

    pub(crate) fn ensure_vpc_supported(&self, resource: &str) -> Result<()> {
        if self.supports_vpc() {
            return Ok(());
        }
        Err(NcloudError::InvalidConfig(format!(
            "{} is available in the VPC environment only; \
             set NCLOUD_SUPPORT_VPC=true or use the fin site",
            resource
        )))
    }

    pub fn vpc(&self) -> VpcResource<'_> {
        VpcResource::new(self)
    }

    pub fn nat_gateway(&self) -> NatGatewayResource<'_> {
        NatGatewayResource::new(self)
    }

    pub fn nat_gateway_lookup(&self) -> NatGatewayLookup<'_> {
        NatGatewayLookup::new(self)
    }

    pub fn regions(&self) -> RegionsLookup<'_> {
        RegionsLookup::new(self)
    }

    pub fn zones(&self) -> ZonesLookup<'_> {
        ZonesLookup::new(self)
    }
}
