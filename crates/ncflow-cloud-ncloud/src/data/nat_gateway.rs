//! `ncloud_nat_gateway` data source

use super::one_result;
use crate::provider::NcloudProvider;
use crate::resources::NatGatewayRecord;
use crate::validate;
use crate::vpc::NatGatewayInstanceNoRequest;
use async_trait::async_trait;
use ncflow_cloud::DataSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatGatewayQuery {
    pub nat_gateway_no: String,
}

pub struct NatGatewayLookup<'a> {
    provider: &'a NcloudProvider,
}

impl<'a> NatGatewayLookup<'a> {
    pub(crate) fn new(provider: &'a NcloudProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DataSource for NatGatewayLookup<'_> {
    type Query = NatGatewayQuery;
    type Output = NatGatewayRecord;

    fn type_name(&self) -> &'static str {
        "ncloud_nat_gateway"
    }

    async fn read(&self, query: &NatGatewayQuery) -> ncflow_cloud::Result<NatGatewayRecord> {
        self.provider.ensure_vpc_supported(self.type_name())?;
        validate::not_empty("nat_gateway_no", &query.nat_gateway_no)?;

        let request = NatGatewayInstanceNoRequest {
            region_code: self.provider.region().to_string(),
            nat_gateway_instance_no: query.nat_gateway_no.clone(),
        };
        let response = self
            .provider
            .client()
            .vpc
            .get_nat_gateway_instance_detail(&request)
            .await?;

        let instance = one_result(response.nat_gateway_instance_list)?;
        Ok(NatGatewayRecord::from(&instance))
    }
}
