//! `ncloud_nat_gateway` resource

use super::{creation_wait, deletion_wait};
use crate::error::{NcloudError, Result};
use crate::provider::NcloudProvider;
use crate::validate;
use crate::vpc::{CreateNatGatewayInstanceRequest, NatGatewayInstance, NatGatewayInstanceNoRequest};
use async_trait::async_trait;
use ncflow_cloud::{CloudError, ManagedResource, ResourceRecord, wait_for_state};
use serde::{Deserialize, Serialize};

const TYPE_NAME: &str = "ncloud_nat_gateway";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatGatewayArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub vpc_no: String,
    /// Zone code, e.g. `KR-1`
    pub zone: String,
}

impl NatGatewayArgs {
    pub fn validate(&self) -> Result<()> {
        validate::not_empty("vpc_no", &self.vpc_no)?;
        validate::not_empty("zone", &self.zone)?;
        if let Some(name) = &self.name {
            validate::instance_name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate::max_len("description", description, validate::MAX_DESCRIPTION_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatGatewayRecord {
    pub id: String,
    pub nat_gateway_no: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub public_ip: Option<String>,
    pub status: String,
    pub vpc_no: Option<String>,
    pub zone: Option<String>,
}

impl From<&NatGatewayInstance> for NatGatewayRecord {
    fn from(nat: &NatGatewayInstance) -> Self {
        Self {
            id: nat.nat_gateway_instance_no.clone(),
            nat_gateway_no: nat.nat_gateway_instance_no.clone(),
            name: nat.nat_gateway_name.clone(),
            description: nat.nat_gateway_description.clone(),
            public_ip: nat.public_ip.clone(),
            status: nat.nat_gateway_instance_status.code.clone(),
            vpc_no: nat.vpc_no.clone(),
            zone: nat.zone_code.clone(),
        }
    }
}

impl ResourceRecord for NatGatewayRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &str {
        &self.status
    }
}

pub struct NatGatewayResource<'a> {
    provider: &'a NcloudProvider,
}

impl<'a> NatGatewayResource<'a> {
    pub(crate) fn new(provider: &'a NcloudProvider) -> Self {
        Self { provider }
    }

    fn instance_no_request(&self, id: &str) -> NatGatewayInstanceNoRequest {
        NatGatewayInstanceNoRequest {
            region_code: self.provider.region().to_string(),
            nat_gateway_instance_no: id.to_string(),
        }
    }

    /// Fetch the NAT gateway; `None` once it no longer exists
    pub async fn get_nat_gateway(&self, id: &str) -> Result<Option<NatGatewayInstance>> {
        let response = self
            .provider
            .client()
            .vpc
            .get_nat_gateway_instance_detail(&self.instance_no_request(id))
            .await?;
        Ok(response.nat_gateway_instance_list.into_iter().next())
    }
}

#[async_trait]
impl ManagedResource for NatGatewayResource<'_> {
    type Args = NatGatewayArgs;
    type Record = NatGatewayRecord;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, args: &NatGatewayArgs) -> ncflow_cloud::Result<String> {
        self.provider.ensure_vpc_supported(TYPE_NAME)?;
        args.validate()?;

        let request = CreateNatGatewayInstanceRequest {
            region_code: self.provider.region().to_string(),
            vpc_no: args.vpc_no.clone(),
            zone_code: args.zone.clone(),
            nat_gateway_name: args.name.clone(),
            nat_gateway_description: args.description.clone(),
        };
        let response = self
            .provider
            .client()
            .vpc
            .create_nat_gateway_instance(&request)
            .await?;

        let nat = response
            .nat_gateway_instance_list
            .into_iter()
            .next()
            .ok_or_else(|| NcloudError::UnexpectedResponse {
                action: "createNatGatewayInstance".to_string(),
                reason: "empty natGatewayInstanceList".to_string(),
            })?;

        tracing::info!("NAT Gateway ID: {}", nat.nat_gateway_instance_no);
        Ok(nat.nat_gateway_instance_no)
    }

    async fn wait_created(&self, id: &str) -> ncflow_cloud::Result<NatGatewayRecord> {
        let config = creation_wait(self.provider.timeouts())?;
        let nat = wait_for_state(TYPE_NAME, id, &config, move || self.get_nat_gateway(id))
            .await
            .inspect_err(|e| {
                tracing::error!("Error waiting for NAT Gateway ({}) to become available: {}", id, e)
            })?
            .into_reached(TYPE_NAME, id)?;

        Ok(NatGatewayRecord::from(&nat))
    }

    async fn read(&self, id: &str) -> ncflow_cloud::Result<Option<NatGatewayRecord>> {
        Ok(self
            .get_nat_gateway(id)
            .await?
            .as_ref()
            .map(NatGatewayRecord::from))
    }

    async fn update(
        &self,
        id: &str,
        _args: &NatGatewayArgs,
    ) -> ncflow_cloud::Result<Option<NatGatewayRecord>> {
        self.read(id).await
    }

    async fn delete(&self, id: &str) -> ncflow_cloud::Result<()> {
        self.provider.ensure_vpc_supported(TYPE_NAME)?;

        self.provider
            .client()
            .vpc
            .delete_nat_gateway_instance(&self.instance_no_request(id))
            .await?;

        let config = deletion_wait(self.provider.timeouts())?;
        wait_for_state(TYPE_NAME, id, &config, move || self.get_nat_gateway(id))
            .await
            .inspect_err(|e| {
                tracing::error!("Error waiting for NAT Gateway ({}) to be terminated: {}", id, e)
            })?;
        Ok(())
    }
}
