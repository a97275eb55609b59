//! `ncloud_vpc` resource

use super::{TERMINATING, creation_wait, deletion_wait};
use crate::error::{NcloudError, Result};
use crate::provider::NcloudProvider;
use crate::validate;
use crate::vpc::{CreateVpcRequest, Vpc, VpcNoRequest};
use async_trait::async_trait;
use ncflow_cloud::{CloudError, ManagedResource, ResourceRecord, wait_for_state};
use serde::{Deserialize, Serialize};

const TYPE_NAME: &str = "ncloud_vpc";

/// Desired VPC configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcArgs {
    /// Assigned by NCloud when omitted
    pub name: Option<String>,
    /// Forces a new VPC when changed
    pub ipv4_cidr_block: String,
}

impl VpcArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::instance_name("name", name)?;
        }
        validate::cidr_network(
            "ipv4_cidr_block",
            &self.ipv4_cidr_block,
            validate::VPC_CIDR_PREFIX,
        )?;
        Ok(())
    }
}

/// Observed VPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcRecord {
    pub id: String,
    pub vpc_no: String,
    pub name: Option<String>,
    pub ipv4_cidr_block: Option<String>,
    pub status: String,
    pub default_network_acl_no: Option<String>,
}

impl From<&Vpc> for VpcRecord {
    fn from(vpc: &Vpc) -> Self {
        Self {
            id: vpc.vpc_no.clone(),
            vpc_no: vpc.vpc_no.clone(),
            name: vpc.vpc_name.clone(),
            ipv4_cidr_block: vpc.ipv4_cidr_block.clone(),
            status: vpc.vpc_status.code.clone(),
            default_network_acl_no: None,
        }
    }
}

impl ResourceRecord for VpcRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &str {
        &self.status
    }
}

pub struct VpcResource<'a> {
    provider: &'a NcloudProvider,
}

impl<'a> VpcResource<'a> {
    pub(crate) fn new(provider: &'a NcloudProvider) -> Self {
        Self { provider }
    }

    fn vpc_no_request(&self, id: &str) -> VpcNoRequest {
        VpcNoRequest {
            region_code: self.provider.region().to_string(),
            vpc_no: id.to_string(),
        }
    }

    /// Fetch the VPC; `None` once it no longer exists
    pub async fn get_vpc(&self, id: &str) -> Result<Option<Vpc>> {
        let response = self
            .provider
            .client()
            .vpc
            .get_vpc_detail(&self.vpc_no_request(id))
            .await?;
        Ok(response.vpc_list.into_iter().next())
    }

    /// Number of the VPC's default network ACL
    pub async fn default_network_acl(&self, id: &str) -> Result<String> {
        let response = self
            .provider
            .client()
            .vpc
            .get_network_acl_list(&self.vpc_no_request(id))
            .await?;

        if response.network_acl_list.is_empty() {
            return Err(NcloudError::NoResults);
        }

        response
            .network_acl_list
            .into_iter()
            .find(|acl| acl.is_default)
            .map(|acl| acl.network_acl_no)
            .ok_or_else(|| NcloudError::DefaultAclNotFound(id.to_string()))
    }
}

#[async_trait]
impl ManagedResource for VpcResource<'_> {
    type Args = VpcArgs;
    type Record = VpcRecord;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    async fn create(&self, args: &VpcArgs) -> ncflow_cloud::Result<String> {
        self.provider.ensure_vpc_supported(TYPE_NAME)?;
        args.validate()?;

        let request = CreateVpcRequest {
            region_code: self.provider.region().to_string(),
            ipv4_cidr_block: args.ipv4_cidr_block.clone(),
            vpc_name: args.name.clone(),
        };
        let response = self.provider.client().vpc.create_vpc(&request).await?;

        let vpc = response
            .vpc_list
            .into_iter()
            .next()
            .ok_or_else(|| NcloudError::UnexpectedResponse {
                action: "createVpc".to_string(),
                reason: "empty vpcList".to_string(),
            })?;

        tracing::info!("VPC ID: {}", vpc.vpc_no);
        Ok(vpc.vpc_no)
    }

    async fn wait_created(&self, id: &str) -> ncflow_cloud::Result<VpcRecord> {
        let config = creation_wait(self.provider.timeouts())?;
        wait_for_state(TYPE_NAME, id, &config, move || self.get_vpc(id))
            .await
            .inspect_err(|e| {
                tracing::error!("Error waiting for VPC ({}) to become available: {}", id, e)
            })?
            .into_reached(TYPE_NAME, id)?;

        self.read(id)
            .await?
            .ok_or_else(|| CloudError::ResourceNotFound(format!("VPC ({})", id)))
    }

    async fn read(&self, id: &str) -> ncflow_cloud::Result<Option<VpcRecord>> {
        let Some(vpc) = self.get_vpc(id).await? else {
            return Ok(None);
        };

        let mut record = VpcRecord::from(&vpc);
        if record.status != TERMINATING {
            let acl = self.default_network_acl(id).await.map_err(|e| {
                CloudError::ApiError(format!(
                    "Error getting default network ACL for VPC ({}): {}",
                    id, e
                ))
            })?;
            record.default_network_acl_no = Some(acl);
        }
        Ok(Some(record))
    }

    async fn update(&self, id: &str, _args: &VpcArgs) -> ncflow_cloud::Result<Option<VpcRecord>> {
        self.read(id).await
    }

    async fn delete(&self, id: &str) -> ncflow_cloud::Result<()> {
        self.provider.ensure_vpc_supported(TYPE_NAME)?;

        self.provider
            .client()
            .vpc
            .delete_vpc(&self.vpc_no_request(id))
            .await?;

        let config = deletion_wait(self.provider.timeouts())?;
        let outcome = wait_for_state(TYPE_NAME, id, &config, move || self.get_vpc(id))
            .await
            .inspect_err(|e| {
                tracing::error!("Error waiting for VPC ({}) to be terminated: {}", id, e)
            })?;

        if outcome.is_gone() {
            tracing::debug!("VPC ({}) no longer listed", id);
        }
        Ok(())
    }
}
