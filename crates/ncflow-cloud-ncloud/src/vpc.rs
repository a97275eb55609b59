//! VPC API (`vpc/v2`)
//!
//! Only the calls used by the VPC and NAT gateway resources are modelled.

use crate::client::ServiceClient;
use crate::error::Result;
use crate::types::CommonCode;
use ncflow_cloud::Snapshot;
use serde::{Deserialize, Serialize};

// ============ Models ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub vpc_no: String,
    pub vpc_name: Option<String>,
    pub ipv4_cidr_block: Option<String>,
    #[serde(default)]
    pub vpc_status: CommonCode,
    pub region_code: Option<String>,
    pub create_date: Option<String>,
}

impl Snapshot for Vpc {
    fn status(&self) -> &str {
        &self.vpc_status.code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGatewayInstance {
    pub nat_gateway_instance_no: String,
    pub nat_gateway_name: Option<String>,
    pub nat_gateway_description: Option<String>,
    pub public_ip: Option<String>,
    pub vpc_no: Option<String>,
    pub zone_code: Option<String>,
    #[serde(default)]
    pub nat_gateway_instance_status: CommonCode,
    pub region_code: Option<String>,
    pub create_date: Option<String>,
}

impl Snapshot for NatGatewayInstance {
    fn status(&self) -> &str {
        &self.nat_gateway_instance_status.code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAcl {
    pub network_acl_no: String,
    pub network_acl_name: Option<String>,
    pub vpc_no: Option<String>,
    #[serde(default)]
    pub network_acl_status: CommonCode,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcListResponse {
    #[serde(default)]
    pub vpc_list: Vec<Vpc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGatewayInstanceListResponse {
    #[serde(default)]
    pub nat_gateway_instance_list: Vec<NatGatewayInstance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclListResponse {
    #[serde(default)]
    pub network_acl_list: Vec<NetworkAcl>,
}

// ============ Requests ============

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVpcRequest {
    pub region_code: String,
    pub ipv4_cidr_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcNoRequest {
    pub region_code: String,
    pub vpc_no: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNatGatewayInstanceRequest {
    pub region_code: String,
    pub vpc_no: String,
    pub zone_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_gateway_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_gateway_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatGatewayInstanceNoRequest {
    pub region_code: String,
    pub nat_gateway_instance_no: String,
}

// ============ Client ============

#[derive(Clone)]
pub struct VpcApi {
    service: ServiceClient,
}

impl VpcApi {
    pub(crate) fn new(service: ServiceClient) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ServiceClient {
        &self.service
    }

    pub async fn create_vpc(&self, request: &CreateVpcRequest) -> Result<VpcListResponse> {
        self.service.call("createVpc", request).await
    }

    pub async fn get_vpc_detail(&self, request: &VpcNoRequest) -> Result<VpcListResponse> {
        self.service.call("getVpcDetail", request).await
    }

    pub async fn delete_vpc(&self, request: &VpcNoRequest) -> Result<VpcListResponse> {
        self.service.call("deleteVpc", request).await
    }

    pub async fn get_network_acl_list(
        &self,
        request: &VpcNoRequest,
    ) -> Result<NetworkAclListResponse> {
        self.service.call("getNetworkAclList", request).await
    }

    pub async fn create_nat_gateway_instance(
        &self,
        request: &CreateNatGatewayInstanceRequest,
    ) -> Result<NatGatewayInstanceListResponse> {
        self.service.call("createNatGatewayInstance", request).await
    }

    pub async fn get_nat_gateway_instance_detail(
        &self,
        request: &NatGatewayInstanceNoRequest,
    ) -> Result<NatGatewayInstanceListResponse> {
        self.service
            .call("getNatGatewayInstanceDetail", request)
            .await
    }

    pub async fn delete_nat_gateway_instance(
        &self,
        request: &NatGatewayInstanceNoRequest,
    ) -> Result<NatGatewayInstanceListResponse> {
        self.service.call("deleteNatGatewayInstance", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vpc_snapshot_status() {
        let vpc: Vpc = serde_json::from_value(json!({
            "vpcNo": "1001",
            "vpcName": "main",
            "ipv4CidrBlock": "10.0.0.0/16",
            "vpcStatus": { "code": "CREATING", "codeName": "creating" },
            "regionCode": "KR"
        }))
        .unwrap();

        assert_eq!(vpc.status(), "CREATING");
        assert_eq!(vpc.vpc_status.code_name.as_deref(), Some("creating"));
    }

    #[test]
    fn test_missing_status_is_empty() {
        let nat: NatGatewayInstance = serde_json::from_value(json!({
            "natGatewayInstanceNo": "77"
        }))
        .unwrap();

        assert_eq!(nat.status(), "");
    }

    #[test]
    fn test_create_request_omits_empty_name() {
        let request = CreateVpcRequest {
            region_code: "KR".to_string(),
            ipv4_cidr_block: "10.0.0.0/16".to_string(),
            vpc_name: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "regionCode": "KR", "ipv4CidrBlock": "10.0.0.0/16" })
        );
    }
}
