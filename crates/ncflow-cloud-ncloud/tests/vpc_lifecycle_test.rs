mod common;

use common::{calls, nat_gateway, provider, reply, reply_once, vpc};
use ncflow_cloud::{
    CloudError, GlobalState, ManagedResource, create_record, destroy_record, refresh_record,
};
use ncflow_cloud_ncloud::{NatGatewayArgs, Timeouts, VpcArgs};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn vpc_args() -> VpcArgs {
    VpcArgs {
        name: Some("main".to_string()),
        ipv4_cidr_block: "10.0.0.0/16".to_string(),
    }
}

async fn mount_default_acl(server: &MockServer) {
    reply(
        server,
        "vpc/v2",
        "getNetworkAclList",
        json!({
            "networkAclList": [
                { "networkAclNo": "3001", "isDefault": false },
                { "networkAclNo": "2002", "isDefault": true }
            ]
        }),
    )
    .await;
}

#[tokio::test]
async fn test_vpc_create_waits_until_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vpc/v2/createVpc"))
        .and(query_param("ipv4CidrBlock", "10.0.0.0/16"))
        .and(query_param("vpcName", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::envelope(
            "createVpc",
            json!({ "vpcList": [vpc("1001", "INIT")] }),
        )))
        .expect(1)
        .mount(&server)
        .await;
    reply_once(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "CREATING")] }))
        .await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "RUN")] })).await;
    mount_default_acl(&server).await;

    let provider = provider(&server, true);
    let mut state = GlobalState::new();

    let record = create_record(&provider.vpc(), &mut state, "main", &vpc_args())
        .await
        .unwrap();

    assert_eq!(record.vpc_no, "1001");
    assert_eq!(record.status, "RUN");
    assert_eq!(record.default_network_acl_no.as_deref(), Some("2002"));

    let tracked = state.get_resource("ncloud_vpc:main").unwrap();
    assert!(tracked.confirmed);
    assert_eq!(tracked.id, "1001");

    // CREATING, RUN, then the final read
    assert_eq!(calls(&server, "vpc/v2", "getVpcDetail").await, 3);
}

#[tokio::test]
async fn test_vpc_create_timeout_keeps_unconfirmed_handle() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "createVpc", json!({ "vpcList": [vpc("1001", "INIT")] })).await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "CREATING")] })).await;

    let provider = provider(&server, true).with_timeouts(Timeouts {
        create: Duration::from_millis(300),
        ..common::fast_timeouts()
    });
    let mut state = GlobalState::new();

    let err = create_record(&provider.vpc(), &mut state, "main", &vpc_args())
        .await
        .unwrap_err();

    match err {
        CloudError::WaitTimeout {
            resource,
            id,
            last_state,
            ..
        } => {
            assert_eq!(resource, "ncloud_vpc");
            assert_eq!(id, "1001");
            assert_eq!(last_state, "CREATING");
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    let tracked = state.get_resource("ncloud_vpc:main").unwrap();
    assert_eq!(tracked.id, "1001");
    assert!(!tracked.confirmed);
}

#[tokio::test]
async fn test_vpc_requires_vpc_environment() {
    let server = MockServer::start().await;
    let provider = provider(&server, false);
    let mut state = GlobalState::new();

    let err = create_record(&provider.vpc(), &mut state, "main", &vpc_args())
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::InvalidConfig(ref msg) if msg.contains("VPC environment only")));
    assert!(state.get_resource("ncloud_vpc:main").is_none());
    assert_eq!(calls(&server, "vpc/v2", "createVpc").await, 0);
}

#[tokio::test]
async fn test_vpc_invalid_cidr_is_rejected_before_request() {
    let server = MockServer::start().await;
    let provider = provider(&server, true);

    let args = VpcArgs {
        name: None,
        ipv4_cidr_block: "10.0.0.1/16".to_string(),
    };
    let err = provider.vpc().create(&args).await.unwrap_err();

    assert!(matches!(err, CloudError::InvalidConfig(_)));
    assert_eq!(calls(&server, "vpc/v2", "createVpc").await, 0);
}

#[tokio::test]
async fn test_vpc_create_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vpc/v2/createVpc"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "responseError": {
                "returnCode": "200",
                "returnMessage": "Authentication Failed"
            }
        })))
        .mount(&server)
        .await;

    let provider = provider(&server, true);
    let err = provider.vpc().create(&vpc_args()).await.unwrap_err();

    assert!(matches!(err, CloudError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_vpc_delete_until_gone() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "deleteVpc", json!({ "vpcList": [vpc("1001", "TERMTING")] })).await;
    reply_once(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "TERMTING")] }))
        .await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [] })).await;

    let provider = provider(&server, true);
    let mut state = GlobalState::new();
    state.set_resource(
        "ncloud_vpc:main".to_string(),
        ncflow_cloud::ResourceState::unconfirmed("1001", "ncloud_vpc"),
    );

    let deleted = destroy_record(&provider.vpc(), &mut state, "main").await.unwrap();

    assert!(deleted);
    assert!(state.get_resource("ncloud_vpc:main").is_none());
    assert_eq!(calls(&server, "vpc/v2", "getVpcDetail").await, 2);
}

#[tokio::test]
async fn test_vpc_read_terminating_skips_acl_lookup() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "TERMTING")] })).await;

    let provider = provider(&server, true);
    let record = provider.vpc().read("1001").await.unwrap().unwrap();

    assert_eq!(record.status, "TERMTING");
    assert_eq!(record.default_network_acl_no, None);
    assert_eq!(calls(&server, "vpc/v2", "getNetworkAclList").await, 0);
}

#[tokio::test]
async fn test_vpc_read_without_default_acl_fails() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [vpc("1001", "RUN")] })).await;
    reply(
        &server,
        "vpc/v2",
        "getNetworkAclList",
        json!({ "networkAclList": [{ "networkAclNo": "3001", "isDefault": false }] }),
    )
    .await;

    let provider = provider(&server, true);
    let err = provider.vpc().read("1001").await.unwrap_err();

    assert!(err.to_string().contains("default network ACL"));
}

#[tokio::test]
async fn test_refresh_clears_vanished_vpc() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "getVpcDetail", json!({ "vpcList": [] })).await;

    let provider = provider(&server, true);
    let mut state = GlobalState::new();
    state.set_resource(
        "ncloud_vpc:main".to_string(),
        ncflow_cloud::ResourceState::unconfirmed("1001", "ncloud_vpc"),
    );

    let record = refresh_record(&provider.vpc(), &mut state, "main").await.unwrap();

    assert!(record.is_none());
    assert!(state.get_resource("ncloud_vpc:main").is_none());
}

#[tokio::test]
async fn test_create_tracked_vpc_sends_no_request() {
    let server = MockServer::start().await;
    reply(&server, "vpc/v2", "createVpc", json!({ "vpcList": [vpc("1002", "INIT")] })).await;

    let provider = provider(&server, true);
    let mut state = GlobalState::new();
    state.set_resource(
        "ncloud_vpc:main".to_string(),
        ncflow_cloud::ResourceState::unconfirmed("1001", "ncloud_vpc"),
    );

    let err = create_record(&provider.vpc(), &mut state, "main", &vpc_args())
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::StateError(_)));
    assert_eq!(calls(&server, "vpc/v2", "createVpc").await, 0);
    assert_eq!(state.get_resource("ncloud_vpc:main").unwrap().id, "1001");
}

#[tokio::test]
async fn test_nat_gateway_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vpc/v2/createNatGatewayInstance"))
        .and(query_param("vpcNo", "1001"))
        .and(query_param("zoneCode", "KR-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::envelope(
            "createNatGatewayInstance",
            json!({ "natGatewayInstanceList": [nat_gateway("77", "INIT")] }),
        )))
        .mount(&server)
        .await;
    reply_once(
        &server,
        "vpc/v2",
        "getNatGatewayInstanceDetail",
        json!({ "natGatewayInstanceList": [nat_gateway("77", "CREATING")] }),
    )
    .await;
    reply_once(
        &server,
        "vpc/v2",
        "getNatGatewayInstanceDetail",
        json!({ "natGatewayInstanceList": [nat_gateway("77", "RUN")] }),
    )
    .await;
    reply(
        &server,
        "vpc/v2",
        "deleteNatGatewayInstance",
        json!({ "natGatewayInstanceList": [nat_gateway("77", "TERMTING")] }),
    )
    .await;
    reply(
        &server,
        "vpc/v2",
        "getNatGatewayInstanceDetail",
        json!({ "natGatewayInstanceList": [nat_gateway("77", "TERMINATED")] }),
    )
    .await;

    let provider = provider(&server, true);
    let mut state = GlobalState::new();
    let args = NatGatewayArgs {
        name: Some("nat-a".to_string()),
        description: Some("egress".to_string()),
        vpc_no: "1001".to_string(),
        zone: "KR-1".to_string(),
    };

    let record = create_record(&provider.nat_gateway(), &mut state, "egress", &args)
        .await
        .unwrap();
    assert_eq!(record.nat_gateway_no, "77");
    assert_eq!(record.status, "RUN");
    assert_eq!(record.public_ip.as_deref(), Some("203.0.113.10"));
    assert!(state.get_resource("ncloud_nat_gateway:egress").unwrap().confirmed);

    let deleted = destroy_record(&provider.nat_gateway(), &mut state, "egress")
        .await
        .unwrap();
    assert!(deleted);
    assert!(state.get_resource("ncloud_nat_gateway:egress").is_none());
}
