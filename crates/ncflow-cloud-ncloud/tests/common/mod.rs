//! Shared helpers for tests against a mocked NCloud API gateway

#![allow(dead_code)]

use ncflow_cloud_ncloud::{Config, NcloudProvider, Timeouts};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Timings short enough for real-clock tests
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        create: Duration::from_secs(5),
        delete: Duration::from_secs(5),
        delay: Duration::from_millis(10),
        min_interval: Duration::from_millis(10),
    }
}

pub fn provider(server: &MockServer, support_vpc: bool) -> NcloudProvider {
    let config = Config::new("AK", "SK")
        .with_api_gateway(server.uri())
        .with_support_vpc(support_vpc);
    NcloudProvider::new(&config)
        .unwrap()
        .with_timeouts(fast_timeouts())
}

/// `{action}Response` envelope with a successful return code
pub fn envelope(action: &str, mut body: Value) -> Value {
    if let Some(map) = body.as_object_mut() {
        map.insert("requestId".to_string(), json!("req-test"));
        map.insert("returnCode".to_string(), json!("0"));
        map.insert("returnMessage".to_string(), json!("success"));
    }
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(format!("{}Response", action), body);
    Value::Object(wrapped)
}

pub fn vpc(vpc_no: &str, status: &str) -> Value {
    json!({
        "vpcNo": vpc_no,
        "vpcName": "main",
        "ipv4CidrBlock": "10.0.0.0/16",
        "vpcStatus": { "code": status, "codeName": status.to_lowercase() },
        "regionCode": "KR"
    })
}

pub fn nat_gateway(no: &str, status: &str) -> Value {
    json!({
        "natGatewayInstanceNo": no,
        "natGatewayName": "nat-a",
        "publicIp": "203.0.113.10",
        "vpcNo": "1001",
        "zoneCode": "KR-1",
        "natGatewayInstanceStatus": { "code": status, "codeName": status.to_lowercase() }
    })
}

/// Mount a single-use reply for `service/action`
pub async fn reply_once(server: &MockServer, service: &str, action: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/{}", service, action)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(action, body)))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Mount a reply for `service/action` used once earlier mocks are exhausted
pub async fn reply(server: &MockServer, service: &str, action: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/{}", service, action)))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(action, body)))
        .mount(server)
        .await;
}

/// Number of requests received for `service/action`
pub async fn calls(server: &MockServer, service: &str, action: &str) -> usize {
    let wanted = format!("/{}/{}", service, action);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}
