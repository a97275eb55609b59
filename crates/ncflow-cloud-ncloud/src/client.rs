//! NCloud API client bundle
//!
//! One [`ApiClient`] holds a sub-client per NCloud service. All of them share a
//! single `reqwest::Client` and credential set; the bundle is cheap to clone
//! and is passed explicitly to whatever needs it.

use crate::config::{Config, Site};
use crate::error::{NcloudError, Result};
use crate::server::ServerApi;
use crate::vpc::VpcApi;
use crate::vserver::VserverApi;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("ncflow/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const ACCESS_KEY_HEADER: &str = "x-ncp-iam-access-key";
const TIMESTAMP_HEADER: &str = "x-ncp-apigw-timestamp";
const SIGNATURE_HEADER: &str = "x-ncp-apigw-signature-v2";

type HmacSha256 = Hmac<Sha256>;

/// Shared HTTP transport
#[derive(Clone)]
struct Transport {
    http: reqwest::Client,
    access_key: Arc<str>,
    secret_key: Arc<str>,
}

/// Client for one NCloud service (e.g. `vpc/v2`)
#[derive(Clone)]
pub struct ServiceClient {
    transport: Transport,
    base_url: String,
}

impl ServiceClient {
    fn new(transport: Transport, gateway: &str, service_path: &str) -> Self {
        Self {
            transport,
            base_url: format!("{}/{}", gateway, service_path),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call an API action and decode its `<action>Response` body.
    ///
    /// Every request carries the access key, a millisecond timestamp and a
    /// signature made with the secret key over the method, path, query,
    /// timestamp and access key.
    pub(crate) async fn call<P, T>(&self, action: &str, params: &P) -> Result<T>
    where
        P: Serialize + Debug + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, action);
        tracing::debug!(action, params = ?params, "request");

        let mut request = self
            .transport
            .http
            .get(&url)
            .query(params)
            .query(&[("responseFormatType", "json")])
            .build()?;

        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let signature = sign(
            &self.transport.secret_key,
            request.method().as_str(),
            request.url(),
            &timestamp,
            &self.transport.access_key,
        )?;
        let headers = request.headers_mut();
        headers.insert(ACCESS_KEY_HEADER, header_value(&self.transport.access_key)?);
        headers.insert(TIMESTAMP_HEADER, header_value(&timestamp)?);
        headers.insert(SIGNATURE_HEADER, header_value(&signature)?);

        let response = self.transport.http.execute(request).await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            let err = api_error(status.as_u16(), &body);
            tracing::error!(action, params = ?params, "{}", err);
            return Err(err);
        }

        let body: serde_json::Value = serde_json::from_str(&text)?;
        let key = format!("{}Response", action);
        let inner = body
            .get(&key)
            .cloned()
            .ok_or_else(|| NcloudError::UnexpectedResponse {
                action: action.to_string(),
                reason: format!("missing `{}`", key),
            })?;

        let common: CommonResponse = serde_json::from_value(inner.clone())?;
        if let Some(code) = common.return_code.as_deref().filter(|c| *c != "0") {
            let err = NcloudError::Api {
                status: status.as_u16(),
                code: code.to_string(),
                message: common.return_message.unwrap_or_default(),
            };
            tracing::error!(action, params = ?params, "{}", err);
            return Err(err);
        }

        tracing::debug!(
            action,
            request_id = common.request_id.as_deref().unwrap_or(""),
            total_rows = common.total_rows,
            "response"
        );
        Ok(serde_json::from_value(inner)?)
    }
}

/// API gateway signature: base64 HMAC-SHA256 of
/// `{method} {path}?{query}\n{timestamp}\n{access_key}`
fn sign(
    secret_key: &str,
    method: &str,
    url: &reqwest::Url,
    timestamp: &str,
    access_key: &str,
) -> Result<String> {
    let target = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let message = format!("{} {}\n{}\n{}", method, target, timestamp, access_key);

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| NcloudError::InvalidConfig(format!("secret key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn header_value(value: &str) -> Result<reqwest::header::HeaderValue> {
    reqwest::header::HeaderValue::from_str(value)
        .map_err(|_| NcloudError::InvalidConfig(format!("`{}` is not a valid header value", value)))
}

/// Fields present on every NCloud response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonResponse {
    pub request_id: Option<String>,
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub total_rows: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    response_error: ResponseError,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseError {
    return_code: String,
    return_message: String,
}

fn api_error(status: u16, body: &serde_json::Value) -> NcloudError {
    match serde_json::from_value::<ErrorBody>(body.clone()) {
        Ok(ErrorBody { response_error }) => NcloudError::Api {
            status,
            code: response_error.return_code,
            message: response_error.return_message,
        },
        Err(_) => NcloudError::Api {
            status,
            code: "unknown".to_string(),
            message: body.to_string(),
        },
    }
}

/// Per-service clients built from one [`Config`]
#[derive(Clone)]
pub struct ApiClient {
    site: Site,
    pub vpc: VpcApi,
    pub server: ServerApi,
    pub vserver: VserverApi,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let transport = Transport {
            http,
            access_key: Arc::from(config.access_key.as_str()),
            secret_key: Arc::from(config.secret_key.as_str()),
        };
        let gateway = config.gateway();

        Ok(Self {
            site: config.site,
            vpc: VpcApi::new(ServiceClient::new(transport.clone(), gateway, "vpc/v2")),
            server: ServerApi::new(ServiceClient::new(transport.clone(), gateway, "server/v2")),
            vserver: VserverApi::new(ServiceClient::new(transport, gateway, "vserver/v2")),
        })
    }

    pub fn site(&self) -> Site {
        self.site
    }
}
