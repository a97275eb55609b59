//! NCloud provider error types

use ncflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NcloudError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("NCloud API error {code} (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response from {action}: {reason}")]
    UnexpectedResponse { action: String, reason: String },

    #[error("No results. Please change search criteria and try again")]
    NoResults,

    #[error("More than one result found ({0}). Please change search criteria and try again")]
    TooManyResults(usize),

    #[error("No matching default network ACL found for VPC ({0})")]
    DefaultAclNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] CloudError),
}

impl NcloudError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        NcloudError::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<NcloudError> for CloudError {
    fn from(err: NcloudError) -> Self {
        match err {
            NcloudError::CloudError(e) => e,
            NcloudError::IoError(e) => CloudError::Io(e),
            NcloudError::JsonError(e) => CloudError::Json(e),
            NcloudError::NoResults => CloudError::ResourceNotFound(err.to_string()),
            NcloudError::Api { status, .. } if status == 401 || status == 403 => {
                CloudError::AuthenticationFailed(err.to_string())
            }
            NcloudError::MissingEnvVar(_)
            | NcloudError::InvalidConfig(_)
            | NcloudError::InvalidArgument { .. } => CloudError::InvalidConfig(err.to_string()),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NcloudError>;
