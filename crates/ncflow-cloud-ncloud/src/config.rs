//! Provider configuration

use crate::client::ApiClient;
use crate::error::{NcloudError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Timeout for create operations
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Timeout for everything else (delete)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Delay before the first status check after a request
pub const DEFAULT_WAIT_DELAY: Duration = Duration::from_secs(2);

/// Minimum spacing between status checks
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(3);

pub const DEFAULT_REGION: &str = "KR";

/// NCloud site (separate API gateways and account spaces)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Site {
    #[default]
    Public,
    Gov,
    Fin,
}

impl Site {
    /// Default API gateway for the site
    pub fn api_gateway(&self) -> &'static str {
        match self {
            Site::Public => "https://ncloud.apigw.ntruss.com",
            Site::Gov => "https://ncloud.apigw.gov-ntruss.com",
            Site::Fin => "https://fin-ncloud.apigw.fin-ntruss.com",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Public => write!(f, "public"),
            Site::Gov => write!(f, "gov"),
            Site::Fin => write!(f, "fin"),
        }
    }
}

impl FromStr for Site {
    type Err = NcloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "public" => Ok(Site::Public),
            "gov" => Ok(Site::Gov),
            "fin" => Ok(Site::Fin),
            other => Err(NcloudError::InvalidConfig(format!(
                "unknown site `{}` (expected public, gov or fin)",
                other
            ))),
        }
    }
}

/// Credentials and endpoint selection
#[derive(Clone)]
pub struct Config {
    pub access_key: String,
    /// Signs every API request; never sent itself
    pub secret_key: String,
    pub site: Site,
    pub region: String,
    /// Use VPC platform APIs on the public/gov sites
    pub support_vpc: bool,
    /// Overrides the site's API gateway
    pub api_gateway: Option<String>,
}

impl Config {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            site: Site::default(),
            region: DEFAULT_REGION.to_string(),
            support_vpc: false,
            api_gateway: None,
        }
    }

    /// Create Config from environment variables
    pub fn from_env() -> Result<Self> {
        let access_key = std::env::var("NCLOUD_ACCESS_KEY")
            .map_err(|_| NcloudError::MissingEnvVar("NCLOUD_ACCESS_KEY".to_string()))?;
        let secret_key = std::env::var("NCLOUD_SECRET_KEY")
            .map_err(|_| NcloudError::MissingEnvVar("NCLOUD_SECRET_KEY".to_string()))?;

        let site = match std::env::var("NCLOUD_SITE") {
            Ok(site) => site.parse()?,
            Err(_) => Site::default(),
        };
        let region = std::env::var("NCLOUD_REGION")
            .ok()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let support_vpc = match std::env::var("NCLOUD_SUPPORT_VPC") {
            Ok(v) => parse_bool("NCLOUD_SUPPORT_VPC", &v)?,
            Err(_) => false,
        };
        let api_gateway = std::env::var("NCLOUD_API_GW")
            .ok()
            .filter(|gw| !gw.is_empty());

        Ok(Self {
            access_key,
            secret_key,
            site,
            region,
            support_vpc,
            api_gateway,
        })
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.site = site;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_support_vpc(mut self, support_vpc: bool) -> Self {
        self.support_vpc = support_vpc;
        self
    }

    pub fn with_api_gateway(mut self, api_gateway: impl Into<String>) -> Self {
        self.api_gateway = Some(api_gateway.into());
        self
    }

    /// API gateway base URL, without a trailing slash
    pub fn gateway(&self) -> &str {
        self.api_gateway
            .as_deref()
            .unwrap_or_else(|| self.site.api_gateway())
            .trim_end_matches('/')
    }

    /// Whether VPC platform resources are available
    pub fn supports_vpc(&self) -> bool {
        self.site == Site::Fin || self.support_vpc
    }

    /// Build the API client bundle
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("site", &self.site)
            .field("region", &self.region)
            .field("support_vpc", &self.support_vpc)
            .field("api_gateway", &self.api_gateway)
            .finish()
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        _ => Err(NcloudError::InvalidConfig(format!(
            "{} must be a boolean, got `{}`",
            name, value
        ))),
    }
}

/// Wait timings for create/delete operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub delete: Duration,
    pub delay: Duration,
    pub min_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: DEFAULT_CREATE_TIMEOUT,
            delete: DEFAULT_TIMEOUT,
            delay: DEFAULT_WAIT_DELAY,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 6] = [
        "NCLOUD_ACCESS_KEY",
        "NCLOUD_SECRET_KEY",
        "NCLOUD_SITE",
        "NCLOUD_REGION",
        "NCLOUD_SUPPORT_VPC",
        "NCLOUD_API_GW",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_from_env_defaults() {
        let mut vars = cleared();
        vars[0].1 = Some("AK");
        vars[1].1 = Some("SK");

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.access_key, "AK");
            assert_eq!(config.site, Site::Public);
            assert_eq!(config.region, "KR");
            assert!(!config.supports_vpc());
            assert_eq!(config.gateway(), "https://ncloud.apigw.ntruss.com");
        });
    }

    #[test]
    fn test_from_env_fin_site() {
        let mut vars = cleared();
        vars[0].1 = Some("AK");
        vars[1].1 = Some("SK");
        vars[2].1 = Some("fin");
        vars[3].1 = Some("FKR");

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.site, Site::Fin);
            assert_eq!(config.region, "FKR");
            assert!(config.supports_vpc());
            assert_eq!(config.gateway(), "https://fin-ncloud.apigw.fin-ntruss.com");
        });
    }

    #[test]
    fn test_from_env_gateway_override() {
        let mut vars = cleared();
        vars[0].1 = Some("AK");
        vars[1].1 = Some("SK");
        vars[4].1 = Some("true");
        vars[5].1 = Some("http://localhost:8080/");

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert!(config.supports_vpc());
            assert_eq!(config.gateway(), "http://localhost:8080");
        });
    }

    #[test]
    fn test_from_env_missing_key() {
        temp_env::with_vars(cleared(), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, NcloudError::MissingEnvVar(ref v) if v == "NCLOUD_ACCESS_KEY"));
        });
    }

    #[test]
    fn test_from_env_missing_secret() {
        let mut vars = cleared();
        vars[0].1 = Some("AK");

        temp_env::with_vars(vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, NcloudError::MissingEnvVar(ref v) if v == "NCLOUD_SECRET_KEY"));
        });
    }

    #[test]
    fn test_from_env_invalid_values() {
        let mut vars = cleared();
        vars[0].1 = Some("AK");
        vars[1].1 = Some("SK");
        vars[4].1 = Some("maybe");

        temp_env::with_vars(vars, || {
            assert!(matches!(
                Config::from_env(),
                Err(NcloudError::InvalidConfig(_))
            ));
        });
    }

    #[test]
    fn test_site_parse() {
        assert_eq!("GOV".parse::<Site>().unwrap(), Site::Gov);
        assert_eq!("".parse::<Site>().unwrap(), Site::Public);
        assert!("moon".parse::<Site>().is_err());
        assert_eq!(Site::Fin.to_string(), "fin");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::new("AK", "very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("AK"));
    }
}
