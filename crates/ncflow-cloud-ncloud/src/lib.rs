//! NAVER CLOUD PLATFORM provider for ncflow
//!
//! This crate talks to the NCloud REST API and implements the
//! [`ManagedResource`](ncflow_cloud::ManagedResource) and
//! [`DataSource`](ncflow_cloud::DataSource) traits for NCloud objects.
//!
//! # Features
//!
//! - VPC (`ncloud_vpc`) and NAT gateway (`ncloud_nat_gateway`) lifecycle,
//!   waiting on status codes until the object settles
//! - Region, zone and NAT gateway lookups, optionally written to a JSON file
//! - Public, gov and fin sites, classic and VPC platforms
//!
//! # Requirements
//!
//! - `NCLOUD_ACCESS_KEY` and `NCLOUD_SECRET_KEY` env vars
//! - `NCLOUD_SUPPORT_VPC=true` (or `NCLOUD_SITE=fin`) for VPC resources
//!
//! # Example
//!
//! ```ignore
//! use ncflow_cloud::{GlobalState, create_record};
//! use ncflow_cloud_ncloud::{Config, NcloudProvider, VpcArgs};
//!
//! let provider = NcloudProvider::new(&Config::from_env()?)?;
//! let mut state = GlobalState::new();
//!
//! let args = VpcArgs {
//!     name: Some("main".to_string()),
//!     ipv4_cidr_block: "10.0.0.0/16".to_string(),
//! };
//! let vpc = create_record(&provider.vpc(), &mut state, "main", &args).await?;
//! println!("{} is {}", vpc.vpc_no, vpc.status);
//! ```

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod provider;
pub mod resources;
pub mod server;
pub mod types;
pub mod validate;
pub mod vpc;
pub mod vserver;

pub use client::{ApiClient, ServiceClient};
pub use config::{Config, Site, Timeouts};
pub use data::{
    NatGatewayLookup, NatGatewayQuery, RegionRecord, RegionsLookup, RegionsOutput, RegionsQuery,
    ZoneRecord, ZonesLookup, ZonesOutput, ZonesQuery,
};
pub use error::{NcloudError, Result};
pub use provider::NcloudProvider;
pub use resources::{
    NatGatewayArgs, NatGatewayRecord, NatGatewayResource, VpcArgs, VpcRecord, VpcResource,
};
