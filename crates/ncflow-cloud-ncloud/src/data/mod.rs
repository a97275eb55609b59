//! Read-only data sources

pub mod nat_gateway;
pub mod regions;
pub mod zones;

pub use nat_gateway::{NatGatewayLookup, NatGatewayQuery};
pub use regions::{RegionRecord, RegionsLookup, RegionsOutput, RegionsQuery};
pub use zones::{ZoneRecord, ZonesLookup, ZonesOutput, ZonesQuery};

use crate::error::{NcloudError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Stable id for a data source result set
pub fn data_resource_id_hash<S: AsRef<str>>(ids: &[S]) -> String {
    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_ref().as_bytes());
        hasher.update(b"-");
    }
    hex::encode(hasher.finalize())
}

/// Write flattened records as pretty JSON
pub async fn write_to_file<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, content).await?;
    tracing::debug!("Wrote data source output to {}", path.display());
    Ok(())
}

/// Exactly one result, or `NoResults` / `TooManyResults`
pub(crate) fn one_result<T>(items: Vec<T>) -> Result<T> {
    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), count) {
        (Some(item), 1) => Ok(item),
        (None, _) => Err(NcloudError::NoResults),
        (Some(_), n) => Err(NcloudError::TooManyResults(n)),
    }
}
