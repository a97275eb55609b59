//! Resource lifecycle traits
//!
//! Every provider resource type (VPC, NAT gateway, ...) implements
//! [`ManagedResource`]; read-only lookups implement [`DataSource`]. The free
//! functions tie a resource to the local [`GlobalState`] so that handles are
//! recorded, confirmed and cleared consistently across resource types.

use crate::error::{CloudError, Result};
use crate::state::{GlobalState, ResourceState};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Typed local record of a remote object
pub trait ResourceRecord {
    /// Vendor-assigned handle
    fn id(&self) -> &str;

    /// Last observed status code
    fn status(&self) -> &str;
}

/// A remote object type with a create/read/update/delete lifecycle
#[async_trait]
pub trait ManagedResource: Send + Sync {
    /// Desired configuration
    type Args: Send + Sync;

    /// Observed state
    type Record: ResourceRecord + Serialize + DeserializeOwned + Send + Sync;

    /// Resource type name (e.g., "ncloud_vpc")
    fn type_name(&self) -> &'static str;

    /// Issue the create request and return the new handle
    async fn create(&self, args: &Self::Args) -> Result<String>;

    /// Wait until a freshly created object is ready, then read it
    async fn wait_created(&self, id: &str) -> Result<Self::Record>;

    /// Read the object; `None` when it no longer exists
    async fn read(&self, id: &str) -> Result<Option<Self::Record>>;

    /// Apply in-place changes and re-read
    async fn update(&self, id: &str, args: &Self::Args) -> Result<Option<Self::Record>>;

    /// Delete the object and wait until it is gone
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A read-only lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    type Query: Send + Sync;
    type Output: Serialize + Send;

    fn type_name(&self) -> &'static str;

    async fn read(&self, query: &Self::Query) -> Result<Self::Output>;
}

/// State key for a named resource (type:name)
pub fn state_key(resource_type: &str, name: &str) -> String {
    format!("{}:{}", resource_type, name)
}

/// Create a resource and track it under `name`.
///
/// Fails without calling the vendor when `name` is already tracked. The
/// handle is recorded as unconfirmed as soon as the create request succeeds,
/// so a failed wait leaves it in the state for a later refresh.
pub async fn create_record<R: ManagedResource>(
    resource: &R,
    state: &mut GlobalState,
    name: &str,
    args: &R::Args,
) -> Result<R::Record> {
    let key = state_key(resource.type_name(), name);
    if let Some(existing) = state.get_resource(&key) {
        return Err(CloudError::StateError(format!(
            "{} is already tracked as {}; delete or show it first",
            key, existing.id
        )));
    }

    let id = resource.create(args).await?;
    tracing::info!(resource = resource.type_name(), %id, "Created, waiting for it to become ready");
    let mut tracked = ResourceState::unconfirmed(&id, resource.type_name());
    state.set_resource(key.clone(), tracked.clone());

    let record = resource.wait_created(&id).await?;
    tracked.confirm(&record)?;
    state.set_resource(key, tracked);
    Ok(record)
}

/// Re-read a tracked resource and sync the local record.
///
/// A successful read updates status and attributes but never confirms an
/// unconfirmed handle. The record is removed when the object no longer
/// exists or the read fails; in the latter case the error is returned
/// afterwards.
pub async fn refresh_record<R: ManagedResource>(
    resource: &R,
    state: &mut GlobalState,
    name: &str,
) -> Result<Option<R::Record>> {
    let key = state_key(resource.type_name(), name);
    let Some(mut tracked) = state.get_resource(&key).cloned() else {
        return Ok(None);
    };
    let id = tracked.id.clone();

    match resource.read(&id).await {
        Ok(Some(record)) => {
            tracked.observe(&record)?;
            state.set_resource(key, tracked);
            Ok(Some(record))
        }
        Ok(None) => {
            tracing::warn!(resource = resource.type_name(), %id, "Not found, removing from state");
            state.remove_resource(&key);
            Ok(None)
        }
        Err(e) => {
            tracing::error!(resource = resource.type_name(), %id, "Read failed: {}", e);
            state.remove_resource(&key);
            Err(e)
        }
    }
}

/// Delete a tracked resource. Returns `false` when nothing was tracked.
pub async fn destroy_record<R: ManagedResource>(
    resource: &R,
    state: &mut GlobalState,
    name: &str,
) -> Result<bool> {
    let key = state_key(resource.type_name(), name);
    let Some(id) = state.get_resource(&key).map(|r| r.id.clone()) else {
        return Ok(false);
    };

    resource.delete(&id).await?;
    state.remove_resource(&key);
    tracing::info!(resource = resource.type_name(), %id, "Deleted");
    Ok(true)
}
