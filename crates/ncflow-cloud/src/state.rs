//! Local resource records
//!
//! Manages the `.ncflow/state.json` file which maps local resource names to
//! the vendor handles and last observed attributes of the objects they created.

use crate::error::{CloudError, Result};
use crate::provider::ResourceRecord;
use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".ncflow";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const STATE_STAGING: &str = "state.json.tmp";
const LOCK_FILE: &str = "lock.json";

/// Locks older than this are taken over
const STALE_LOCK_HOURS: i64 = 1;

/// All tracked resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalState {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Records indexed by type:name
    pub resources: BTreeMap<String, ResourceState>,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of one resource type
    pub fn resources_of_type(&self, resource_type: &str) -> Vec<(&String, &ResourceState)> {
        self.resources
            .iter()
            .filter(|(_, r)| r.resource_type == resource_type)
            .collect()
    }

    pub fn set_resource(&mut self, key: String, state: ResourceState) {
        self.resources.insert(key, state);
        self.updated_at = Utc::now();
    }

    pub fn remove_resource(&mut self, key: &str) -> Option<ResourceState> {
        let result = self.resources.remove(key);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    pub fn get_resource(&self, key: &str) -> Option<&ResourceState> {
        self.resources.get(key)
    }
}

/// Local record of a single remote object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Vendor-assigned handle
    pub id: String,

    /// Resource type
    pub resource_type: String,

    /// Last observed status code; empty until confirmed
    pub status: String,

    /// Whether the object was observed ready after creation
    pub confirmed: bool,

    /// Serialized typed record
    pub attributes: serde_json::Value,

    /// When the handle was first recorded
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    /// A handle whose object has not been observed ready yet
    pub fn unconfirmed(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            status: String::new(),
            confirmed: false,
            attributes: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_record<R>(resource_type: impl Into<String>, record: &R) -> Result<Self>
    where
        R: ResourceRecord + Serialize,
    {
        let mut state = Self::unconfirmed(record.id(), resource_type);
        state.confirm(record)?;
        Ok(state)
    }

    /// Store a fresh read without touching the confirmed flag
    pub fn observe<R>(&mut self, record: &R) -> Result<()>
    where
        R: ResourceRecord + Serialize,
    {
        self.status = record.status().to_string();
        self.attributes = serde_json::to_value(record)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Store the read that showed the object ready
    pub fn confirm<R>(&mut self, record: &R) -> Result<()>
    where
        R: ResourceRecord + Serialize,
    {
        self.observe(record)?;
        self.confirmed = true;
        Ok(())
    }

    /// Deserialize the typed record back out of the attributes
    pub fn record<R: DeserializeOwned>(&self) -> Result<R> {
        if !self.confirmed {
            return Err(CloudError::StateError(format!(
                "{} ({}) has not been confirmed yet",
                self.resource_type, self.id
            )));
        }
        Ok(serde_json::from_value(self.attributes.clone())?)
    }
}

/// Reads and writes the `.ncflow` directory of one project
pub struct StateManager {
    dir: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            dir: project_root.as_ref().join(STATE_DIR),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    async fn create_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Load the records; no file yet means nothing is tracked
    pub async fn load(&self) -> Result<GlobalState> {
        let path = self.state_path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No state at {}, starting empty", path.display());
                return Ok(GlobalState::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: GlobalState = serde_json::from_str(&content)?;
        if state.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "{} has version {}, this build reads up to {}",
                path.display(),
                state.version,
                STATE_VERSION
            )));
        }

        tracing::debug!(records = state.resources.len(), "Loaded state");
        Ok(state)
    }

    /// Write the records.
    ///
    /// The new content goes to a staging file first and is renamed over
    /// `state.json`, so a failed write leaves the previous file in place.
    /// The previous file is copied to `state.json.backup` before the rename.
    pub async fn save(&self, state: &GlobalState) -> Result<()> {
        self.create_dir().await?;

        let path = self.state_path();
        let staging = self.dir.join(STATE_STAGING);
        fs::write(&staging, serde_json::to_vec_pretty(state)?).await?;

        match fs::copy(&path, self.dir.join(STATE_BACKUP)).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::rename(&staging, &path).await?;

        tracing::debug!(records = state.resources.len(), "Saved state");
        Ok(())
    }

    /// Take the project lock.
    ///
    /// A lock older than an hour is assumed abandoned and replaced; a
    /// younger one fails with [`CloudError::LockError`].
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.create_dir().await?;
        let path = self.lock_path();

        if let Some(lock) = StateLock::try_create(&path).await? {
            return Ok(lock);
        }

        let holder = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<LockHolder>(&content).ok(),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        match holder {
            Some(holder) if holder.is_stale(Utc::now()) => {
                tracing::warn!(
                    host = %holder.host,
                    pid = holder.pid,
                    "Taking over lock held since {}",
                    holder.acquired_at
                );
                match fs::remove_file(&path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Some(holder) => {
                return Err(CloudError::LockError(format!(
                    "{} is held by {} (pid {}) since {}",
                    path.display(),
                    holder.host,
                    holder.pid,
                    holder.acquired_at
                )));
            }
            None => {
                return Err(CloudError::LockError(format!(
                    "{} is being taken by another process",
                    path.display()
                )));
            }
        }

        StateLock::try_create(&path).await?.ok_or_else(|| {
            CloudError::LockError(format!("{} was taken by another process", path.display()))
        })
    }
}

/// Contents of `lock.json`
#[derive(Debug, Serialize, Deserialize)]
struct LockHolder {
    host: String,
    pid: u32,
    acquired_at: DateTime<Utc>,
}

impl LockHolder {
    fn current() -> Self {
        Self {
            host: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }

    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.acquired_at) >= TimeDelta::hours(STALE_LOCK_HOURS)
    }
}

/// Held project lock; the lock file is removed on release or drop
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
    held: bool,
}

impl StateLock {
    /// Create the lock file unless it already exists
    async fn try_create(path: &Path) -> Result<Option<Self>> {
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let lock = Self {
            path: path.to_path_buf(),
            held: true,
        };
        file.write_all(&serde_json::to_vec_pretty(&LockHolder::current())?)
            .await?;
        file.flush().await?;

        tracing::debug!("Locked {}", path.display());
        Ok(Some(lock))
    }

    pub async fn release(mut self) -> Result<()> {
        self.held = false;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Unlocked {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if self.held {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Net {
        id: String,
        status: String,
        cidr: String,
    }

    impl ResourceRecord for Net {
        fn id(&self) -> &str {
            &self.id
        }

        fn status(&self) -> &str {
            &self.status
        }
    }

    fn net() -> Net {
        Net {
            id: "1001".to_string(),
            status: "RUN".to_string(),
            cidr: "10.0.0.0/16".to_string(),
        }
    }

    #[tokio::test]
    async fn test_state_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = GlobalState::new();
        state.set_resource(
            "ncloud_vpc:main".to_string(),
            ResourceState::from_record("ncloud_vpc", &net()).unwrap(),
        );

        manager.save(&state).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.resources.len(), 1);
        let record: Net = loaded.get_resource("ncloud_vpc:main").unwrap().record().unwrap();
        assert_eq!(record, net());
    }

    #[tokio::test]
    async fn test_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        manager.save(&GlobalState::new()).await.unwrap();
        manager.save(&GlobalState::new()).await.unwrap();

        assert!(temp_dir.path().join(".ncflow/state.json.backup").exists());
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = manager.load().await.unwrap();
        assert!(state.resources.is_empty());
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = GlobalState::new();
        state.version = STATE_VERSION + 1;
        manager.save(&state).await.unwrap();

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, CloudError::StateError(_)));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let lock = manager.acquire_lock().await.unwrap();
        let second = manager.acquire_lock().await;
        assert!(matches!(second, Err(CloudError::LockError(_))));

        lock.release().await.unwrap();
        let third = manager.acquire_lock().await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_save_replaces_state_through_staging_file() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut first = GlobalState::new();
        first.set_resource(
            "ncloud_vpc:main".to_string(),
            ResourceState::from_record("ncloud_vpc", &net()).unwrap(),
        );
        manager.save(&first).await.unwrap();
        manager.save(&GlobalState::new()).await.unwrap();

        let dir = temp_dir.path().join(".ncflow");
        assert!(!dir.join("state.json.tmp").exists());
        assert!(manager.load().await.unwrap().resources.is_empty());

        let backup: GlobalState =
            serde_json::from_str(&std::fs::read_to_string(dir.join("state.json.backup")).unwrap())
                .unwrap();
        assert!(backup.get_resource("ncloud_vpc:main").is_some());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut first = GlobalState::new();
        first.set_resource(
            "ncloud_vpc:main".to_string(),
            ResourceState::from_record("ncloud_vpc", &net()).unwrap(),
        );
        manager.save(&first).await.unwrap();

        // A directory in the staging file's place makes the write fail
        std::fs::create_dir(temp_dir.path().join(".ncflow/state.json.tmp")).unwrap();
        assert!(manager.save(&GlobalState::new()).await.is_err());

        let loaded = manager.load().await.unwrap();
        assert!(loaded.get_resource("ncloud_vpc:main").is_some());
    }

    fn write_lock(root: &Path, age: TimeDelta) {
        let holder = LockHolder {
            host: "other-host".to_string(),
            pid: 4242,
            acquired_at: Utc::now() - age,
        };
        let dir = root.join(".ncflow");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lock.json"), serde_json::to_vec(&holder).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_stale_lock_is_taken_over() {
        let temp_dir = tempdir().unwrap();
        write_lock(temp_dir.path(), TimeDelta::hours(2));
        let manager = StateManager::new(temp_dir.path());

        let lock = manager.acquire_lock().await.unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join(".ncflow/lock.json")).unwrap();
        let holder: LockHolder = serde_json::from_str(&content).unwrap();
        assert_eq!(holder.pid, std::process::id());

        lock.release().await.unwrap();
        assert!(!temp_dir.path().join(".ncflow/lock.json").exists());
    }

    #[tokio::test]
    async fn test_recent_lock_is_respected() {
        let temp_dir = tempdir().unwrap();
        write_lock(temp_dir.path(), TimeDelta::minutes(30));
        let manager = StateManager::new(temp_dir.path());

        let err = manager.acquire_lock().await.unwrap_err();
        assert!(matches!(err, CloudError::LockError(_)));
        assert!(err.to_string().contains("other-host"));

        let content = std::fs::read_to_string(temp_dir.path().join(".ncflow/lock.json")).unwrap();
        let holder: LockHolder = serde_json::from_str(&content).unwrap();
        assert_eq!(holder.pid, 4242);
    }

    #[test]
    fn test_observe_keeps_confirmed_flag() {
        let mut state = ResourceState::unconfirmed("1001", "ncloud_vpc");
        let created_at = state.created_at;
        let mut creating = net();
        creating.status = "CREATING".to_string();

        state.observe(&creating).unwrap();
        assert!(!state.confirmed);
        assert_eq!(state.status, "CREATING");
        assert_eq!(state.created_at, created_at);

        state.confirm(&net()).unwrap();
        assert!(state.confirmed);
        assert_eq!(state.record::<Net>().unwrap(), net());
    }

    #[test]
    fn test_unconfirmed_record_is_not_readable() {
        let state = ResourceState::unconfirmed("1001", "ncloud_vpc");
        assert!(state.record::<Net>().is_err());
    }

    #[test]
    fn test_resources_of_type() {
        let mut state = GlobalState::new();
        state.set_resource(
            "ncloud_vpc:a".to_string(),
            ResourceState::unconfirmed("1", "ncloud_vpc"),
        );
        state.set_resource(
            "ncloud_nat_gateway:b".to_string(),
            ResourceState::unconfirmed("2", "ncloud_nat_gateway"),
        );

        assert_eq!(state.resources_of_type("ncloud_vpc").len(), 1);
    }
}
