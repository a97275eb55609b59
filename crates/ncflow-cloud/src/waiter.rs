//! Resource state convergence (exponential backoff)
//!
//! Vendor APIs accept create/delete requests asynchronously and report progress
//! through a status code on the object. [`wait_for_state`] polls a refresh
//! accessor until that code reaches one of the target states, the object
//! disappears, the accessor fails, or the timeout elapses.

use crate::error::{BoxError, CloudError, Result};
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// First backoff step, doubled before every sleep
const INITIAL_WAIT: Duration = Duration::from_millis(100);

/// Default ceiling for the spacing between polls
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(10);

/// Default overall timeout of a wait
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A point-in-time read of a remote object that carries a status code
pub trait Snapshot {
    fn status(&self) -> &str;
}

/// Classification of an observed status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    /// Keep polling
    Pending,
    /// Stop polling, success
    Target,
    /// Listed in neither set
    Unexpected,
}

/// Outcome of a wait that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The object reached a target state; carries the last snapshot
    Reached(T),
    /// The accessor reported that the object does not exist
    NotFound,
}

impl<T> WaitOutcome<T> {
    /// Whether the object no longer exists
    pub fn is_gone(&self) -> bool {
        matches!(self, WaitOutcome::NotFound)
    }

    pub fn reached(self) -> Option<T> {
        match self {
            WaitOutcome::Reached(snapshot) => Some(snapshot),
            WaitOutcome::NotFound => None,
        }
    }

    /// For create flows: an object that vanished while converging is an error
    pub fn into_reached(self, resource: &str, id: &str) -> Result<T> {
        self.reached().ok_or_else(|| {
            CloudError::ResourceNotFound(format!(
                "{} ({}) disappeared while waiting for it",
                resource, id
            ))
        })
    }
}

/// Poll configuration for a single wait
#[derive(Debug, Clone)]
pub struct WaitConfig {
    pending: BTreeSet<String>,
    target: BTreeSet<String>,

    /// Overall budget for the wait
    pub timeout: Duration,

    /// Delay before the first poll
    pub delay: Duration,

    /// Lower bound for the spacing between polls
    pub min_interval: Duration,

    /// Upper bound for the spacing between polls
    pub max_interval: Duration,

    strict: bool,
}

impl WaitConfig {
    /// Build a config from the pending and target status codes.
    ///
    /// A code listed in both sets is rejected.
    pub fn new<P, T, S>(pending: P, target: T) -> Result<Self>
    where
        P: IntoIterator<Item = S>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pending: BTreeSet<String> = pending.into_iter().map(Into::into).collect();
        let target: BTreeSet<String> = target.into_iter().map(Into::into).collect();

        let overlap: Vec<&str> = pending.intersection(&target).map(String::as_str).collect();
        if !overlap.is_empty() {
            return Err(CloudError::InvalidConfig(format!(
                "states listed as both pending and target: {}",
                overlap.join(", ")
            )));
        }

        Ok(Self {
            pending,
            target,
            timeout: DEFAULT_WAIT_TIMEOUT,
            delay: Duration::ZERO,
            min_interval: Duration::ZERO,
            max_interval: DEFAULT_MAX_INTERVAL,
            strict: false,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    /// Fail on status codes listed in neither set instead of polling on
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn classify(&self, status: &str) -> StateClass {
        if self.target.contains(status) {
            StateClass::Target
        } else if self.pending.contains(status) {
            StateClass::Pending
        } else {
            StateClass::Unexpected
        }
    }

    /// Human readable target, used in errors and logs
    pub fn target_description(&self) -> String {
        if self.target.is_empty() {
            "absent".to_string()
        } else {
            self.target.iter().cloned().collect::<Vec<_>>().join("/")
        }
    }

    /// Spacing after `previous`: doubled, then clamped to the configured bounds
    pub fn next_interval(&self, previous: Duration) -> Duration {
        let ceiling = self.max_interval.max(self.min_interval);
        previous
            .saturating_mul(2)
            .clamp(self.min_interval, ceiling)
    }
}

/// Poll `refresh` until the object converges.
///
/// # Arguments
/// * `resource` - Resource type, used in logs and errors
/// * `id` - Handle of the awaited object
/// * `config` - State classification and timing
/// * `refresh` - One read of the remote object; `Ok(None)` means it does not exist
///
/// # Returns
/// * `Ok(WaitOutcome::Reached(_))` - A target state was observed
/// * `Ok(WaitOutcome::NotFound)` - The object does not exist
/// * `Err(CloudError::Refresh)` - The accessor failed; it is not retried
/// * `Err(CloudError::WaitTimeout)` - Nothing terminal happened in time
pub async fn wait_for_state<T, E, F, Fut>(
    resource: &str,
    id: &str,
    config: &WaitConfig,
    mut refresh: F,
) -> Result<WaitOutcome<T>>
where
    T: Snapshot,
    E: Into<BoxError>,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<Option<T>, E>>,
{
    let started = Instant::now();
    let deadline = started + config.timeout;
    let target = config.target_description();
    let mut wait = INITIAL_WAIT;
    let mut attempt: u32 = 0;

    tracing::debug!(resource, id, target = %target, "Waiting for state");

    if !config.delay.is_zero() {
        sleep(config.delay).await;
    }

    loop {
        attempt += 1;

        let snapshot = refresh().await.map_err(|e| CloudError::Refresh {
            resource: resource.to_string(),
            id: id.to_string(),
            source: e.into(),
        })?;

        let Some(snapshot) = snapshot else {
            tracing::debug!(resource, id, attempt, "Resource not found");
            return Ok(WaitOutcome::NotFound);
        };

        let status = snapshot.status().to_string();
        match config.classify(&status) {
            StateClass::Target => {
                tracing::info!(resource, id, state = %status, attempt, "Reached target state");
                return Ok(WaitOutcome::Reached(snapshot));
            }
            StateClass::Pending => {
                tracing::debug!(resource, id, state = %status, attempt, "Still pending");
            }
            StateClass::Unexpected if config.strict => {
                return Err(CloudError::UnexpectedState {
                    resource: resource.to_string(),
                    id: id.to_string(),
                    state: status,
                    target,
                });
            }
            StateClass::Unexpected => {
                tracing::warn!(
                    resource,
                    id,
                    state = %status,
                    attempt,
                    "Unexpected state, continuing to wait"
                );
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(CloudError::WaitTimeout {
                resource: resource.to_string(),
                id: id.to_string(),
                target,
                last_state: status,
                elapsed: now - started,
            });
        }

        wait = config.next_interval(wait);
        sleep(wait.min(deadline - now)).await;
    }
}
