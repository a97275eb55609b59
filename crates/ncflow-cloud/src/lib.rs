//! ncflow cloud core
//!
//! Provider-agnostic building blocks shared by every ncflow provider:
//! resource lifecycle traits, the local state file, and the convergence
//! waiter that create/delete operations use to follow asynchronous vendor
//! operations until they settle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   ncflow CLI                    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 ncflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait ManagedResource / DataSource      │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │    Waiter    │  │  State Mgmt  │             │
//! │  └──────────────┘  └──────────────┘             │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │    ncloud     │
//! │   provider    │
//! └───────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod state;
pub mod waiter;

// Re-exports
pub use error::{BoxError, CloudError, Result};
pub use provider::{
    DataSource, ManagedResource, ResourceRecord, create_record, destroy_record, refresh_record,
    state_key,
};
pub use state::{GlobalState, ResourceState, StateLock, StateManager};
pub use waiter::{Snapshot, StateClass, WaitConfig, WaitOutcome, wait_for_state};
