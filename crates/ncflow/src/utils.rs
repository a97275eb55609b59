use anyhow::Context;
use colored::Colorize;
use ncflow_cloud::{GlobalState, StateLock, StateManager};
use serde::Serialize;
use std::path::Path;

/// Locked, loaded state for the duration of one command
pub struct Session {
    manager: StateManager,
    lock: StateLock,
    pub state: GlobalState,
}

impl Session {
    pub async fn open(project_root: &Path) -> anyhow::Result<Self> {
        let manager = StateManager::new(project_root);
        let lock = manager
            .acquire_lock()
            .await
            .context("Failed to lock the state file")?;
        let state = manager
            .load()
            .await
            .with_context(|| format!("Failed to load {}", manager.state_path().display()))?;
        Ok(Self {
            manager,
            lock,
            state,
        })
    }

    /// Save the state and release the lock
    pub async fn close(self) -> anyhow::Result<()> {
        self.manager
            .save(&self.state)
            .await
            .with_context(|| format!("Failed to save {}", self.manager.state_path().display()))?;
        self.lock.release().await?;
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_field(label: &str, value: Option<&str>) {
    println!("  {:<24} {}", format!("{}:", label), value.unwrap_or("-").cyan());
}

pub fn print_status(status: &str) {
    let colored = match status {
        "RUN" => status.green(),
        "INIT" | "CREATING" => status.yellow(),
        "TERMTING" | "TERMINATED" => status.red(),
        _ => status.normal(),
    };
    println!("  {:<24} {}", "status:", colored);
}
