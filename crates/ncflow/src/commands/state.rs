use colored::Colorize;
use ncflow_cloud::StateManager;
use std::path::Path;

pub async fn handle(project_root: &Path) -> anyhow::Result<()> {
    let manager = StateManager::new(project_root);
    let state = manager.load().await?;

    if state.resources.is_empty() {
        println!("{}", "No resources recorded".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Resources ({}):", state.resources.len()).bold()
    );
    for (key, resource) in &state.resources {
        let status = if resource.confirmed {
            resource.status.green()
        } else {
            "unconfirmed".yellow()
        };
        println!("  • {} {} [{}]", key.cyan(), resource.id, status);
    }
    Ok(())
}
