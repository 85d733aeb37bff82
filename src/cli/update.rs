//! Update command implementation

use anyhow::Result;

use nightshift::update::UpdateManager;

/// Trigger version checks or updates.
pub async fn update_command(
    check: bool,
    cli_tools: bool,
    self_update: bool,
    all: bool,
    dry_run: bool,
    skip: Vec<String>,
) -> Result<()> {
    let manager = UpdateManager::new();
    let mut performed = false;

    if check {
        let versions = manager.check_versions().await;
        for (tool, info) in &versions {
            println!("{}: {} -> {}", tool, info.current, info.available);
        }
        performed = true;
    }

    if all || cli_tools {
        manager.update_cli_tools(dry_run, &skip).await?;
        println!(
            "{}",
            if dry_run {
                "CLI tools checked (dry run)"
            } else {
                "CLI tools updated"
            }
        );
        performed = true;
    }

    if all || self_update {
        manager.update_self(dry_run).await?;
        println!(
            "{}",
            if dry_run {
                "nightshift update simulated"
            } else {
                "nightshift package updated"
            }
        );
        performed = true;
    }

    if !performed {
        println!("No update action performed");
    }
    Ok(())
}
