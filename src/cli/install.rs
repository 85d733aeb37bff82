//! Install, uninstall, enable, and disable commands

use anyhow::Result;

use nightshift::ToolKind;
use nightshift::hooks::HookManager;
use nightshift::hostcfg::HostConfigManager;

/// Install continuation hooks and ensure the host configs are ready.
pub fn install_command(backup_legacy: bool, migrate: bool) -> Result<()> {
    let config = HostConfigManager::new();
    let hooks = HookManager::new();

    if backup_legacy {
        config.backup_legacy_configs()?;
        println!("Legacy configurations backed up");
    }

    hooks.install_hooks()?;
    println!("Continuation hooks installed");

    if migrate {
        config.migrate_from_legacy()?;
        println!("Settings migrated from legacy tools");
    } else {
        config.setup_configs()?;
        println!("Configuration files set up");
    }

    println!("Installation complete");
    Ok(())
}

/// Remove installed hooks and restore default configurations.
pub fn uninstall_command() -> Result<()> {
    let config = HostConfigManager::new();
    let hooks = HookManager::new();

    hooks.uninstall_hooks()?;
    config.restore_defaults()?;
    println!("Hooks removed");
    println!("Configurations restored to defaults");
    Ok(())
}

/// Enable the continuation hook for a single tool.
pub fn enable_command(tool: ToolKind) -> Result<()> {
    let config = HostConfigManager::new();
    match tool {
        ToolKind::Claude => {
            config.enable_claude_hook()?;
            println!("claude continuation enabled");
        }
        ToolKind::Codex => {
            config.enable_codex_hook()?;
            println!("codex continuation enabled");
        }
        ToolKind::Gemini => println!("Gemini continuation not yet implemented"),
    }
    Ok(())
}

/// Disable the continuation hook for a single tool.
pub fn disable_command(tool: ToolKind) -> Result<()> {
    let config = HostConfigManager::new();
    match tool {
        ToolKind::Claude => {
            config.disable_claude_hook()?;
            println!("claude continuation disabled");
        }
        ToolKind::Codex => {
            config.disable_codex_hook()?;
            println!("codex continuation disabled");
        }
        ToolKind::Gemini => println!("Gemini continuation not yet implemented"),
    }
    Ok(())
}
