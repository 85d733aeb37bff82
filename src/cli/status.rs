//! Status command implementation

use anyhow::Result;

use nightshift::hostcfg::HostConfigManager;

/// Show hook and install state for all tools.
pub fn status_command() -> Result<()> {
    let config = HostConfigManager::new();

    let claude_enabled = config.is_claude_hook_enabled();
    let codex_enabled = config.is_codex_hook_enabled();

    println!("nightshift status");
    println!(
        "Claude: {} (installed={})",
        if claude_enabled { "enabled" } else { "disabled" },
        config.is_tool_installed("claude")
    );
    println!(
        "Codex: {} (installed={})",
        if codex_enabled { "enabled" } else { "disabled" },
        config.is_tool_installed("codex")
    );
    println!("Gemini installed={}", config.is_tool_installed("gemini"));
    Ok(())
}
