//! Installing and removing the continuation hooks.
//!
//! There are no helper scripts to write: the hook entries in the host
//! configs invoke the installed binary itself (`nightshift hook <tool>`),
//! so installation is just a matter of pointing the host CLIs at it.

use anyhow::Result;

use crate::hostcfg::HostConfigManager;

/// The path hooks should use to invoke this binary.
///
/// Falls back to the bare name so an installed `nightshift` on PATH still
/// resolves when `current_exe` is unavailable.
pub fn current_exe_string() -> String {
    std::env::current_exe()
        .ok()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "nightshift".to_string())
}

/// Installs and removes continuation hook entries in the host tool configs.
pub struct HookManager {
    config: HostConfigManager,
}

impl HookManager {
    pub fn new() -> Self {
        Self {
            config: HostConfigManager::new(),
        }
    }

    /// Manage hooks through an explicit config manager (tests use this to
    /// stay inside a temporary home).
    pub fn with_config(config: HostConfigManager) -> Self {
        Self { config }
    }

    /// Point Claude and Codex at the continuation hook. Gemini ships no
    /// hook mechanism yet and is skipped.
    pub fn install_hooks(&self) -> Result<()> {
        self.config.enable_claude_hook()?;
        self.config.enable_codex_hook()?;
        Ok(())
    }

    /// Remove the continuation hook entries from both host configs.
    pub fn uninstall_hooks(&self) -> Result<()> {
        self.config.disable_claude_hook()?;
        self.config.disable_codex_hook()?;
        Ok(())
    }
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}
