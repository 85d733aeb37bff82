//! Editing the host CLIs' own configuration files.
//!
//! Claude keeps JSON at `~/.claude/settings.json`, Codex keeps TOML at
//! `~/.codex/config.toml`. Both are foreign documents we do not own, so all
//! edits go through untyped values (unknown keys round-trip untouched) and
//! every write follows backup -> write temp -> validate -> atomic rename,
//! restoring the backup when anything fails.

mod rollback;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use toml::Table as TomlTable;
use tracing::{debug, info};

use crate::hooks;
use crate::settings::backup_file;

use rollback::{replace_with_rollback, validate_json, validate_toml};

/// Substring identifying our Stop hook entry in Claude's settings. The
/// marker matches the subcommand invocation regardless of where the binary
/// is installed.
const CLAUDE_HOOK_MARKER: &str = "hook claude";
/// Same for the Codex notify entry.
const CODEX_HOOK_MARKER: &str = "hook codex";

/// Manages the configuration files of the host CLIs.
pub struct HostConfigManager {
    claude_config: PathBuf,
    codex_config: PathBuf,
    gemini_config: PathBuf,
}

impl HostConfigManager {
    pub fn new() -> Self {
        Self::with_home(dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Operate on config files under an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            claude_config: home.join(".claude").join("settings.json"),
            codex_config: home.join(".codex").join("config.toml"),
            gemini_config: home.join(".gemini").join("config.json"),
        }
    }

    pub fn claude_config_path(&self) -> &Path {
        &self.claude_config
    }

    pub fn codex_config_path(&self) -> &Path {
        &self.codex_config
    }

    /// Command string the Claude Stop hook runs.
    fn claude_hook_command() -> String {
        format!(
            "\"{}\" hook claude \"$CLAUDE_PROJECT_DIR\"",
            hooks::current_exe_string()
        )
    }

    /// Argument vector for the Codex notify hook.
    fn codex_hook_argv() -> Vec<String> {
        vec![
            hooks::current_exe_string(),
            "hook".to_string(),
            "codex".to_string(),
        ]
    }

    /// Whether Claude's Stop hook currently points at us.
    pub fn is_claude_hook_enabled(&self) -> bool {
        let Ok(content) = std::fs::read_to_string(&self.claude_config) else {
            return false;
        };
        let Ok(config) = serde_json::from_str::<JsonValue>(&content) else {
            debug!("unreadable claude config at {}", self.claude_config.display());
            return false;
        };
        stop_hook_commands(&config)
            .iter()
            .any(|command| command.contains(CLAUDE_HOOK_MARKER))
    }

    /// Whether Codex's notify hook currently points at us.
    pub fn is_codex_hook_enabled(&self) -> bool {
        let Ok(content) = std::fs::read_to_string(&self.codex_config) else {
            return false;
        };
        let Ok(config) = toml::from_str::<TomlTable>(&content) else {
            debug!("unreadable codex config at {}", self.codex_config.display());
            return false;
        };
        notify_argv(&config).join(" ").contains(CODEX_HOOK_MARKER)
    }

    /// Install the Stop hook into Claude's settings, preserving every other
    /// key in the file.
    pub fn enable_claude_hook(&self) -> Result<()> {
        let mut config = self.load_json(&self.claude_config)?;
        let object = config
            .as_object_mut()
            .context("claude settings.json is not a JSON object")?;
        let hooks_value = object
            .entry("hooks")
            .or_insert_with(|| serde_json::json!({}));
        let hooks_table = hooks_value
            .as_object_mut()
            .context("'hooks' in claude settings.json is not an object")?;
        hooks_table.insert(
            "Stop".to_string(),
            serde_json::json!([
                { "hooks": [{ "type": "command", "command": Self::claude_hook_command() }] }
            ]),
        );
        self.write_json(&self.claude_config, &config)?;
        info!("Claude Stop hook enabled");
        Ok(())
    }

    /// Remove the Stop hook from Claude's settings. Missing files or absent
    /// hooks are a no-op.
    pub fn disable_claude_hook(&self) -> Result<()> {
        if !self.claude_config.exists() {
            return Ok(());
        }
        let mut config = self.load_json(&self.claude_config)?;
        let Some(object) = config.as_object_mut() else {
            return Ok(());
        };
        let removed = object
            .get_mut("hooks")
            .and_then(JsonValue::as_object_mut)
            .map(|hooks_table| hooks_table.remove("Stop").is_some())
            .unwrap_or(false);
        if !removed {
            debug!("Claude Stop hook already absent; nothing to disable");
            return Ok(());
        }
        if object
            .get("hooks")
            .and_then(JsonValue::as_object)
            .is_some_and(|hooks_table| hooks_table.is_empty())
        {
            object.remove("hooks");
        }
        self.write_json(&self.claude_config, &config)
    }

    /// Point Codex's notify hook at us.
    pub fn enable_codex_hook(&self) -> Result<()> {
        let mut config = self.load_toml(&self.codex_config)?;
        let argv = Self::codex_hook_argv()
            .into_iter()
            .map(toml::Value::String)
            .collect::<Vec<_>>();
        config.insert("notify".to_string(), toml::Value::Array(argv));
        self.write_toml(&self.codex_config, &config)?;
        info!("Codex notify hook enabled");
        Ok(())
    }

    /// Remove the Codex notify hook. Missing files or absent hooks are a
    /// no-op.
    pub fn disable_codex_hook(&self) -> Result<()> {
        if !self.codex_config.exists() {
            return Ok(());
        }
        let mut config = self.load_toml(&self.codex_config)?;
        if config.remove("notify").is_none() {
            debug!("Codex notify hook already absent; nothing to disable");
            return Ok(());
        }
        self.write_toml(&self.codex_config, &config)
    }

    /// Create empty config files for tools that have none yet, so later
    /// enable/disable operations have something to edit.
    pub fn setup_configs(&self) -> Result<()> {
        if !self.claude_config.exists() {
            self.write_json(&self.claude_config, &serde_json::json!({}))?;
        }
        if !self.codex_config.exists() {
            self.write_toml(&self.codex_config, &TomlTable::new())?;
        }
        Ok(())
    }

    /// Take timestamped backups of every host config that exists.
    pub fn backup_legacy_configs(&self) -> Result<()> {
        for path in [&self.claude_config, &self.codex_config, &self.gemini_config] {
            if path.exists() {
                backup_file(path)?;
            }
        }
        Ok(())
    }

    /// Rewrite hook entries still pointing at the predecessor helper
    /// scripts so they invoke us instead.
    pub fn migrate_from_legacy(&self) -> Result<()> {
        if self.claude_config.exists() {
            backup_file(&self.claude_config)?;
            let mut config = self.load_json(&self.claude_config)?;
            if rewrite_legacy_claude_hooks(&mut config) {
                self.write_json(&self.claude_config, &config)?;
                info!("migrated legacy Claude hook entries");
            }
        }

        if self.codex_config.exists() {
            backup_file(&self.codex_config)?;
            let mut config = self.load_toml(&self.codex_config)?;
            let legacy = notify_argv(&config)
                .iter()
                .any(|item| item.contains("codex4ever.py"));
            if legacy {
                let argv = Self::codex_hook_argv()
                    .into_iter()
                    .map(toml::Value::String)
                    .collect::<Vec<_>>();
                config.insert("notify".to_string(), toml::Value::Array(argv));
                self.write_toml(&self.codex_config, &config)?;
                info!("migrated legacy Codex notify entry");
            }
        }

        Ok(())
    }

    /// Disable both hooks, returning the host configs to their defaults.
    pub fn restore_defaults(&self) -> Result<()> {
        self.disable_claude_hook()?;
        self.disable_codex_hook()?;
        Ok(())
    }

    /// Whether `tool` resolves on the current PATH.
    pub fn is_tool_installed(&self, tool: &str) -> bool {
        std::process::Command::new("which")
            .arg(tool)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn load_json(&self, path: &Path) -> Result<JsonValue> {
        if !path.exists() {
            return Ok(serde_json::json!({}));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn load_toml(&self, path: &Path) -> Result<TomlTable> {
        if !path.exists() {
            return Ok(TomlTable::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn write_json(&self, path: &Path, value: &JsonValue) -> Result<()> {
        let content =
            serde_json::to_string_pretty(value).context("Failed to serialize JSON config")?;
        replace_with_rollback(path, &content, validate_json)
    }

    fn write_toml(&self, path: &Path, table: &TomlTable) -> Result<()> {
        let content = toml::to_string_pretty(table).context("Failed to serialize TOML config")?;
        replace_with_rollback(path, &content, validate_toml)
    }
}

impl Default for HostConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// All command strings registered under Claude's Stop hook.
fn stop_hook_commands(config: &JsonValue) -> Vec<String> {
    let mut commands = Vec::new();
    let Some(entries) = config
        .get("hooks")
        .and_then(|hooks| hooks.get("Stop"))
        .and_then(JsonValue::as_array)
    else {
        return commands;
    };
    for entry in entries {
        let Some(inner) = entry.get("hooks").and_then(JsonValue::as_array) else {
            continue;
        };
        for hook in inner {
            if let Some(command) = hook.get("command").and_then(JsonValue::as_str) {
                commands.push(command.to_string());
            }
        }
    }
    commands
}

/// String elements of Codex's `notify` array.
fn notify_argv(config: &TomlTable) -> Vec<String> {
    config
        .get("notify")
        .and_then(toml::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Replace Stop hook commands referencing the legacy helper script.
/// Returns whether anything changed.
fn rewrite_legacy_claude_hooks(config: &mut JsonValue) -> bool {
    let mut changed = false;
    let Some(entries) = config
        .get_mut("hooks")
        .and_then(|hooks| hooks.get_mut("Stop"))
        .and_then(JsonValue::as_array_mut)
    else {
        return false;
    };
    for entry in entries {
        let Some(inner) = entry.get_mut("hooks").and_then(JsonValue::as_array_mut) else {
            continue;
        };
        for hook in inner {
            let Some(object) = hook.as_object_mut() else {
                continue;
            };
            let legacy = object
                .get("command")
                .and_then(JsonValue::as_str)
                .is_some_and(|command| command.contains("claude4ever.py"));
            if legacy {
                object.insert(
                    "command".to_string(),
                    JsonValue::String(HostConfigManager::claude_hook_command()),
                );
                changed = true;
            }
        }
    }
    changed
}
