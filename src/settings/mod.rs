//! User preferences persisted under `~/.nightshift/settings.toml`.
//!
//! The settings file controls continuation routing (which tool picks up work
//! when another stops), prompt templates, hand-off notifications, and the
//! terminal launch commands used per platform. Tools are keyed by their
//! lower-case names so entries for tools we do not know about survive
//! round-trips.

mod io;

pub use io::{backup_file, load, load_or_default, save, settings_path, state_dir};

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ToolKind;

/// Prompt used when no template is configured at all.
pub const DEFAULT_PROMPT_FALLBACK: &str = "Continue working on the current task";

static DEFAULT_PROMPTS: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "claude".to_string(),
            "Continue work in the next tool. Outstanding tasks:\n{todo}".to_string(),
        ),
        (
            "codex".to_string(),
            "Pick up the session with these TODOs:\n{todo}".to_string(),
        ),
        (
            "gemini".to_string(),
            "Continue assisting with current plan:\n{plan}".to_string(),
        ),
    ])
});

static DEFAULT_TERMINALS: Lazy<BTreeMap<String, Vec<String>>> = Lazy::new(|| {
    let argv = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            "darwin".to_string(),
            argv(&[
                "open",
                "-a",
                "Terminal",
                "--args",
                "bash",
                "-lc",
                "{command}; exec bash",
            ]),
        ),
        (
            "windows".to_string(),
            argv(&["wt", "powershell", "-NoExit", "-Command", "{command}"]),
        ),
        (
            "linux".to_string(),
            argv(&["gnome-terminal", "--", "bash", "-lc", "{command}; exec bash"]),
        ),
    ])
});

/// Validation failures for persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown continuation target '{target}' for {source_tool}")]
    UnknownTarget { source_tool: String, target: String },
}

/// Whether continuation is enabled for a tool and where it routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuationPrefs {
    pub enabled: bool,
    /// Lower-case name of the tool launched after the source finishes.
    pub target: String,
}

impl ContinuationPrefs {
    fn disabled() -> Self {
        Self {
            enabled: false,
            target: ToolKind::Claude.name().to_string(),
        }
    }
}

/// Notification preferences for hand-off events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPrefs {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_notify_message")]
    pub message: String,
    #[serde(default = "default_notify_sound")]
    pub sound: String,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            message: default_notify_message(),
            sound: default_notify_sound(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notify_message() -> String {
    "Continuing on {target}".to_string()
}

fn default_notify_sound() -> String {
    "success".to_string()
}

/// Terminal launch command templates, keyed by platform (`darwin`, `linux`,
/// `windows`). The last element of every argv carries the `{command}`
/// placeholder replaced at spawn time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalPrefs {
    #[serde(default)]
    pub defaults: BTreeMap<String, Vec<String>>,

    /// Per-tool overrides, consulted before `defaults`.
    #[serde(default)]
    pub per_tool: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl TerminalPrefs {
    /// Argv template for launching `tool` on `platform_key`.
    pub fn command_for(&self, tool: ToolKind, platform_key: &str) -> Option<&[String]> {
        self.per_tool
            .get(tool.name())
            .and_then(|commands| commands.get(platform_key))
            .or_else(|| self.defaults.get(platform_key))
            .map(Vec::as_slice)
    }
}

/// The settings object persisted to `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub continuations: BTreeMap<String, ContinuationPrefs>,

    /// Continuation prompt templates per source tool. Templates may use the
    /// `{todo}`, `{plan}`, `{target}`, and `{source}` placeholders.
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,

    #[serde(default)]
    pub notifications: NotificationPrefs,

    #[serde(default)]
    pub terminals: TerminalPrefs,

    /// Terminate the previously tracked session before launching a new one.
    #[serde(default = "default_true")]
    pub kill_old_sessions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let continuations = BTreeMap::from([
            (
                "claude".to_string(),
                ContinuationPrefs {
                    enabled: true,
                    target: "codex".to_string(),
                },
            ),
            (
                "codex".to_string(),
                ContinuationPrefs {
                    enabled: true,
                    target: "claude".to_string(),
                },
            ),
            (
                "gemini".to_string(),
                ContinuationPrefs {
                    enabled: false,
                    target: "claude".to_string(),
                },
            ),
        ]);

        Self {
            continuations,
            prompts: DEFAULT_PROMPTS.clone(),
            notifications: NotificationPrefs::default(),
            terminals: TerminalPrefs {
                defaults: DEFAULT_TERMINALS.clone(),
                per_tool: BTreeMap::new(),
            },
            kill_old_sessions: true,
        }
    }
}

impl Settings {
    /// Ensure continuation targets reference known tools.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (source, prefs) in &self.continuations {
            if prefs.target.parse::<ToolKind>().is_err() {
                return Err(SettingsError::UnknownTarget {
                    source_tool: source.clone(),
                    target: prefs.target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Fill in entries a hand-edited or older settings file may be missing.
    fn fill_defaults(&mut self) {
        for tool in ToolKind::all() {
            self.continuations
                .entry(tool.name().to_string())
                .or_insert_with(ContinuationPrefs::disabled);
        }
        for (tool, template) in DEFAULT_PROMPTS.iter() {
            self.prompts
                .entry(tool.clone())
                .or_insert_with(|| template.clone());
        }
        if self.terminals.defaults.is_empty() {
            self.terminals.defaults = DEFAULT_TERMINALS.clone();
        }
    }

    /// Whether `tool` is configured to hand its work off on stop.
    pub fn continuation_enabled(&self, tool: ToolKind) -> bool {
        self.continuations
            .get(tool.name())
            .map(|prefs| prefs.enabled)
            .unwrap_or(false)
    }

    /// The tool that continues after `tool` stops. An invalid or missing
    /// target falls back to Claude rather than failing a hand-off.
    pub fn resolve_target(&self, tool: ToolKind) -> ToolKind {
        self.continuations
            .get(tool.name())
            .and_then(|prefs| prefs.target.parse().ok())
            .unwrap_or(ToolKind::Claude)
    }

    /// Prompt template for `tool`, falling back to the claude template and
    /// finally to [`DEFAULT_PROMPT_FALLBACK`].
    pub fn prompt_for(&self, tool: ToolKind) -> String {
        self.prompts
            .get(tool.name())
            .or_else(|| self.prompts.get(ToolKind::Claude.name()))
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROMPT_FALLBACK.to_string())
    }

    /// Route continuations from `source` to `target` and enable them.
    pub fn set_continuation(&mut self, source: ToolKind, target: ToolKind) {
        let prefs = self
            .continuations
            .entry(source.name().to_string())
            .or_insert_with(ContinuationPrefs::disabled);
        prefs.enabled = true;
        prefs.target = target.name().to_string();
    }

    /// Turn continuation off for `source`, leaving its target untouched.
    pub fn disable_continuation(&mut self, source: ToolKind) {
        self.continuations
            .entry(source.name().to_string())
            .or_insert_with(ContinuationPrefs::disabled)
            .enabled = false;
    }

    /// Store a continuation prompt template for `tool`.
    pub fn set_prompt(&mut self, tool: ToolKind, template: String) {
        self.prompts.insert(tool.name().to_string(), template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_route_claude_and_codex_at_each_other() {
        let settings = Settings::default();
        assert!(settings.continuation_enabled(ToolKind::Claude));
        assert_eq!(settings.resolve_target(ToolKind::Claude), ToolKind::Codex);
        assert!(settings.continuation_enabled(ToolKind::Codex));
        assert_eq!(settings.resolve_target(ToolKind::Codex), ToolKind::Claude);
        assert!(!settings.continuation_enabled(ToolKind::Gemini));
        assert!(settings.kill_old_sessions);
    }

    #[test]
    fn validate_rejects_unknown_target() {
        let mut settings = Settings::default();
        settings.continuations.insert(
            "claude".to_string(),
            ContinuationPrefs {
                enabled: true,
                target: "copilot".to_string(),
            },
        );
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("copilot"));
    }

    #[test]
    fn resolve_target_falls_back_to_claude() {
        let mut settings = Settings::default();
        settings.continuations.insert(
            "codex".to_string(),
            ContinuationPrefs {
                enabled: true,
                target: "bogus".to_string(),
            },
        );
        assert_eq!(settings.resolve_target(ToolKind::Codex), ToolKind::Claude);
        // A tool with no entry at all also falls back.
        settings.continuations.remove("gemini");
        assert_eq!(settings.resolve_target(ToolKind::Gemini), ToolKind::Claude);
    }

    #[test]
    fn prompt_for_falls_back_to_claude_template() {
        let mut settings = Settings::default();
        settings.prompts.remove("gemini");
        let prompt = settings.prompt_for(ToolKind::Gemini);
        assert_eq!(prompt, settings.prompt_for(ToolKind::Claude));

        settings.prompts.clear();
        assert_eq!(settings.prompt_for(ToolKind::Codex), DEFAULT_PROMPT_FALLBACK);
    }

    #[test]
    fn per_tool_terminal_overrides_win() {
        let mut settings = Settings::default();
        let custom = vec!["kitty".to_string(), "{command}".to_string()];
        settings
            .terminals
            .per_tool
            .entry("codex".to_string())
            .or_default()
            .insert("linux".to_string(), custom.clone());
        assert_eq!(
            settings.terminals.command_for(ToolKind::Codex, "linux"),
            Some(custom.as_slice())
        );
        // Other tools still see the platform default.
        assert_eq!(
            settings.terminals.command_for(ToolKind::Claude, "linux"),
            settings.terminals.defaults.get("linux").map(Vec::as_slice)
        );
    }

    #[test]
    fn fill_defaults_restores_missing_entries() {
        let mut settings: Settings = toml::from_str("kill_old_sessions = false").unwrap();
        settings.fill_defaults();
        assert_eq!(settings.continuations.len(), 3);
        assert!(!settings.continuation_enabled(ToolKind::Claude));
        assert!(!settings.kill_old_sessions);
        assert!(settings.terminals.defaults.contains_key("linux"));
        assert!(settings.prompts.contains_key("claude"));
    }
}
