//! Integration tests for host config editing

mod common;

use tempfile::TempDir;

use nightshift::hooks::HookManager;
use nightshift::hostcfg::HostConfigManager;

use common::{backups_of, write_file};

#[test]
fn enable_claude_hook_creates_config_and_is_detected() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());

    assert!(!manager.is_claude_hook_enabled());
    manager.enable_claude_hook().unwrap();

    assert!(manager.claude_config_path().exists());
    assert!(manager.is_claude_hook_enabled());

    let content = std::fs::read_to_string(manager.claude_config_path()).unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    let command = config["hooks"]["Stop"][0]["hooks"][0]["command"]
        .as_str()
        .unwrap();
    assert!(command.contains("hook claude"));
    assert!(command.contains("$CLAUDE_PROJECT_DIR"));
}

#[test]
fn enable_claude_hook_preserves_unrelated_keys() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(
        manager.claude_config_path(),
        r#"{"model": "opus", "env": {"FOO": "bar"}}"#,
    );

    manager.enable_claude_hook().unwrap();

    let content = std::fs::read_to_string(manager.claude_config_path()).unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(config["model"], "opus");
    assert_eq!(config["env"]["FOO"], "bar");
    assert!(manager.is_claude_hook_enabled());
    // Editing an existing file leaves a timestamped backup behind.
    assert!(!backups_of(manager.claude_config_path()).is_empty());
}

#[test]
fn disable_claude_hook_removes_stop_and_empty_hooks_table() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(manager.claude_config_path(), r#"{"model": "opus"}"#);

    manager.enable_claude_hook().unwrap();
    manager.disable_claude_hook().unwrap();

    let content = std::fs::read_to_string(manager.claude_config_path()).unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(config.get("hooks").is_none());
    assert_eq!(config["model"], "opus");
    assert!(!manager.is_claude_hook_enabled());
}

#[test]
fn disable_claude_hook_without_config_is_a_noop() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());

    manager.disable_claude_hook().unwrap();
    assert!(!manager.claude_config_path().exists());
}

#[test]
fn codex_hook_round_trip_preserves_other_keys() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(manager.codex_config_path(), "model = \"gpt5\"\n");

    assert!(!manager.is_codex_hook_enabled());
    manager.enable_codex_hook().unwrap();
    assert!(manager.is_codex_hook_enabled());

    let content = std::fs::read_to_string(manager.codex_config_path()).unwrap();
    let config: toml::Table = toml::from_str(&content).unwrap();
    assert_eq!(config["model"].as_str(), Some("gpt5"));
    assert!(config["notify"].as_array().is_some());

    manager.disable_codex_hook().unwrap();
    assert!(!manager.is_codex_hook_enabled());
    let content = std::fs::read_to_string(manager.codex_config_path()).unwrap();
    let config: toml::Table = toml::from_str(&content).unwrap();
    assert!(config.get("notify").is_none());
    assert_eq!(config["model"].as_str(), Some("gpt5"));
}

#[test]
fn setup_configs_creates_missing_files_only() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(manager.claude_config_path(), r#"{"model": "opus"}"#);

    manager.setup_configs().unwrap();

    // The existing Claude config is untouched, the Codex one was created.
    let content = std::fs::read_to_string(manager.claude_config_path()).unwrap();
    assert!(content.contains("opus"));
    assert!(manager.codex_config_path().exists());
}

#[test]
fn migrate_from_legacy_rewrites_predecessor_hooks() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(
        manager.claude_config_path(),
        r#"{"hooks": {"Stop": [{"hooks": [{"type": "command", "command": "\"/old/claude4ever.py\" \"$CLAUDE_PROJECT_DIR\""}]}]}}"#,
    );
    write_file(
        manager.codex_config_path(),
        "notify = [\"/old/codex4ever.py\"]\n",
    );

    manager.migrate_from_legacy().unwrap();

    assert!(manager.is_claude_hook_enabled());
    assert!(manager.is_codex_hook_enabled());
    let content = std::fs::read_to_string(manager.claude_config_path()).unwrap();
    assert!(!content.contains("claude4ever"));
}

#[test]
fn hook_manager_installs_and_uninstalls_both_hooks() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config = HostConfigManager::with_home(home.path());
    let hooks = HookManager::with_config(HostConfigManager::with_home(home.path()));

    hooks.install_hooks().unwrap();
    assert!(config.is_claude_hook_enabled());
    assert!(config.is_codex_hook_enabled());

    hooks.uninstall_hooks().unwrap();
    assert!(!config.is_claude_hook_enabled());
    assert!(!config.is_codex_hook_enabled());
}

#[test]
fn restore_defaults_disables_everything() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());

    manager.enable_claude_hook().unwrap();
    manager.enable_codex_hook().unwrap();
    manager.restore_defaults().unwrap();

    assert!(!manager.is_claude_hook_enabled());
    assert!(!manager.is_codex_hook_enabled());
}

#[test]
fn backup_legacy_configs_copies_existing_files() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let manager = HostConfigManager::with_home(home.path());
    write_file(manager.claude_config_path(), "{}");
    write_file(manager.codex_config_path(), "");

    manager.backup_legacy_configs().unwrap();

    assert!(!backups_of(manager.claude_config_path()).is_empty());
    assert!(!backups_of(manager.codex_config_path()).is_empty());
}
