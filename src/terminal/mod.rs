//! Spawning the continuation wrapper in a platform-appropriate terminal.
//!
//! User-configured argv templates (with a `{command}` placeholder) take
//! precedence. Without one, macOS goes through AppleScript, Windows through
//! `cmd.exe /c start`, and anything else signals the caller to run the
//! command inline.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::ToolKind;
use crate::settings::Settings;

/// Environment variable overriding the macOS terminal application.
pub const TERMINAL_APP_ENV: &str = "NIGHTSHIFT_TERMINAL_APP";

/// Placeholder replaced with the wrapped command in terminal argv templates.
pub const COMMAND_PLACEHOLDER: &str = "{command}";

/// Platform key used in terminal settings: `darwin`, `windows`, or `linux`.
pub fn platform_key() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

/// Spawn `inner_command` in a new terminal window.
///
/// Returns `Ok(true)` when the command was handed to a terminal and runs
/// detached, `Ok(false)` when no terminal strategy exists for this platform
/// and the caller should run the command inline instead.
pub fn spawn_in_terminal(
    settings: &Settings,
    target: ToolKind,
    project_dir: &Path,
    inner_command: &str,
) -> Result<bool> {
    let key = platform_key();

    if let Some(template) = settings.terminals.command_for(target, key) {
        let argv: Vec<String> = template
            .iter()
            .map(|part| part.replace(COMMAND_PLACEHOLDER, inner_command))
            .collect();
        let (program, args) = argv
            .split_first()
            .context("terminal command template is empty")?;
        debug!("spawning terminal: {} {:?}", program, args);
        Command::new(program)
            .args(args)
            .current_dir(project_dir)
            .spawn()
            .with_context(|| format!("Failed to spawn terminal '{program}'"))?;
        return Ok(true);
    }

    match key {
        "darwin" => {
            run_on_macos(inner_command)?;
            Ok(true)
        }
        "windows" => {
            run_on_windows(inner_command)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Build the shell string that re-enters `project_dir` then runs `argv`.
pub fn wrap_command(project_dir: &Path, argv: &[String]) -> String {
    let command = argv
        .iter()
        .map(|part| shell_escape(part))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "cd {} && {}",
        shell_escape(&project_dir.display().to_string()),
        command
    )
}

/// Escape a string for shell use.
pub fn shell_escape(s: &str) -> String {
    // Wrap in single quotes and escape any single quotes.
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Escape a command string for embedding inside an AppleScript literal.
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn run_on_macos(command: &str) -> Result<()> {
    let app = std::env::var(TERMINAL_APP_ENV).unwrap_or_else(|_| "Terminal".to_string());
    let script = format!(
        "tell application \"{}\" to do script \"{}\"",
        app,
        applescript_escape(command)
    );
    let status = Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .status()
        .context("Failed to run osascript")?;
    if !status.success() {
        anyhow::bail!("osascript failed with status: {}", status);
    }
    Ok(())
}

fn run_on_windows(command: &str) -> Result<()> {
    Command::new("cmd.exe")
        .args(["/c", "start", "", "cmd.exe", "/k", command])
        .spawn()
        .context("Failed to spawn command prompt")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("hello"), "'hello'");
        assert_eq!(shell_escape("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_applescript_escape() {
        assert_eq!(applescript_escape("echo \"hi\""), "echo \\\"hi\\\"");
        assert_eq!(applescript_escape("a\\b"), "a\\\\b");
    }

    #[test]
    fn wrap_command_enters_project_dir_first() {
        let dir = PathBuf::from("/tmp/my project");
        let argv = vec!["nightshift".to_string(), "resume".to_string()];
        assert_eq!(
            wrap_command(&dir, &argv),
            "cd '/tmp/my project' && 'nightshift' 'resume'"
        );
    }

    #[test]
    fn platform_key_is_known() {
        assert!(["darwin", "windows", "linux"].contains(&platform_key()));
    }
}
