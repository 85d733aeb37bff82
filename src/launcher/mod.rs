//! Direct launches of the supported CLIs (`nightshift run`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::ToolKind;

/// Resolves CLI binaries once and exposes per-tool launch methods.
pub struct Launcher {
    claude_cmd: Option<PathBuf>,
    codex_cmd: Option<PathBuf>,
    gemini_cmd: Option<PathBuf>,
}

impl Launcher {
    /// Look up command paths once so subsequent launches are cheap.
    pub fn new() -> Self {
        Self {
            claude_cmd: find_command(ToolKind::Claude.binary()),
            codex_cmd: find_command(ToolKind::Codex.binary()),
            gemini_cmd: find_command(ToolKind::Gemini.binary()),
        }
    }

    /// Resolved binary for `tool`, if installed.
    pub fn binary_for(&self, tool: ToolKind) -> Option<&Path> {
        match tool {
            ToolKind::Claude => self.claude_cmd.as_deref(),
            ToolKind::Codex => self.codex_cmd.as_deref(),
            ToolKind::Gemini => self.gemini_cmd.as_deref(),
        }
    }

    /// Launch the Claude CLI with continuation-friendly defaults.
    pub async fn launch_claude(
        &self,
        cwd: Option<&Path>,
        model: Option<&str>,
        prompt: Option<&str>,
    ) -> Result<()> {
        let Some(binary) = &self.claude_cmd else {
            bail!("Claude CLI not found. Install with: npm install -g @anthropic-ai/claude-code");
        };

        let mut args: Vec<String> = vec![
            "--dangerously-skip-permissions".to_string(),
            "--model".to_string(),
            model.unwrap_or("claude-sonnet-4").to_string(),
        ];
        if let Some(prompt) = prompt {
            args.push("--prompt".to_string());
            args.push(prompt.to_string());
        }

        run_to_completion(binary, &args, cwd).await
    }

    /// Launch the Codex CLI. The working directory goes through `--cd`
    /// because Codex resolves paths itself.
    pub async fn launch_codex(
        &self,
        cwd: Option<&Path>,
        profile: Option<&str>,
        exec_mode: bool,
        prompt: Option<&str>,
    ) -> Result<()> {
        let Some(binary) = &self.codex_cmd else {
            bail!("Codex CLI not found. Install with: brew install codex");
        };

        let mut args: Vec<String> = Vec::new();
        if let Some(cwd) = cwd {
            args.push(format!("--cd={}", cwd.display()));
        }
        args.push("-m".to_string());
        args.push(profile.unwrap_or("gpt5").to_string());
        if exec_mode {
            args.push("-p".to_string());
            args.push("-e".to_string());
        }
        args.extend(
            [
                "--dangerously-bypass-approvals-and-sandbox",
                "--sandbox",
                "danger-full-access",
            ]
            .map(String::from),
        );
        if let Some(prompt) = prompt {
            args.push(prompt.to_string());
        }

        run_to_completion(binary, &args, None).await
    }

    /// Launch the Gemini CLI.
    pub async fn launch_gemini(&self, cwd: Option<&Path>, prompt: Option<&str>) -> Result<()> {
        let Some(binary) = &self.gemini_cmd else {
            bail!("Gemini CLI not found. Install with: npm install -g @google/gemini-cli");
        };

        let mut args: Vec<String> = vec!["-c".to_string(), "-y".to_string()];
        if let Some(prompt) = prompt {
            args.push(prompt.to_string());
        }

        run_to_completion(binary, &args, cwd).await
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_to_completion(binary: &Path, args: &[String], cwd: Option<&Path>) -> Result<()> {
    info!("launching {} {}", binary.display(), args.join(" "));
    let mut command = Command::new(binary);
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    let status = command
        .status()
        .await
        .with_context(|| format!("Failed to launch {}", binary.display()))?;
    if !status.success() {
        // Interactive sessions commonly end with non-zero on user interrupt.
        warn!("{} exited with {}", binary.display(), status);
    }
    Ok(())
}

/// Locate `name` on PATH or in the usual install directories.
pub fn find_command(name: &str) -> Option<PathBuf> {
    if let Ok(output) = std::process::Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
    }

    let mut candidates = vec![PathBuf::from("/usr/local/bin").join(name)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local").join("bin").join(name));
    }
    candidates.push(PathBuf::from("/opt/homebrew/bin").join(name));

    candidates.into_iter().find(|candidate| candidate.exists())
}
