//! Building the command line that launches the continuation target.

use std::path::Path;

use crate::domain::ToolKind;

/// Resolve `name` through PATH, keeping the bare name when lookup fails so
/// the spawn error names the missing binary.
pub fn resolve_executable(name: &str) -> String {
    if let Ok(output) = std::process::Command::new("which").arg(name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return path;
            }
        }
    }
    name.to_string()
}

/// Argument list used to launch `target` continuing work in `project_dir`.
///
/// Each tool has its own way of accepting a working directory and a prompt:
/// Codex takes `--cd` and a positional prompt, Gemini a positional prompt,
/// Claude resumes the previous conversation and takes `--prompt`.
pub fn build_target_command(target: ToolKind, project_dir: &Path, prompt: &str) -> Vec<String> {
    match target {
        ToolKind::Codex => {
            let mut command = vec![
                resolve_executable(ToolKind::Codex.binary()),
                format!("--cd={}", project_dir.display()),
                "-m".to_string(),
                "gpt5".to_string(),
                "--dangerously-bypass-approvals-and-sandbox".to_string(),
                "--sandbox".to_string(),
                "danger-full-access".to_string(),
            ];
            if !prompt.is_empty() {
                command.push(prompt.to_string());
            }
            command
        }
        ToolKind::Gemini => {
            let mut command = vec![
                resolve_executable(ToolKind::Gemini.binary()),
                "-c".to_string(),
                "-y".to_string(),
            ];
            if !prompt.is_empty() {
                command.push(prompt.to_string());
            }
            command
        }
        ToolKind::Claude => {
            let mut command = vec![
                resolve_executable(ToolKind::Claude.binary()),
                "--continue".to_string(),
                "--dangerously-skip-permissions".to_string(),
            ];
            if !prompt.is_empty() {
                command.push("--prompt".to_string());
                command.push(prompt.to_string());
            }
            command
        }
    }
}
