//! Resolving the project directory a continuation should run in.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::{HookPayload, ToolKind};

/// Environment variable Claude Code sets for its hooks.
pub const CLAUDE_PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Best-effort project directory for a stop event from `source`.
///
/// Claude announces the directory via `$CLAUDE_PROJECT_DIR`. Codex buries it
/// in the payload context or in its session logs. Everything degrades to the
/// current directory: a hand-off into the wrong directory is recoverable, a
/// failed hand-off is not.
pub fn resolve_project_dir(source: ToolKind, payload: &HookPayload) -> PathBuf {
    match source {
        ToolKind::Claude => std::env::var(CLAUDE_PROJECT_DIR_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(cwd_fallback),
        ToolKind::Codex => codex_project_dir(payload),
        ToolKind::Gemini => cwd_fallback(),
    }
}

fn cwd_fallback() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn codex_project_dir(payload: &HookPayload) -> PathBuf {
    if let Some(dir) = payload.context.as_ref().and_then(context_cwd) {
        return dir;
    }
    let sessions_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codex")
        .join("sessions");
    if let Some(dir) = latest_codex_session_cwd(&sessions_dir) {
        return dir;
    }
    std::env::var("PWD")
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(cwd_fallback)
}

/// Extract a working directory from the Codex payload context. The context
/// may be an object, a JSON-encoded string, or a bare path string.
fn context_cwd(context: &Value) -> Option<PathBuf> {
    match context {
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => object_cwd(&map),
                // Anything that is not a JSON object is treated as a path.
                Ok(_) | Err(_) => Some(PathBuf::from(text)),
            }
        }
        Value::Object(map) => object_cwd(map),
        _ => None,
    }
}

fn object_cwd(map: &serde_json::Map<String, Value>) -> Option<PathBuf> {
    map.get("cwd")
        .or_else(|| map.get("working_directory"))
        .and_then(Value::as_str)
        .map(PathBuf::from)
}

/// Scan the most recent Codex session log for a recorded working directory.
pub fn latest_codex_session_cwd(sessions_dir: &Path) -> Option<PathBuf> {
    let mut files: Vec<(std::time::SystemTime, PathBuf)> = std::fs::read_dir(sessions_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|extension| extension == "jsonl")
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .collect();
    files.sort_by(|a, b| b.0.cmp(&a.0));

    let newest = &files.first()?.1;
    let content = std::fs::read_to_string(newest).ok()?;
    for line in content.lines() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(line) {
            if let Some(cwd) = map.get("cwd").and_then(Value::as_str) {
                return Some(PathBuf::from(cwd));
            }
        }
    }
    None
}
