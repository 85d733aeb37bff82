//! Best-effort session tracking for continuation hand-offs.
//!
//! A single JSON file records the most recently launched CLI session (tool,
//! pid, start time, cwd). Before a new session starts, the previous process
//! can be terminated so two assistants never fight over the same checkout.
//! There is no locking; the file is advisory state for one local user and
//! last-writer-wins is acceptable.

use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ToolKind;
use crate::settings::state_dir;

const SESSION_STATE_FILE: &str = "session_state.json";
#[cfg(unix)]
const KILL_WAIT: Duration = Duration::from_secs(5);

/// Serialisable record of a single launched CLI session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub tool: ToolKind,
    pub pid: u32,
    /// RFC 3339 timestamp of the launch.
    pub start_time: String,
    pub cwd: String,
}

/// Reads and writes the session-state file.
pub struct SessionStore {
    state_file: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_dir(&state_dir(None))
    }

    /// Store session state under an explicit directory.
    pub fn with_dir(dir: &Path) -> Self {
        Self {
            state_file: dir.join(SESSION_STATE_FILE),
        }
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// The persisted session, or `None` when the file is missing or corrupt.
    /// A rotted state file must never poison a hand-off.
    pub fn read(&self) -> Option<SessionInfo> {
        let content = std::fs::read_to_string(&self.state_file).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Persist metadata for a freshly launched session.
    pub fn write(&self, tool: ToolKind, pid: u32, cwd: &Path) -> Result<SessionInfo> {
        let session = SessionInfo {
            tool,
            pid,
            start_time: chrono::Utc::now().to_rfc3339(),
            cwd: cwd.display().to_string(),
        };
        if let Some(parent) = self.state_file.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(&session).context("Failed to serialize session state")?;
        std::fs::write(&self.state_file, content).with_context(|| {
            format!("Failed to write session state: {}", self.state_file.display())
        })?;
        Ok(session)
    }

    /// Delete the persisted session file when present.
    pub fn clear(&self) -> Result<()> {
        if self.state_file.exists() {
            std::fs::remove_file(&self.state_file).with_context(|| {
                format!("Failed to remove session state: {}", self.state_file.display())
            })?;
        }
        Ok(())
    }

    /// Terminate the process described by `session` if it is still alive and
    /// actually looks like one of our tools. Returns whether a process was
    /// signalled.
    ///
    /// The name check guards against PID reuse: a recycled PID belonging to
    /// some unrelated process must never be killed.
    #[cfg(unix)]
    pub fn kill_old(&self, session: &SessionInfo) -> bool {
        if !pid_alive(session.pid) {
            return false;
        }
        let Some(name) = process_name(session.pid) else {
            return false;
        };
        let name = name.to_lowercase();
        if !ToolKind::all().iter().any(|tool| name.contains(tool.name())) {
            debug!("pid {} is '{}', not a tracked tool; leaving it alone", session.pid, name);
            return false;
        }

        unsafe {
            libc::kill(session.pid as i32, libc::SIGTERM);
        }
        let deadline = Instant::now() + KILL_WAIT;
        while Instant::now() < deadline {
            if !pid_alive(session.pid) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        unsafe {
            libc::kill(session.pid as i32, libc::SIGKILL);
        }
        true
    }

    #[cfg(not(unix))]
    pub fn kill_old(&self, _session: &SessionInfo) -> bool {
        false
    }

    /// Persist a new session, optionally terminating the previous one first.
    pub fn rotate(
        &self,
        tool: ToolKind,
        pid: u32,
        cwd: &Path,
        kill_old: bool,
    ) -> Result<SessionInfo> {
        if kill_old {
            if let Some(old) = self.read() {
                if self.kill_old(&old) {
                    debug!("terminated stale {} session (pid {})", old.tool, old.pid);
                }
            }
        }
        self.write(tool, pid, cwd)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn pid_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

/// Short process name for `pid`, via /proc on Linux and `ps` elsewhere.
#[cfg(unix)]
fn process_name(pid: u32) -> Option<String> {
    if let Ok(name) = std::fs::read_to_string(format!("/proc/{pid}/comm")) {
        let name = name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    let output = std::process::Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}
