//! Serialised hand-off plans and the resume step that executes them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ToolKind;
use crate::session::SessionStore;

use super::{ENV_KILL_OLD, ENV_NOTIFY_ENABLED, ENV_NOTIFY_MESSAGE, ENV_TARGET_TOOL};

/// Everything the resume step needs to launch the continuation: the target
/// command line, the working directory, and the environment overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffPlan {
    pub command: Vec<String>,
    pub cwd: PathBuf,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl HandoffPlan {
    /// Persist the plan as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create plan directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize hand-off plan")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write hand-off plan: {}", path.display()))?;
        Ok(())
    }

    /// Load a plan previously written with [`HandoffPlan::write`].
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hand-off plan: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse hand-off plan: {}", path.display()))
    }
}

/// Execute a hand-off plan against the default session store.
pub fn resume(plan: &HandoffPlan) -> Result<()> {
    resume_with_store(plan, &SessionStore::new())
}

/// Execute a hand-off plan: spawn the target CLI, rotate session state, emit
/// the notification, and wait for the child to exit.
///
/// A spawn failure leaves the session state untouched; the previous record
/// still describes the last process that actually ran.
pub fn resume_with_store(plan: &HandoffPlan, store: &SessionStore) -> Result<()> {
    let (program, args) = plan
        .command
        .split_first()
        .context("hand-off plan has no command")?;

    let mut child = std::process::Command::new(program)
        .args(args)
        .envs(&plan.env)
        .current_dir(&plan.cwd)
        .spawn()
        .with_context(|| format!("Failed to launch continuation '{program}'"))?;

    let target = plan
        .env
        .get(ENV_TARGET_TOOL)
        .and_then(|value| value.parse::<ToolKind>().ok())
        .unwrap_or(ToolKind::Claude);
    let kill_old = plan
        .env
        .get(ENV_KILL_OLD)
        .map(|value| value == "1")
        .unwrap_or(true);
    if let Err(error) = store.rotate(target, child.id(), &plan.cwd, kill_old) {
        debug!("session state not recorded: {:#}", error);
    }

    emit_notification(&plan.env);

    let status = child
        .wait()
        .context("Failed to wait for continuation process")?;
    if !status.success() {
        warn!("continuation process exited with {}", status);
    }
    Ok(())
}

/// Print the hand-off notification plus a terminal bell. A desktop workflow
/// built around terminals does not need more than that.
fn emit_notification(env: &BTreeMap<String, String>) {
    if env.get(ENV_NOTIFY_ENABLED).map(String::as_str) != Some("1") {
        return;
    }
    let Some(message) = env.get(ENV_NOTIFY_MESSAGE).filter(|m| !m.is_empty()) else {
        return;
    };
    println!("[nightshift] {message}\u{7}");
}
