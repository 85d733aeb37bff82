//! The continuation hand-off protocol.
//!
//! When a host CLI stops, its hook invokes `nightshift hook <tool>`. This
//! module decides whether and where the work continues, builds the prompt
//! and the target command line, serialises everything into a hand-off plan,
//! and spawns a terminal running `nightshift resume` against that plan. The
//! resume step launches the target CLI, rotates the session state, and emits
//! the notification.
//!
//! The split into hook side and resume side exists because the hook runs
//! inside the dying host process: anything slow or interactive happens in
//! the freshly spawned terminal instead.

mod command;
mod plan;
mod project;
mod prompt;

pub use command::{build_target_command, resolve_executable};
pub use plan::{HandoffPlan, resume, resume_with_store};
pub use project::resolve_project_dir;
pub use prompt::{build_prompt, collect_plan_hint, collect_todo_lines};

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::domain::{HookPayload, ToolKind};
use crate::hooks;
use crate::settings::{self, Settings};
use crate::terminal;

pub const ENV_TARGET_TOOL: &str = "NIGHTSHIFT_TARGET_TOOL";
pub const ENV_SOURCE_TOOL: &str = "NIGHTSHIFT_SOURCE_TOOL";
pub const ENV_PROMPT: &str = "NIGHTSHIFT_PROMPT";
pub const ENV_PROJECT_DIR: &str = "NIGHTSHIFT_PROJECT_DIR";
pub const ENV_NOTIFY_ENABLED: &str = "NIGHTSHIFT_NOTIFY_ENABLED";
pub const ENV_NOTIFY_MESSAGE: &str = "NIGHTSHIFT_NOTIFY_MESSAGE";
pub const ENV_NOTIFY_SOUND: &str = "NIGHTSHIFT_NOTIFY_SOUND";
pub const ENV_KILL_OLD: &str = "NIGHTSHIFT_KILL_OLD";

/// File name of the serialised hand-off plan under the state directory.
pub const PLAN_FILE: &str = "handoff.json";

/// Handle a stop event from `source`: decide the continuation, write the
/// hand-off plan, and spawn the wrapper that launches the next tool.
///
/// With `direct` the continuation runs in-process instead of a new terminal
/// window (headless hosts, tests).
pub fn handle_stop(source: ToolKind, payload: &HookPayload, direct: bool) -> Result<()> {
    let project_dir = project::resolve_project_dir(source, payload);
    let settings = settings::load_or_default(None);

    if !settings.continuation_enabled(source) {
        info!("continuation disabled for {}; nothing to do", source);
        return Ok(());
    }

    let target = settings.resolve_target(source);
    let prompt = prompt::build_prompt(&settings, source, target, &project_dir);
    let command = command::build_target_command(target, &project_dir, &prompt);
    let env = prepare_env(&settings, source, target, &prompt, &project_dir);

    let plan = HandoffPlan {
        command,
        cwd: project_dir.clone(),
        env,
    };

    if direct {
        return plan::resume(&plan);
    }

    let plan_path = settings::state_dir(None).join(PLAN_FILE);
    plan.write(&plan_path)?;

    let wrapper = vec![
        hooks::current_exe_string(),
        "resume".to_string(),
        "--config".to_string(),
        plan_path.display().to_string(),
    ];
    let inner = terminal::wrap_command(&project_dir, &wrapper);
    let detached = terminal::spawn_in_terminal(&settings, target, &project_dir, &inner)?;
    if !detached {
        // No terminal strategy for this platform; run the continuation inline.
        return plan::resume(&plan);
    }

    info!("hand-off from {} to {} spawned", source, target);
    Ok(())
}

/// Environment variables the resume step and the launched tool receive.
pub fn prepare_env(
    settings: &Settings,
    source: ToolKind,
    target: ToolKind,
    prompt: &str,
    project_dir: &Path,
) -> BTreeMap<String, String> {
    let notifications = &settings.notifications;
    let message = notifications
        .message
        .replace("{target}", target.name())
        .replace("{source}", source.name());

    BTreeMap::from([
        (ENV_TARGET_TOOL.to_string(), target.name().to_string()),
        (ENV_SOURCE_TOOL.to_string(), source.name().to_string()),
        (ENV_PROMPT.to_string(), prompt.to_string()),
        (
            ENV_PROJECT_DIR.to_string(),
            project_dir.display().to_string(),
        ),
        (
            ENV_NOTIFY_ENABLED.to_string(),
            if notifications.enabled { "1" } else { "0" }.to_string(),
        ),
        (ENV_NOTIFY_MESSAGE.to_string(), message),
        (ENV_NOTIFY_SOUND.to_string(), notifications.sound.clone()),
        (
            ENV_KILL_OLD.to_string(),
            if settings.kill_old_sessions { "1" } else { "0" }.to_string(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prepare_env_formats_notification_message() {
        let settings = Settings::default();
        let env = prepare_env(
            &settings,
            ToolKind::Claude,
            ToolKind::Codex,
            "do things",
            &PathBuf::from("/work"),
        );
        assert_eq!(env[ENV_TARGET_TOOL], "codex");
        assert_eq!(env[ENV_SOURCE_TOOL], "claude");
        assert_eq!(env[ENV_PROMPT], "do things");
        assert_eq!(env[ENV_PROJECT_DIR], "/work");
        assert_eq!(env[ENV_NOTIFY_MESSAGE], "Continuing on codex");
        assert_eq!(env[ENV_NOTIFY_ENABLED], "1");
        assert_eq!(env[ENV_KILL_OLD], "1");
    }

    #[test]
    fn prepare_env_reflects_disabled_flags() {
        let mut settings = Settings::default();
        settings.notifications.enabled = false;
        settings.kill_old_sessions = false;
        let env = prepare_env(
            &settings,
            ToolKind::Codex,
            ToolKind::Claude,
            "",
            &PathBuf::from("/work"),
        );
        assert_eq!(env[ENV_NOTIFY_ENABLED], "0");
        assert_eq!(env[ENV_KILL_OLD], "0");
    }
}
