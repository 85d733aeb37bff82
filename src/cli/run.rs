//! Run command implementation

use std::path::PathBuf;

use anyhow::Result;

use nightshift::ToolKind;
use nightshift::launcher::Launcher;

/// Launch one of the supported CLIs with continuation-friendly defaults.
pub async fn run_command(
    tool: ToolKind,
    cwd: Option<PathBuf>,
    profile: Option<String>,
    exec: bool,
    model: Option<String>,
    prompt: Option<String>,
) -> Result<()> {
    let launcher = Launcher::new();
    match tool {
        ToolKind::Claude => {
            launcher
                .launch_claude(cwd.as_deref(), model.as_deref(), prompt.as_deref())
                .await?
        }
        ToolKind::Codex => {
            launcher
                .launch_codex(cwd.as_deref(), profile.as_deref(), exec, prompt.as_deref())
                .await?
        }
        ToolKind::Gemini => {
            launcher
                .launch_gemini(cwd.as_deref(), prompt.as_deref())
                .await?
        }
    }
    println!("Launched {tool}");
    Ok(())
}
