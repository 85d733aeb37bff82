//! Continuation routing commands

use anyhow::Result;

use nightshift::ToolKind;
use nightshift::settings;

/// Enable continuation for `source` and point it at `target`.
pub fn set_command(source: ToolKind, target: ToolKind) -> Result<()> {
    let mut settings = settings::load(None)?;
    settings.set_continuation(source, target);
    settings::save(&settings, None)?;
    println!("{source} continuation now targets {target}");
    Ok(())
}

/// Turn off continuation for `source`, leaving other tools intact.
pub fn disable_command(source: ToolKind) -> Result<()> {
    let mut settings = settings::load(None)?;
    settings.disable_continuation(source);
    settings::save(&settings, None)?;
    println!("{source} continuation disabled");
    Ok(())
}

/// Print the continuation routing table.
pub fn status_command() -> Result<()> {
    let settings = settings::load(None)?;
    for (tool, prefs) in &settings.continuations {
        println!(
            "{}: enabled={} target={}",
            tool, prefs.enabled, prefs.target
        );
    }
    Ok(())
}
