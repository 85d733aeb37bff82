//! Prompt template commands

use anyhow::Result;

use nightshift::ToolKind;
use nightshift::settings;

/// Persist a continuation prompt template for `tool`.
pub fn set_command(tool: ToolKind, template: String) -> Result<()> {
    let mut settings = settings::load(None)?;
    settings.set_prompt(tool, template);
    settings::save(&settings, None)?;
    println!("Prompt for {tool} updated");
    Ok(())
}

/// Print the stored prompt template for `tool`.
pub fn show_command(tool: ToolKind) -> Result<()> {
    let settings = settings::load(None)?;
    println!("{}", settings.prompt_for(tool));
    Ok(())
}
