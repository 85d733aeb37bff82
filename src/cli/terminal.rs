//! Terminal launch command configuration

use anyhow::{Result, bail};

use nightshift::settings;
use nightshift::terminal::COMMAND_PLACEHOLDER;

/// Persist a terminal launch command for a platform key.
pub fn set_command(platform: &str, command: Vec<String>) -> Result<()> {
    let key = platform.to_lowercase();
    if command.is_empty() {
        bail!("provide a terminal command containing the {{command}} placeholder");
    }
    let last = command.last().map(String::as_str).unwrap_or_default();
    if !last.contains(COMMAND_PLACEHOLDER) {
        bail!("last argument must include the {{command}} placeholder");
    }

    let mut settings = settings::load(None)?;
    settings.terminals.defaults.insert(key.clone(), command);
    settings::save(&settings, None)?;
    println!("Terminal command for {key} updated");
    Ok(())
}

/// Print the stored terminal command for a platform key.
pub fn show_command(platform: &str) -> Result<()> {
    let key = platform.to_lowercase();
    let settings = settings::load(None)?;
    let Some(command) = settings.terminals.defaults.get(&key) else {
        bail!("no terminal command configured for {key}");
    };
    println!("{}", command.join(" "));
    Ok(())
}
