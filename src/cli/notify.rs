//! Notification preference commands

use anyhow::{Result, bail};

use nightshift::settings;

/// Override notification content and/or activation state.
pub fn set_command(message: Option<String>, enabled: Option<bool>) -> Result<()> {
    let mut settings = settings::load(None)?;
    if let Some(message) = message {
        settings.notifications.message = message;
    }
    if let Some(enabled) = enabled {
        settings.notifications.enabled = enabled;
    }
    let state = if settings.notifications.enabled {
        "enabled"
    } else {
        "disabled"
    };
    settings::save(&settings, None)?;
    println!("Notifications {state}");
    Ok(())
}

/// Persist the notification sound identifier.
pub fn sound_command(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("sound name must be non-empty");
    }
    let mut settings = settings::load(None)?;
    settings.notifications.sound = name.to_string();
    settings::save(&settings, None)?;
    println!("Notification sound set to {name}");
    Ok(())
}

/// Print the notification preferences.
pub fn show_command() -> Result<()> {
    let settings = settings::load(None)?;
    let prefs = &settings.notifications;
    println!("enabled={}", prefs.enabled);
    println!("message={}", prefs.message);
    println!("sound={}", prefs.sound);
    Ok(())
}
