//! Settings file I/O with backup, locking, and atomic replacement.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Settings;

/// Directory name under the user's home that holds all nightshift state.
pub const STATE_DIR_NAME: &str = ".nightshift";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Directory nightshift keeps its state in (`~/.nightshift` by default).
///
/// `home` overrides the base directory; tests use this to stay inside a
/// temporary directory.
pub fn state_dir(home: Option<&Path>) -> PathBuf {
    let base = home
        .map(Path::to_path_buf)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(STATE_DIR_NAME)
}

/// Full path of `settings.toml` under `home`.
pub fn settings_path(home: Option<&Path>) -> PathBuf {
    state_dir(home).join(SETTINGS_FILE_NAME)
}

/// Load user settings, creating the file with defaults on first run.
pub fn load(home: Option<&Path>) -> Result<Settings> {
    let path = settings_path(home);
    if !path.exists() {
        let settings = Settings::default();
        save(&settings, home)?;
        return Ok(settings);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let mut settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
    settings.fill_defaults();
    settings.validate()?;
    Ok(settings)
}

/// Load settings, falling back to packaged defaults on any error.
///
/// Hook handlers use this: a continuation must not die because the settings
/// file rotted on disk.
pub fn load_or_default(home: Option<&Path>) -> Settings {
    match load(home) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!("falling back to default settings: {:#}", error);
            Settings::default()
        }
    }
}

/// Persist `settings`, creating a timestamped backup of any existing file.
///
/// The write itself takes an exclusive lock and goes through a temp file plus
/// atomic rename so concurrent invocations cannot corrupt the settings.
pub fn save(settings: &Settings, home: Option<&Path>) -> Result<PathBuf> {
    settings.validate()?;

    let path = settings_path(home);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create settings directory: {}", parent.display())
        })?;
    }
    if path.exists() {
        backup_file(&path)?;
    }

    let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

    // Lock file is separate from the settings file to survive the rename.
    let lock_path = path.with_extension("toml.lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .context("Failed to acquire settings lock")?;

    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write settings content")?;
    temp_file
        .sync_all()
        .context("Failed to sync settings file")?;

    std::fs::rename(&temp_path, &path)
        .with_context(|| format!("Failed to rename settings file: {}", path.display()))?;

    // Lock is released when lock_file is dropped.
    Ok(path)
}

/// Copy `path` aside as `<name>.backup.<timestamp>` before a rewrite.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .context("config path has no file name")?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup = path.with_file_name(format!("{file_name}.backup.{stamp}"));
    std::fs::copy(path, &backup)
        .with_context(|| format!("Failed to back up {}", path.display()))?;
    tracing::debug!("backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}
