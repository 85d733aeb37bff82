//! Backup-validate-replace plumbing for foreign configuration files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::settings::backup_file;

/// Replace `target` with `content`, keeping a timestamped backup and rolling
/// back when the freshly written file fails `validate`.
///
/// A failed edit never leaves a half-written config behind: the backup is
/// restored, or the target removed when it did not exist before.
pub(super) fn replace_with_rollback(
    target: &Path,
    content: &str,
    validate: fn(&str) -> Result<()>,
) -> Result<()> {
    let backup = if target.exists() {
        Some(backup_file(target)?)
    } else {
        None
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .context("config path has no file name")?;
    let temp_path = target.with_file_name(format!("{file_name}.tmp"));

    let result = write_and_validate(&temp_path, content, validate).and_then(|()| {
        std::fs::rename(&temp_path, target)
            .with_context(|| format!("Failed to replace {}", target.display()))
    });

    if let Err(error) = result {
        let _ = std::fs::remove_file(&temp_path);
        restore_from_backup(target, backup.as_deref());
        return Err(error);
    }
    Ok(())
}

fn write_and_validate(
    temp_path: &Path,
    content: &str,
    validate: fn(&str) -> Result<()>,
) -> Result<()> {
    std::fs::write(temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    // Validate what actually landed on disk, not the in-memory content.
    let written = std::fs::read_to_string(temp_path)
        .with_context(|| format!("Failed to re-read {}", temp_path.display()))?;
    validate(&written)
}

fn restore_from_backup(target: &Path, backup: Option<&Path>) {
    match backup {
        Some(backup) if backup.exists() => {
            let _ = std::fs::copy(backup, target);
        }
        None => {
            if target.exists() {
                let _ = std::fs::remove_file(target);
            }
        }
        _ => {}
    }
}

pub(super) fn validate_json(content: &str) -> Result<()> {
    serde_json::from_str::<serde_json::Value>(content)
        .map(|_| ())
        .context("written config is not valid JSON")
}

pub(super) fn validate_toml(content: &str) -> Result<()> {
    toml::from_str::<toml::Table>(content)
        .map(|_| ())
        .context("written config is not valid TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_and_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.json");
        std::fs::write(&target, "{\"old\": true}").unwrap();

        replace_with_rollback(&target, "{\"new\": true}", validate_json).unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"new\": true}");
        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".backup."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            std::fs::read_to_string(backups[0].path()).unwrap(),
            "{\"old\": true}"
        );
    }

    #[test]
    fn rolls_back_when_validation_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("config.json");
        std::fs::write(&target, "{\"old\": true}").unwrap();

        let result = replace_with_rollback(&target, "not json", validate_json);

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"old\": true}");
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[test]
    fn failed_first_write_leaves_no_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("fresh.toml");

        let result = replace_with_rollback(&target, "definitely = not [ toml", validate_toml);

        assert!(result.is_err());
        assert!(!target.exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(".claude").join("settings.json");

        replace_with_rollback(&target, "{}", validate_json).unwrap();

        assert!(target.exists());
    }
}
