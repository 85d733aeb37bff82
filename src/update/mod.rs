//! Checking and updating the CLI toolchain nightshift drives.
//!
//! The npm-distributed tools update through `npm install -g`, Codex through
//! Homebrew, and nightshift itself through `cargo install`. Every run
//! appends to `~/.nightshift/update.log` so a broken overnight chain can be
//! traced back to a toolchain update.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// npm package behind each npm-distributed tool.
pub static NPM_PACKAGES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("claude", "@anthropic-ai/claude-code@latest"),
        ("gemini", "@google/gemini-cli@nightly"),
        ("llxprt", "@vybestack/llxprt-code@nightly"),
        ("qwen", "@qwen-code/qwen-code@nightly"),
        ("terragon", "@terragon-labs/cli@latest"),
        ("justevery", "@just-every/code@latest"),
    ])
});

/// Tools distributed through Homebrew.
pub const BREW_PACKAGES: [&str; 1] = ["codex"];

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("version pattern"));

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);
const BREW_TIMEOUT: Duration = Duration::from_secs(10);

/// Observed and nominally available version of one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub current: String,
    pub available: String,
}

/// Coordinates checking and updating of CLI tools and this package.
pub struct UpdateManager {
    update_log: PathBuf,
}

impl UpdateManager {
    pub fn new() -> Self {
        Self::with_log(crate::settings::state_dir(None).join("update.log"))
    }

    /// Log update runs to an explicit file.
    pub fn with_log(update_log: PathBuf) -> Self {
        Self { update_log }
    }

    /// Current and available versions for the core tools and nightshift
    /// itself.
    pub async fn check_versions(&self) -> BTreeMap<String, VersionInfo> {
        let mut versions = BTreeMap::new();
        versions.insert(
            "claude".to_string(),
            VersionInfo {
                current: cli_version("claude").await,
                available: "latest".to_string(),
            },
        );
        versions.insert(
            "codex".to_string(),
            VersionInfo {
                current: cli_version("codex").await,
                available: brew_version("codex").await,
            },
        );
        versions.insert(
            "gemini".to_string(),
            VersionInfo {
                current: cli_version("gemini").await,
                available: "nightly".to_string(),
            },
        );
        versions.insert(
            "nightshift".to_string(),
            VersionInfo {
                current: env!("CARGO_PKG_VERSION").to_string(),
                available: crates_io_version("nightshift").await,
            },
        );
        versions
    }

    /// Update the managed CLI tools, honouring `skip` and `dry_run`.
    pub async fn update_cli_tools(&self, dry_run: bool, skip: &[String]) -> Result<()> {
        let before = self.check_versions().await;
        self.log_update(&format!(
            "Starting CLI tools update. Versions before: {}",
            render_versions(&before)
        ))?;

        for (tool, package) in NPM_PACKAGES.iter() {
            if skip.iter().any(|skipped| skipped == tool) {
                info!("skipping {}", tool);
                continue;
            }
            if dry_run {
                info!("[dry run] would run: npm install -g {}", package);
                continue;
            }
            match Command::new("npm")
                .args(["install", "-g", *package])
                .output()
                .await
            {
                Ok(output) if output.status.success() => info!("updated {}", tool),
                Ok(output) => warn!(
                    "failed to update {}: {}",
                    tool,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                Err(error) => warn!("error updating {}: {}", tool, error),
            }
        }

        for package in BREW_PACKAGES {
            if skip.iter().any(|skipped| skipped == package) {
                info!("skipping {}", package);
                continue;
            }
            if dry_run {
                info!("[dry run] would run: brew upgrade {}", package);
                continue;
            }
            let _ = Command::new("brew").arg("update").output().await;
            match Command::new("brew")
                .args(["upgrade", package])
                .output()
                .await
            {
                Ok(output)
                    if output.status.success()
                        || String::from_utf8_lossy(&output.stderr)
                            .contains("already installed") =>
                {
                    info!("updated {}", package)
                }
                Ok(output) => warn!(
                    "failed to update {}: {}",
                    package,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
                Err(error) => warn!("error updating {}: {}", package, error),
            }
        }

        if !dry_run {
            let after = self.check_versions().await;
            self.log_update(&format!(
                "CLI tools update complete. Versions after: {}",
                render_versions(&after)
            ))?;
        }
        Ok(())
    }

    /// Update the nightshift package itself via cargo.
    pub async fn update_self(&self, dry_run: bool) -> Result<()> {
        if dry_run {
            info!("[dry run] would run: cargo install nightshift");
            return Ok(());
        }
        match Command::new("cargo")
            .args(["install", "nightshift"])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                info!("updated nightshift");
                self.log_update("nightshift package updated successfully")?;
            }
            Ok(output) => warn!(
                "failed to update nightshift: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(error) => warn!("error updating nightshift: {}", error),
        }
        Ok(())
    }

    /// Append a timestamped line to the persistent update log.
    fn log_update(&self, message: &str) -> Result<()> {
        use std::io::Write;

        if let Some(parent) = self.update_log.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.update_log)
            .with_context(|| format!("Failed to open {}", self.update_log.display()))?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{timestamp}] {message}")
            .with_context(|| format!("Failed to write {}", self.update_log.display()))?;
        Ok(())
    }
}

impl Default for UpdateManager {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line rendering of a version table for the update log.
fn render_versions(versions: &BTreeMap<String, VersionInfo>) -> String {
    versions
        .iter()
        .map(|(tool, info)| format!("{} {} -> {}", tool, info.current, info.available))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The version `tool --version` reports, or a placeholder when the tool is
/// missing or does not answer within five seconds.
async fn cli_version(tool: &str) -> String {
    let result = tokio::time::timeout(
        VERSION_TIMEOUT,
        Command::new(tool).arg("--version").output(),
    )
    .await;
    let Ok(Ok(output)) = result else {
        return "not installed".to_string();
    };
    if !output.status.success() {
        return "not installed".to_string();
    }
    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// First semver-looking token of a `--version` output, else the first word.
fn parse_version_output(output: &str) -> String {
    let text = output.trim();
    if let Some(found) = VERSION_RE.find(text) {
        return found.as_str().to_string();
    }
    text.split_whitespace()
        .next()
        .unwrap_or("unknown")
        .to_string()
}

/// Latest version Homebrew reports for `package`.
async fn brew_version(package: &str) -> String {
    let result = tokio::time::timeout(
        BREW_TIMEOUT,
        Command::new("brew")
            .args(["info", "--json=v2", package])
            .output(),
    )
    .await;
    let Ok(Ok(output)) = result else {
        return "latest".to_string();
    };
    if !output.status.success() {
        return "latest".to_string();
    }
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(&output.stdout) else {
        return "latest".to_string();
    };
    json.get("formulae")
        .and_then(|formulae| formulae.get(0))
        .and_then(|formula| formula.get("version"))
        .and_then(|version| version.as_str())
        .unwrap_or("latest")
        .to_string()
}

/// Latest published version of `name` on crates.io.
async fn crates_io_version(name: &str) -> String {
    let name = name.to_string();
    tokio::task::spawn_blocking(move || fetch_crates_io_version(&name))
        .await
        .unwrap_or_else(|_| "latest".to_string())
}

fn fetch_crates_io_version(name: &str) -> String {
    let url = format!("https://crates.io/api/v1/crates/{name}");
    let response = match ureq::get(&url)
        .set("User-Agent", "nightshift-update-checker")
        .timeout(Duration::from_secs(5))
        .call()
    {
        Ok(response) => response,
        Err(error) => {
            debug!("crates.io lookup failed for {}: {}", name, error);
            return "latest".to_string();
        }
    };
    let Ok(body) = response.into_string() else {
        return "latest".to_string();
    };
    let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) else {
        return "latest".to_string();
    };
    json.get("crate")
        .and_then(|krate| krate.get("max_version"))
        .and_then(|version| version.as_str())
        .unwrap_or("latest")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version_output_extracts_semver() {
        assert_eq!(parse_version_output("claude 1.2.3 (stable)"), "1.2.3");
        assert_eq!(parse_version_output("v0.45.1\n"), "0.45.1");
    }

    #[test]
    fn parse_version_output_falls_back_to_first_word() {
        assert_eq!(parse_version_output("nightly build"), "nightly");
        assert_eq!(parse_version_output("   "), "unknown");
    }

    #[test]
    fn render_versions_is_stable_and_readable() {
        let versions = BTreeMap::from([
            (
                "claude".to_string(),
                VersionInfo {
                    current: "1.0.0".to_string(),
                    available: "latest".to_string(),
                },
            ),
            (
                "codex".to_string(),
                VersionInfo {
                    current: "not installed".to_string(),
                    available: "latest".to_string(),
                },
            ),
        ]);
        assert_eq!(
            render_versions(&versions),
            "claude 1.0.0 -> latest, codex not installed -> latest"
        );
    }
}
