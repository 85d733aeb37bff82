//! Git-tag driven patch version bumps (`nightshift bump`).

use std::path::Path;

use anyhow::{Context, Result, bail};
use semver::Version;

/// Whether `dir` is the root of a git repository.
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Whether the working tree has no uncommitted changes.
pub fn working_tree_clean(dir: &Path) -> Result<bool> {
    let output = std::process::Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(dir)
        .output()
        .context("Failed to run git status")?;
    if !output.status.success() {
        bail!("git status failed");
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// Next patch tag derived from the highest existing `vX.Y.Z` tag.
/// Unparseable tags are ignored; no tags at all yields `v1.0.0`.
pub fn next_version(tags: &[String]) -> String {
    let mut best: Option<Version> = None;
    for tag in tags {
        let Some(raw) = tag.strip_prefix('v') else {
            continue;
        };
        let Ok(version) = Version::parse(raw) else {
            continue;
        };
        if best.as_ref().map_or(true, |current| version > *current) {
            best = Some(version);
        }
    }
    match best {
        Some(mut version) => {
            version.patch += 1;
            format!("v{version}")
        }
        None => "v1.0.0".to_string(),
    }
}

/// All `v*.*.*` tags in the repository at `dir`.
pub fn list_version_tags(dir: &Path) -> Result<Vec<String>> {
    let output = std::process::Command::new("git")
        .args(["tag", "-l", "v*.*.*"])
        .current_dir(dir)
        .output()
        .context("Failed to list git tags")?;
    if !output.status.success() {
        bail!("git tag -l failed");
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .map(String::from)
        .collect())
}

/// Pull, compute the next patch version, tag it, and push commits and tags.
/// Returns the created tag.
pub fn bump(dir: &Path, verbose: bool) -> Result<String> {
    if !is_git_repo(dir) {
        bail!("Not a git repository");
    }
    if !working_tree_clean(dir)? {
        bail!("Working tree not clean. Commit changes first.");
    }

    if verbose {
        println!("Pulling latest changes...");
    }
    run_git(dir, &["pull"]).context("Failed to pull from remote")?;

    let version = next_version(&list_version_tags(dir)?);
    println!("Creating version: {version}");

    if verbose {
        println!("Creating tag {version}...");
    }
    run_git(dir, &["tag", &version]).with_context(|| format!("Failed to create tag {version}"))?;

    if verbose {
        println!("Pushing commits...");
    }
    run_git(dir, &["push"]).context("Failed to push commits")?;

    if verbose {
        println!("Pushing tags...");
    }
    run_git(dir, &["push", "--tags"]).context("Failed to push tags")?;

    Ok(version)
}

fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|tag| tag.to_string()).collect()
    }

    #[test]
    fn next_version_without_tags_starts_at_one() {
        assert_eq!(next_version(&[]), "v1.0.0");
    }

    #[test]
    fn next_version_bumps_patch_of_highest_tag() {
        assert_eq!(
            next_version(&tags(&["v1.0.0", "v1.2.3", "v0.9.9"])),
            "v1.2.4"
        );
    }

    #[test]
    fn next_version_compares_numerically_not_lexically() {
        assert_eq!(next_version(&tags(&["v1.9.0", "v1.10.0"])), "v1.10.1");
    }

    #[test]
    fn next_version_ignores_unparseable_tags() {
        assert_eq!(
            next_version(&tags(&["vNext", "release-2", "v2.0.0"])),
            "v2.0.1"
        );
        assert_eq!(next_version(&tags(&["vNext", "release-2"])), "v1.0.0");
    }
}
