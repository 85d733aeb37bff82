//! Synchronise and edit shared instruction files across CLI tools.
//!
//! Every assistant reads its own instruction file (`CLAUDE.md`, `AGENTS.md`,
//! `GEMINI.md`, ...) with largely the same content. This module discovers
//! those files, links the copies of each name to one canonical parent, and
//! offers append/search/replace across them. Hard-linked copies are
//! deduplicated by inode so an edit is reported once.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Instruction file names the assistants look for.
pub const INSTRUCTION_FILES: [&str; 6] = [
    "CLAUDE.md",
    "AGENTS.md",
    "GEMINI.md",
    "QWEN.md",
    "LLXPRT.md",
    ".cursorrules",
];

/// Coordinates instruction file discovery and synchronisation.
pub struct RulesManager {
    search_paths: Vec<PathBuf>,
}

impl RulesManager {
    /// `global_mode` switches from the current working directory to the
    /// assistants' config directories under the user's home.
    pub fn new(global_mode: bool) -> Self {
        let search_paths = if global_mode {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            [".claude", ".codex", ".gemini", ".qwen", ".llxprt", ".cursor"]
                .iter()
                .map(|dir| home.join(dir))
                .collect()
        } else {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        };
        Self { search_paths }
    }

    /// Operate on explicit search roots.
    pub fn with_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Discover instruction files within the configured search paths,
    /// grouped by file name.
    pub fn find_instruction_files(&self) -> BTreeMap<String, Vec<PathBuf>> {
        let mut by_name = BTreeMap::new();
        for name in INSTRUCTION_FILES {
            let mut found: Vec<PathBuf> = Vec::new();
            let mut seen = HashSet::new();
            for root in &self.search_paths {
                if !root.exists() {
                    continue;
                }
                for pattern in [
                    format!("{}/{}", root.display(), name),
                    format!("{}/**/{}", root.display(), name),
                ] {
                    let Ok(paths) = glob::glob(&pattern) else {
                        continue;
                    };
                    for path in paths.flatten() {
                        if seen.insert(path.clone()) {
                            found.push(path);
                        }
                    }
                }
            }
            by_name.insert(name.to_string(), found);
        }
        by_name
    }

    /// Link every copy of each instruction file to its canonical parent.
    /// Individual link failures are logged, not fatal.
    pub fn sync_files(&self) -> Result<()> {
        for (name, paths) in self.find_instruction_files() {
            if paths.len() < 2 {
                continue;
            }
            let Some(parent) = find_parent_file(&paths) else {
                continue;
            };
            debug!("syncing {} against {}", name, parent.display());
            for path in &paths {
                if *path == parent {
                    continue;
                }
                if let Err(error) = relink(path, &parent) {
                    warn!("failed to link {}: {:#}", path.display(), error);
                }
            }
        }
        Ok(())
    }

    /// Append `text` to the canonical copy of each instruction file. Linked
    /// copies see the change through the link.
    pub fn append_to_files(&self, text: &str) -> Result<()> {
        use std::io::Write;

        for (name, paths) in self.find_instruction_files() {
            let Some(parent) = find_parent_file(&paths) else {
                continue;
            };
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&parent)
                .with_context(|| format!("Failed to open {}", parent.display()))?;
            writeln!(file, "\n{text}")
                .with_context(|| format!("Failed to append to {}", parent.display()))?;
            info!("appended text to {}", name);
        }
        Ok(())
    }

    /// Search for `pattern` in each instruction file. Results are
    /// `path:line: text` strings grouped by file name.
    pub fn search_files(&self, pattern: &str) -> BTreeMap<String, Vec<String>> {
        let mut results = BTreeMap::new();
        for (name, paths) in self.find_instruction_files() {
            let mut matches = Vec::new();
            let mut seen_ids = HashSet::new();

            for path in &paths {
                if already_seen(path, &mut seen_ids) {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(path) else {
                    debug!("could not read {}", path.display());
                    continue;
                };
                for (line_number, line) in content.lines().enumerate() {
                    if line.contains(pattern) {
                        matches.push(format!(
                            "{}:{}: {}",
                            path.display(),
                            line_number + 1,
                            line.trim()
                        ));
                    }
                }
            }

            if !matches.is_empty() {
                results.insert(name, matches);
            }
        }
        results
    }

    /// Replace `search` with `replace` across all instruction files.
    pub fn replace_in_files(&self, search: &str, replace: &str) -> Result<()> {
        let mut seen_ids = HashSet::new();

        for (_name, paths) in self.find_instruction_files() {
            for path in &paths {
                if already_seen(path, &mut seen_ids) {
                    continue;
                }
                let Ok(content) = std::fs::read_to_string(path) else {
                    continue;
                };
                if content.contains(search) {
                    let updated = content.replace(search, replace);
                    std::fs::write(path, updated)
                        .with_context(|| format!("Failed to rewrite {}", path.display()))?;
                    info!("replaced text in {}", path.display());
                }
            }
        }
        Ok(())
    }
}

/// The most recently modified non-empty copy, used as the canonical file.
fn find_parent_file(paths: &[PathBuf]) -> Option<PathBuf> {
    let mut valid = Vec::new();
    for path in paths {
        let Ok(metadata) = std::fs::metadata(path) else {
            continue;
        };
        if metadata.len() == 0 {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        valid.push((modified, path.clone()));
    }
    valid.sort_by(|a, b| b.0.cmp(&a.0));
    valid.into_iter().next().map(|(_, path)| path)
}

/// Replace `path` with a hard link to `parent`, falling back to a symlink.
fn relink(path: &Path, parent: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    if std::fs::hard_link(parent, path).is_ok() {
        return Ok(());
    }
    symlink(parent, path)
        .with_context(|| format!("Failed to link {} to {}", path.display(), parent.display()))
}

#[cfg(unix)]
fn symlink(parent: &Path, path: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(parent, path)
}

#[cfg(windows)]
fn symlink(parent: &Path, path: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(parent, path)
}

/// Track files by inode so hard-linked copies are processed once. On
/// platforms without inodes every path is treated as distinct.
fn already_seen(path: &Path, seen: &mut HashSet<u64>) -> bool {
    match file_id(path) {
        Some(id) => !seen.insert(id),
        None => false,
    }
}

#[cfg(unix)]
fn file_id(path: &Path) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).ok().map(|metadata| metadata.ino())
}

#[cfg(not(unix))]
fn file_id(_path: &Path) -> Option<u64> {
    None
}
