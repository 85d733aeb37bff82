//! Integration tests for instruction-file synchronisation

mod common;

use std::path::Path;

use tempfile::TempDir;

use nightshift::rules::RulesManager;

use common::write_file;

fn manager_for(root: &Path) -> RulesManager {
    RulesManager::with_paths(vec![root.to_path_buf()])
}

#[cfg(unix)]
fn inode(path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).expect("Failed to stat file").ino()
}

#[test]
fn find_instruction_files_discovers_nested_copies() {
    let root = TempDir::new().expect("Failed to create temp dir");
    write_file(&root.path().join("CLAUDE.md"), "top");
    write_file(&root.path().join("sub/project/CLAUDE.md"), "nested");
    write_file(&root.path().join("sub/AGENTS.md"), "agents");

    let found = manager_for(root.path()).find_instruction_files();
    assert_eq!(found["CLAUDE.md"].len(), 2);
    assert_eq!(found["AGENTS.md"].len(), 1);
    assert!(found["GEMINI.md"].is_empty());
}

#[cfg(unix)]
#[test]
fn sync_links_copies_to_the_non_empty_parent() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let parent = root.path().join("a/CLAUDE.md");
    let copy = root.path().join("b/CLAUDE.md");
    write_file(&parent, "canonical content\n");
    write_file(&copy, "");

    manager_for(root.path()).sync_files().unwrap();

    assert_eq!(inode(&parent), inode(&copy));
    assert_eq!(
        std::fs::read_to_string(&copy).unwrap(),
        "canonical content\n"
    );
}

#[cfg(unix)]
#[test]
fn append_reaches_linked_copies_through_the_parent() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let parent = root.path().join("a/CLAUDE.md");
    let copy = root.path().join("b/CLAUDE.md");
    write_file(&parent, "base\n");
    write_file(&copy, "");

    let manager = manager_for(root.path());
    manager.sync_files().unwrap();
    manager.append_to_files("always run the tests").unwrap();

    let content = std::fs::read_to_string(&copy).unwrap();
    assert!(content.contains("base"));
    assert!(content.contains("always run the tests"));
}

#[cfg(unix)]
#[test]
fn search_reports_hard_linked_copies_once() {
    let root = TempDir::new().expect("Failed to create temp dir");
    write_file(&root.path().join("a/CLAUDE.md"), "prefer small commits\n");
    write_file(&root.path().join("b/CLAUDE.md"), "");

    let manager = manager_for(root.path());
    manager.sync_files().unwrap();

    let results = manager.search_files("small commits");
    assert_eq!(results["CLAUDE.md"].len(), 1);
    assert!(results["CLAUDE.md"][0].contains(":1:"));
}

#[test]
fn search_returns_nothing_when_pattern_is_absent() {
    let root = TempDir::new().expect("Failed to create temp dir");
    write_file(&root.path().join("CLAUDE.md"), "some rules\n");

    let results = manager_for(root.path()).search_files("not there");
    assert!(results.is_empty());
}

#[test]
fn replace_rewrites_matching_files() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let rules = root.path().join("CLAUDE.md");
    let agents = root.path().join("AGENTS.md");
    write_file(&rules, "use python for scripts\n");
    write_file(&agents, "nothing relevant\n");

    manager_for(root.path())
        .replace_in_files("python", "rust")
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&rules).unwrap(),
        "use rust for scripts\n"
    );
    assert_eq!(
        std::fs::read_to_string(&agents).unwrap(),
        "nothing relevant\n"
    );
}
