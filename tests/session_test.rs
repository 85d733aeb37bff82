//! Integration tests for session-state tracking

mod common;

use tempfile::TempDir;

use nightshift::ToolKind;
use nightshift::session::SessionStore;

use common::write_file;

#[test]
fn write_then_read_returns_the_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(&dir.path().join("state"));

    let written = store
        .write(ToolKind::Claude, 4242, dir.path())
        .expect("write should succeed");
    let read = store.read().expect("read should find the session");

    assert_eq!(read.tool, ToolKind::Claude);
    assert_eq!(read.pid, 4242);
    assert_eq!(read.cwd, dir.path().display().to_string());
    assert_eq!(read.start_time, written.start_time);
}

#[test]
fn read_returns_none_for_missing_or_corrupt_state() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(dir.path());

    assert!(store.read().is_none());

    write_file(store.state_file(), "{ not json");
    assert!(store.read().is_none());

    write_file(store.state_file(), r#"{"tool": "claude"}"#);
    assert!(store.read().is_none());
}

#[test]
fn clear_removes_the_state_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(dir.path());

    store.write(ToolKind::Codex, 1, dir.path()).unwrap();
    assert!(store.state_file().exists());

    store.clear().unwrap();
    assert!(!store.state_file().exists());

    // Clearing again is fine.
    store.clear().unwrap();
}

#[test]
fn rotate_without_killing_replaces_the_record() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(dir.path());

    store.write(ToolKind::Claude, 100, dir.path()).unwrap();
    store
        .rotate(ToolKind::Gemini, 200, dir.path(), false)
        .unwrap();

    let session = store.read().unwrap();
    assert_eq!(session.tool, ToolKind::Gemini);
    assert_eq!(session.pid, 200);
}

#[cfg(unix)]
#[test]
fn kill_old_ignores_dead_processes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(dir.path());

    // Spawn and reap a short-lived child; its pid is guaranteed dead.
    let mut child = std::process::Command::new("true")
        .spawn()
        .expect("Failed to spawn child");
    let pid = child.id();
    child.wait().expect("Failed to wait for child");

    let session = store.write(ToolKind::Claude, pid, dir.path()).unwrap();
    assert!(!store.kill_old(&session));
}

#[cfg(unix)]
#[test]
fn kill_old_refuses_processes_that_are_not_tracked_tools() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SessionStore::with_dir(dir.path());

    let mut child = std::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .expect("Failed to spawn sleeper");

    let session = store.write(ToolKind::Claude, child.id(), dir.path()).unwrap();
    // Alive, but named "sleep": the PID-reuse guard must leave it alone.
    assert!(!store.kill_old(&session));

    child.kill().expect("Failed to kill sleeper");
    child.wait().expect("Failed to reap sleeper");
}
