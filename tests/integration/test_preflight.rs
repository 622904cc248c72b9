//! Preflight invariants observed through the binary

use crate::helpers::*;

#[test]
fn dirty_unrelated_file_aborts_with_zero_side_effects() {
  let ws = TestWorkspace::new().unwrap();

  std::fs::write(ws.path.join("README.md"), "# Quarterdeck\n\nEdited.\n").unwrap();
  let manifest_before = ws.read_file("Cargo.toml").unwrap();
  let porcelain_before = ws.porcelain().unwrap();

  let output = try_run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted changes"), "stderr: {}", stderr);
  assert!(stderr.contains("README.md"));

  // Tree and manifest are byte-identical to the pre-invocation state
  assert_eq!(ws.read_file("Cargo.toml").unwrap(), manifest_before);
  assert_eq!(ws.porcelain().unwrap(), porcelain_before);
  assert!(!ws.has_local_tag("v0.1.2").unwrap());
}

#[test]
fn staged_changes_are_rejected() {
  let ws = TestWorkspace::new().unwrap();

  std::fs::write(ws.path.join("notes.txt"), "scratch\n").unwrap();
  git(&ws.path, &["add", "notes.txt"]).unwrap();

  let output = try_run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("staged"), "stderr: {}", stderr);
}

#[test]
fn existing_local_tag_is_rejected() {
  let ws = TestWorkspace::new().unwrap();
  git(&ws.path, &["tag", "v0.1.2"]).unwrap();

  let output = try_run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("v0.1.2"));
  assert!(stderr.contains("locally"));
}

#[test]
fn remote_only_tag_is_rejected() {
  let ws = TestWorkspace::new().unwrap();

  // Tag exists only on the remote
  git(&ws.path, &["tag", "v0.1.2"]).unwrap();
  git(&ws.path, &["push", "origin", "v0.1.2"]).unwrap();
  git(&ws.path, &["tag", "-d", "v0.1.2"]).unwrap();

  let output = try_run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("origin"), "stderr: {}", stderr);
  assert!(stderr.contains("v0.1.2"));
}

#[test]
fn behind_remote_is_rejected() {
  let ws = TestWorkspace::new().unwrap();

  // Advance the remote from a second clone, leaving the checkout behind
  let clone_dir = ws.path.parent().unwrap().join("clone");
  git(
    ws.path.parent().unwrap(),
    &["clone", ws.origin.to_str().unwrap(), clone_dir.to_str().unwrap()],
  )
  .unwrap();
  git(&clone_dir, &["config", "user.name", "Other User"]).unwrap();
  git(&clone_dir, &["config", "user.email", "other@example.com"]).unwrap();
  std::fs::write(clone_dir.join("CHANGELOG.md"), "# Changelog\n").unwrap();
  git(&clone_dir, &["add", "."]).unwrap();
  git(&clone_dir, &["commit", "-m", "Add changelog"]).unwrap();
  git(&clone_dir, &["push", "origin", "main"]).unwrap();

  let output = try_run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("behind"), "stderr: {}", stderr);
}
