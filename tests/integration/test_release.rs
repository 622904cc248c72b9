//! End-to-end release flow against a local bare remote

use crate::helpers::*;

#[test]
fn release_patch_commits_tags_and_pushes() {
  let ws = TestWorkspace::new().unwrap();

  run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  // Manifest bumped
  let manifest = ws.read_file("Cargo.toml").unwrap();
  assert!(manifest.contains("version = \"0.1.2\""));

  // Tag exists locally and on the remote
  assert!(ws.has_local_tag("v0.1.2").unwrap());
  assert!(ws.has_remote_tag("v0.1.2").unwrap());

  // Branch was pushed: remote main matches local HEAD
  assert_eq!(ws.remote_head().unwrap(), ws.local_head().unwrap());

  // Working tree is clean after the release
  assert_eq!(ws.porcelain().unwrap(), "");
}

#[test]
fn release_defaults_to_patch() {
  let ws = TestWorkspace::new().unwrap();

  run_deckhand(&ws.path, &["release", "--yes", "--no-monitor"]).unwrap();

  assert!(ws.has_local_tag("v0.1.2").unwrap());
}

#[test]
fn minor_and_major_bumps_reset_lower_components() {
  let ws = TestWorkspace::new().unwrap();

  run_deckhand(&ws.path, &["release", "minor", "--yes", "--no-monitor"]).unwrap();
  assert!(ws.has_local_tag("v0.2.0").unwrap());

  run_deckhand(&ws.path, &["release", "major", "--yes", "--no-monitor"]).unwrap();
  assert!(ws.has_local_tag("v1.0.0").unwrap());
}

#[test]
fn status_reports_new_version_after_release() {
  let ws = TestWorkspace::new().unwrap();

  run_deckhand(&ws.path, &["release", "patch", "--yes", "--no-monitor"]).unwrap();

  let output = run_deckhand(&ws.path, &["status", "--json"]).unwrap();
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

  assert_eq!(report["version"], "0.1.2");
  assert_eq!(report["latest_tag"], "v0.1.2");
  assert_eq!(report["branch"], "main");
  assert_eq!(report["untagged_version"], false);
}

#[test]
fn custom_commit_message_is_used() {
  let ws = TestWorkspace::new().unwrap();

  run_deckhand(
    &ws.path,
    &[
      "release",
      "patch",
      "--yes",
      "--no-monitor",
      "--message",
      "Ship the new sidebar",
    ],
  )
  .unwrap();

  let output = git(&ws.path, &["log", "-1", "--format=%s"]).unwrap();
  let subject = String::from_utf8_lossy(&output.stdout);
  assert_eq!(subject.trim(), "Ship the new sidebar");
}

#[test]
fn declining_the_final_confirmation_restores_the_manifest() {
  let ws = TestWorkspace::new().unwrap();
  let manifest_before = ws.read_file("Cargo.toml").unwrap();

  // Empty line accepts the default commit message, "n" declines the go/no-go
  let output = try_run_deckhand_with_input(&ws.path, &["release", "patch", "--no-monitor"], "\nn\n").unwrap();

  assert!(output.status.success(), "an operator abort is not a failure");
  assert_eq!(ws.read_file("Cargo.toml").unwrap(), manifest_before);
  assert_eq!(ws.porcelain().unwrap(), "");
  assert!(!ws.has_local_tag("v0.1.2").unwrap());
}
