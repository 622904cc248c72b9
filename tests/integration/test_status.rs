//! Status command output

use crate::helpers::*;

#[test]
fn status_reports_manifest_version_and_branch() {
  let ws = TestWorkspace::new().unwrap();

  let output = run_deckhand(&ws.path, &["status"]).unwrap();
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("0.1.1"));
  assert!(stdout.contains("main"));
}

#[test]
fn status_json_marks_untagged_version() {
  let ws = TestWorkspace::new().unwrap();

  let output = run_deckhand(&ws.path, &["status", "--json"]).unwrap();
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

  assert_eq!(report["version"], "0.1.1");
  assert_eq!(report["latest_tag"], serde_json::Value::Null);
  assert_eq!(report["untagged_version"], true);
}

#[test]
fn status_is_read_only() {
  let ws = TestWorkspace::new().unwrap();
  let porcelain_before = ws.porcelain().unwrap();
  let head_before = ws.local_head().unwrap();

  run_deckhand(&ws.path, &["status"]).unwrap();

  assert_eq!(ws.porcelain().unwrap(), porcelain_before);
  assert_eq!(ws.local_head().unwrap(), head_before);
}
