//! Watch the CI run for a release tag
//!
//! Entry point for re-attaching to a release whose CI run was still pending
//! (or was never watched) — the recovery path when discovery timed out or
//! the operator released with `--no-monitor`.

use crate::commands::{check, Workspace};
use crate::core::ci::locator::{locate_run, DiscoveryConfig};
use crate::core::ci::monitor::CiMonitor;
use crate::core::ci::GhCli;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::version::release_tag;
use crate::ui::progress::DiscoveryProgress;
use crate::ui::{format_elapsed, ConsolePoll};
use std::time::Duration;

/// How often the poll loop re-reads the run
const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Run the monitor command; the tag defaults to the manifest version
pub fn run_monitor(tag: Option<String>) -> ReleaseResult<()> {
  let workspace = Workspace::open()?;

  let tag = match tag {
    Some(tag) => tag,
    None => release_tag(&workspace.store.read()?),
  };

  watch_and_verify(&workspace, &tag)
}

/// Locate the tag's CI run, poll it to completion, then verify artifacts
pub(crate) fn watch_and_verify(workspace: &Workspace, tag: &str) -> ReleaseResult<()> {
  if !GhCli::is_available(&workspace.root) {
    return Err(ReleaseError::with_help(
      "The gh CLI is not available",
      "Install GitHub CLI (https://cli.github.com) and authenticate with `gh auth login`.",
    ));
  }

  let ci = GhCli::new(&workspace.root);

  println!("🔭 Looking for the CI run for {}...", tag);
  let mut progress = DiscoveryProgress::new();
  let run = locate_run(&ci, tag, DiscoveryConfig::default(), &mut progress)?;
  println!("   🎯 Found run {} ({}, {} event)", run.id, run.display_title, run.event);
  println!();

  let monitor = CiMonitor::new(POLL_INTERVAL);
  let mut observer = ConsolePoll::new(tag);
  let outcome = monitor.watch(&ci, run.id, &mut observer)?;

  println!();
  println!(
    "🎉 CI succeeded for {} after {} ({} polls)",
    tag,
    format_elapsed(outcome.elapsed),
    outcome.polls
  );
  println!("   {}", outcome.run.url);
  println!();

  check::verify_and_report(workspace, tag)
}
