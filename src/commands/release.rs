//! The release command
//!
//! Orchestrates the whole operation: preflight → version bump → confirm →
//! commit/tag/push → CI discovery → polling → artifact verification. Each
//! stage gates the next; a failure before the transaction leaves the
//! repository untouched, and declining the final confirmation restores the
//! manifest from its pre-bump snapshot.

use crate::checks::preflight::{Preflight, RELEASE_REMOTE};
use crate::commands::monitor;
use crate::commands::Workspace;
use crate::core::error::ReleaseResult;
use crate::core::prompt::{AssumeDefaults, ConsolePrompter, Prompter};
use crate::core::transaction::ReleaseTransaction;
use crate::core::version::{bump, release_tag, BumpKind, LOCKFILE, MANIFEST_FILE};

/// Flags of the release command
pub struct ReleaseOptions {
  pub bump: BumpKind,
  /// Answer every confirmation with its default
  pub assume_yes: bool,
  /// Stop after the push; skip CI monitoring and verification
  pub no_monitor: bool,
  /// Commit message override
  pub message: Option<String>,
}

/// Run the release pipeline
pub fn run_release(options: &ReleaseOptions) -> ReleaseResult<()> {
  let workspace = Workspace::open()?;

  let current = workspace.store.read()?;
  let next = bump(&current, options.bump);
  let tag = release_tag(&next);

  println!("🚀 Releasing Quarterdeck {} → {}", current, next);
  println!();

  let mut prompter: Box<dyn Prompter> = if options.assume_yes {
    Box::new(AssumeDefaults)
  } else {
    Box::new(ConsolePrompter)
  };

  // Preflight: purely observational, so aborting here has zero side effects
  println!("🔎 Running preflight checks...");
  let report = Preflight::new(&workspace.git).run(&tag)?;

  if let Some(mismatch) = &report.branch_mismatch {
    let proceed = prompter.confirm(
      &format!(
        "Releasing from '{}' instead of '{}'. Continue?",
        mismatch.current, mismatch.expected
      ),
      true,
    )?;
    if !proceed {
      println!("Aborted.");
      return Ok(());
    }
  }
  println!("   ✅ Preflight passed on '{}'", report.branch);

  // Bump the manifest, keeping a snapshot so a declined go/no-go can
  // restore the working tree byte-for-byte
  let snapshot = workspace.store.snapshot()?;
  workspace.store.write(&next)?;
  println!("   📝 {} version set to {}", MANIFEST_FILE, next);

  let default_message = format!("Release {}", tag);
  let message = match &options.message {
    Some(message) => message.clone(),
    None => prompter.prompt_line("Commit message", &default_message)?,
  };

  let go = prompter.confirm(&format!("Commit, tag {} and push to {}?", tag, RELEASE_REMOTE), true)?;
  if !go {
    workspace.store.restore(&snapshot)?;
    println!("Aborted; manifest restored.");
    return Ok(());
  }

  // The one mutating sequence of the pipeline
  let mut paths = vec![MANIFEST_FILE];
  if workspace.root.join(LOCKFILE).exists() {
    paths.push(LOCKFILE);
  }

  let transaction = ReleaseTransaction::new(&workspace.git, RELEASE_REMOTE, &report.branch);
  let receipt = transaction.execute(&paths, &tag, &message)?;

  let sha = &receipt.commit_sha;
  let short_sha = if sha.len() > 7 { &sha[..7] } else { sha };
  println!("   🏷️  Tagged {} at {}", receipt.tag, short_sha);
  println!("   📤 Pushed {} and {} to {}", report.branch, receipt.tag, RELEASE_REMOTE);
  println!();

  if options.no_monitor {
    println!("💡 CI monitoring skipped. Watch it later with `deckhand monitor {}`", tag);
    return Ok(());
  }

  monitor::watch_and_verify(&workspace, &tag)
}
