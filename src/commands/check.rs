//! Verify the published artifacts of a release

use crate::commands::Workspace;
use crate::core::artifacts::{verification_error, verify_release, HttpProber, EXPECTED_ASSETS};
use crate::core::ci::GhCli;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::version::release_tag;

/// Run the check command; the tag defaults to the manifest version
pub fn run_check(tag: Option<String>) -> ReleaseResult<()> {
  let workspace = Workspace::open()?;

  let tag = match tag {
    Some(tag) => tag,
    None => release_tag(&workspace.store.read()?),
  };

  verify_and_report(&workspace, &tag)
}

/// Verify a release and print the actionable diff
pub(crate) fn verify_and_report(workspace: &Workspace, tag: &str) -> ReleaseResult<()> {
  if !GhCli::is_available(&workspace.root) {
    return Err(ReleaseError::with_help(
      "The gh CLI is not available",
      "Install GitHub CLI (https://cli.github.com) and authenticate with `gh auth login`.",
    ));
  }

  let ci = GhCli::new(&workspace.root);
  let prober = HttpProber::new()?;

  println!("📦 Verifying release artifacts for {}...", tag);
  let result = verify_release(&ci, &prober, tag)?;

  if let Some(published) = result.published_at {
    println!("   Published {}", published.format("%Y-%m-%d %H:%M UTC"));
  }
  println!("   Found {}/{} expected artifacts", result.found, EXPECTED_ASSETS.len());
  for name in &result.missing {
    println!("   ❌ missing: {}", name);
  }
  for name in &result.extra {
    println!("   ℹ️  unexpected: {}", name);
  }
  for probe in &result.probes {
    match probe.status {
      Some(200) => println!("   ✅ reachable: {}", probe.url),
      Some(code) => println!("   ❌ HTTP {}: {}", code, probe.url),
      None => println!("   ❌ unreachable: {}", probe.url),
    }
  }
  if result.is_draft {
    println!("   ⚠️  The release is still marked as a draft");
  }

  if result.overall_ok() {
    println!();
    println!("✅ Release {} verified", tag);
    Ok(())
  } else {
    Err(verification_error(&result))
  }
}
