//! Read-only release status
//!
//! Aggregates the manifest version, nearest release tag, branch, and — when
//! the gh CLI is available — the latest published release and most recent
//! workflow run. Mutates nothing; safe to run at any time, including while a
//! release is in flight elsewhere.

use crate::commands::Workspace;
use crate::core::ci::{CiProvider, GhCli, RunStatus, WORKFLOW_FILE};
use crate::core::error::ReleaseResult;
use crate::core::vcs::VersionControl;
use crate::core::version::release_tag;
use serde::Serialize;

/// Full status snapshot
#[derive(Debug, Serialize)]
pub struct StatusReport {
  pub version: String,
  pub latest_tag: Option<String>,
  pub branch: String,
  pub head: String,
  /// Manifest version that has no tag yet
  pub untagged_version: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ci: Option<CiStatus>,
}

/// The CI/release half of the report, present when gh is available
#[derive(Debug, Serialize)]
pub struct CiStatus {
  pub latest_release: Option<ReleaseStatus>,
  pub latest_run: Option<RunReport>,
}

#[derive(Debug, Serialize)]
pub struct ReleaseStatus {
  pub tag: String,
  pub draft: bool,
  pub published_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
  pub title: String,
  pub status: String,
  pub conclusion: Option<String>,
}

/// Run the status command
pub fn run_status(json: bool) -> ReleaseResult<()> {
  let workspace = Workspace::open()?;
  let report = gather(&workspace)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn gather(workspace: &Workspace) -> ReleaseResult<StatusReport> {
  let version = workspace.store.read()?;
  let latest_tag = workspace.git.latest_tag("v*")?;
  let branch = workspace.git.current_branch()?;
  let head = workspace.git.head_commit()?;
  let short_head = if head.len() > 7 { head[..7].to_string() } else { head };

  let untagged_version = latest_tag.as_deref() != Some(release_tag(&version).as_str());

  // Degrade to a git-only report when gh is missing or cannot see a
  // repository (status must stay safe to run anywhere, any time)
  let ci = if GhCli::is_available(&workspace.root) {
    let provider = GhCli::new(&workspace.root);
    gather_ci(&provider).ok()
  } else {
    None
  };

  Ok(StatusReport {
    version: version.to_string(),
    latest_tag,
    branch,
    head: short_head,
    untagged_version,
    ci,
  })
}

fn gather_ci(provider: &dyn CiProvider) -> ReleaseResult<CiStatus> {
  let latest_release = provider.latest_release()?.map(|release| ReleaseStatus {
    tag: release.tag_name,
    draft: release.is_draft,
    published_at: release.published_at.map(|t| t.format("%Y-%m-%d").to_string()),
  });

  let latest_run = provider.list_runs(WORKFLOW_FILE, 1)?.into_iter().next().map(|run| RunReport {
    title: run.display_title,
    status: match run.status {
      RunStatus::Queued => "queued",
      RunStatus::InProgress => "in_progress",
      RunStatus::Completed => "completed",
    }
    .to_string(),
    conclusion: run.conclusion.map(|c| c.as_str().to_string()),
  });

  Ok(CiStatus {
    latest_release,
    latest_run,
  })
}

fn print_report(report: &StatusReport) {
  println!("\n📦 Quarterdeck release status\n");
  println!("   Version:     {}", report.version);
  println!(
    "   Latest tag:  {}",
    report.latest_tag.as_deref().unwrap_or("(none)")
  );
  println!("   Branch:      {}", report.branch);
  println!("   HEAD:        {}", report.head);

  if report.untagged_version {
    println!("   ⚠️  Version {} has no tag yet", report.version);
  }

  match &report.ci {
    None => println!("\n   (gh CLI not available; release and CI state skipped)"),
    Some(ci) => {
      match &ci.latest_release {
        Some(release) => {
          let draft = if release.draft { " (draft)" } else { "" };
          let date = release
            .published_at
            .as_deref()
            .map(|d| format!(", published {}", d))
            .unwrap_or_default();
          println!("\n   Latest release: {}{}{}", release.tag, draft, date);
        }
        None => println!("\n   Latest release: (none)"),
      }

      match &ci.latest_run {
        Some(run) => {
          let conclusion = run
            .conclusion
            .as_deref()
            .map(|c| format!(" / {}", c))
            .unwrap_or_default();
          println!("   Last CI run:    {}{} — {}", run.status, conclusion, run.title);
        }
        None => println!("   Last CI run:    (none)"),
      }
    }
  }

  println!();
}
