//! CI provider abstraction
//!
//! The pipeline observes GitHub Actions through the narrow `CiProvider`
//! trait: list recent runs of the release workflow, re-read one run's
//! status/conclusion/jobs, and fetch a published release's asset list.
//! Everything is a fresh read of authoritative remote state; nothing is
//! cached between polls.

pub mod gh;
pub mod locator;
pub mod monitor;

pub use gh::GhCli;

use crate::core::error::ReleaseResult;
use chrono::{DateTime, Utc};

/// Workflow file whose runs this pipeline watches
pub const WORKFLOW_FILE: &str = "release.yml";

/// Lifecycle state of a CI run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
  Queued,
  InProgress,
  Completed,
}

impl RunStatus {
  /// Map a provider status string; anything non-terminal counts as in-flight
  pub fn parse(raw: &str) -> Self {
    match raw {
      "queued" | "waiting" | "requested" | "pending" => RunStatus::Queued,
      "completed" => RunStatus::Completed,
      _ => RunStatus::InProgress,
    }
  }
}

/// Terminal conclusion of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunConclusion {
  Success,
  Failure,
  Cancelled,
  Other(String),
}

impl RunConclusion {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "" => None,
      "success" => Some(RunConclusion::Success),
      "failure" => Some(RunConclusion::Failure),
      "cancelled" => Some(RunConclusion::Cancelled),
      other => Some(RunConclusion::Other(other.to_string())),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      RunConclusion::Success => "success",
      RunConclusion::Failure => "failure",
      RunConclusion::Cancelled => "cancelled",
      RunConclusion::Other(s) => s,
    }
  }
}

/// One entry from the workflow run listing
#[derive(Debug, Clone)]
pub struct RunSummary {
  pub id: u64,
  pub display_title: String,
  pub head_branch: String,
  pub event: String,
  pub status: RunStatus,
  pub conclusion: Option<RunConclusion>,
}

impl RunSummary {
  /// Whether this run was triggered for the given release tag
  pub fn references_tag(&self, tag: &str) -> bool {
    self.head_branch == tag || self.display_title.contains(tag)
  }
}

/// Per-job state within a run, carried verbatim for rendering
#[derive(Debug, Clone)]
pub struct JobStatus {
  pub name: String,
  pub status: String,
  pub conclusion: Option<String>,
}

/// Full state of one CI run, re-fetched on every poll
#[derive(Debug, Clone)]
pub struct CiRun {
  pub id: u64,
  pub status: RunStatus,
  pub conclusion: Option<RunConclusion>,
  pub jobs: Vec<JobStatus>,
  pub url: String,
}

/// Assets attached to a published release
#[derive(Debug, Clone)]
pub struct ReleaseAssetSet {
  pub is_draft: bool,
  pub asset_names: Vec<String>,
  pub published_at: Option<DateTime<Utc>>,
}

/// Metadata of the most recent published release
#[derive(Debug, Clone)]
pub struct LatestRelease {
  pub tag_name: String,
  pub is_draft: bool,
  pub published_at: Option<DateTime<Utc>>,
}

/// The CI operations the release pipeline needs, and nothing more
pub trait CiProvider {
  /// Recent runs of a workflow, newest first
  fn list_runs(&self, workflow: &str, limit: usize) -> ReleaseResult<Vec<RunSummary>>;

  /// Fresh status/conclusion/jobs for one run
  fn run(&self, id: u64) -> ReleaseResult<CiRun>;

  /// Asset list of the release published for a tag
  fn release_assets(&self, tag: &str) -> ReleaseResult<ReleaseAssetSet>;

  /// The most recent release, if any exists yet
  fn latest_release(&self) -> ReleaseResult<Option<LatestRelease>>;
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_parsing_maps_in_flight_states() {
    assert_eq!(RunStatus::parse("queued"), RunStatus::Queued);
    assert_eq!(RunStatus::parse("waiting"), RunStatus::Queued);
    assert_eq!(RunStatus::parse("in_progress"), RunStatus::InProgress);
    assert_eq!(RunStatus::parse("completed"), RunStatus::Completed);
  }

  #[test]
  fn conclusion_parsing_treats_empty_as_none() {
    assert_eq!(RunConclusion::parse(""), None);
    assert_eq!(RunConclusion::parse("success"), Some(RunConclusion::Success));
    assert_eq!(
      RunConclusion::parse("timed_out"),
      Some(RunConclusion::Other("timed_out".to_string()))
    );
  }

  #[test]
  fn run_summary_matches_tag_in_title_or_branch() {
    let run = RunSummary {
      id: 1,
      display_title: "Release v0.1.2".to_string(),
      head_branch: "main".to_string(),
      event: "push".to_string(),
      status: RunStatus::Queued,
      conclusion: None,
    };
    assert!(run.references_tag("v0.1.2"));
    assert!(!run.references_tag("v0.1.3"));

    let tag_run = RunSummary {
      head_branch: "v0.1.3".to_string(),
      display_title: "build".to_string(),
      ..run
    };
    assert!(tag_run.references_tag("v0.1.3"));
  }
}
