//! GitHub Actions provider backed by the `gh` CLI
//!
//! Every query shells out to `gh` with a `--json` projection and
//! deserializes the payload. The CLI handles authentication and repository
//! resolution, so none of that leaks into the pipeline.

use super::{CiProvider, CiRun, JobStatus, LatestRelease, ReleaseAssetSet, RunConclusion, RunStatus, RunSummary};
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// CI provider shelling out to the `gh` CLI
pub struct GhCli {
  repo_dir: PathBuf,
}

#[derive(Deserialize)]
struct RunListEntry {
  #[serde(rename = "databaseId")]
  database_id: u64,
  #[serde(rename = "displayTitle")]
  display_title: String,
  #[serde(rename = "headBranch")]
  head_branch: String,
  event: String,
  status: String,
  #[serde(default)]
  conclusion: Option<String>,
}

#[derive(Deserialize)]
struct RunDetail {
  status: String,
  #[serde(default)]
  conclusion: Option<String>,
  jobs: Vec<JobEntry>,
  url: String,
}

#[derive(Deserialize)]
struct JobEntry {
  name: String,
  status: String,
  #[serde(default)]
  conclusion: Option<String>,
}

#[derive(Deserialize)]
struct ReleaseView {
  #[serde(rename = "isDraft")]
  is_draft: bool,
  assets: Vec<AssetEntry>,
  #[serde(rename = "publishedAt")]
  published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct AssetEntry {
  name: String,
}

#[derive(Deserialize)]
struct LatestReleaseView {
  #[serde(rename = "tagName")]
  tag_name: String,
  #[serde(rename = "isDraft")]
  is_draft: bool,
  #[serde(rename = "publishedAt")]
  published_at: Option<DateTime<Utc>>,
}

impl GhCli {
  pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
    Self {
      repo_dir: repo_dir.into(),
    }
  }

  /// Whether the `gh` CLI is installed and on PATH
  pub fn is_available(repo_dir: &Path) -> bool {
    Command::new("gh")
      .current_dir(repo_dir)
      .arg("--version")
      .output()
      .map(|o| o.status.success())
      .unwrap_or(false)
  }

  /// Run a gh command, returning stdout on success
  fn gh(&self, args: &[&str]) -> ReleaseResult<String> {
    let output = Command::new("gh")
      .current_dir(&self.repo_dir)
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute gh {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ReleaseError::message(format!(
        "gh {} failed: {}",
        args.join(" "),
        stderr.trim()
      )));
    }

    Ok(String::from_utf8(output.stdout)?)
  }
}

impl CiProvider for GhCli {
  fn list_runs(&self, workflow: &str, limit: usize) -> ReleaseResult<Vec<RunSummary>> {
    let limit = limit.to_string();
    let stdout = self.gh(&[
      "run",
      "list",
      "--workflow",
      workflow,
      "--limit",
      &limit,
      "--json",
      "databaseId,displayTitle,headBranch,event,status,conclusion",
    ])?;

    let entries: Vec<RunListEntry> = serde_json::from_str(&stdout)?;

    Ok(
      entries
        .into_iter()
        .map(|e| RunSummary {
          id: e.database_id,
          display_title: e.display_title,
          head_branch: e.head_branch,
          event: e.event,
          status: RunStatus::parse(&e.status),
          conclusion: RunConclusion::parse(e.conclusion.as_deref().unwrap_or("")),
        })
        .collect(),
    )
  }

  fn run(&self, id: u64) -> ReleaseResult<CiRun> {
    let id_str = id.to_string();
    let stdout = self.gh(&["run", "view", &id_str, "--json", "status,conclusion,jobs,url"])?;

    let detail: RunDetail = serde_json::from_str(&stdout)?;

    Ok(CiRun {
      id,
      status: RunStatus::parse(&detail.status),
      conclusion: RunConclusion::parse(detail.conclusion.as_deref().unwrap_or("")),
      jobs: detail
        .jobs
        .into_iter()
        .map(|j| JobStatus {
          name: j.name,
          status: j.status,
          conclusion: j.conclusion.filter(|c| !c.is_empty()),
        })
        .collect(),
      url: detail.url,
    })
  }

  fn release_assets(&self, tag: &str) -> ReleaseResult<ReleaseAssetSet> {
    let stdout = self
      .gh(&["release", "view", tag, "--json", "isDraft,assets,publishedAt"])
      .map_err(|e| match e {
        ReleaseError::Message { message, .. } if message.contains("release not found") => ReleaseError::with_help(
          format!("No release published for {}", tag),
          format!("The release workflow may not have published yet. Check `deckhand monitor {}` first.", tag),
        ),
        other => other,
      })?;

    let view: ReleaseView = serde_json::from_str(&stdout)?;

    Ok(ReleaseAssetSet {
      is_draft: view.is_draft,
      asset_names: view.assets.into_iter().map(|a| a.name).collect(),
      published_at: view.published_at,
    })
  }

  fn latest_release(&self) -> ReleaseResult<Option<LatestRelease>> {
    let stdout = match self.gh(&["release", "view", "--json", "tagName,isDraft,publishedAt"]) {
      Ok(stdout) => stdout,
      // No releases yet is not an error for a status report
      Err(ReleaseError::Message { message, .. }) if message.contains("release not found") => return Ok(None),
      Err(e) => return Err(e),
    };

    let view: LatestReleaseView = serde_json::from_str(&stdout)?;

    Ok(Some(LatestRelease {
      tag_name: view.tag_name,
      is_draft: view.is_draft,
      published_at: view.published_at,
    }))
  }
}
