//! Console rendering for the release pipeline
//!
//! All progress and status output goes through the observer traits defined
//! next to the polling loops; the implementations here render to the
//! terminal. Core logic never formats its own output.

pub mod progress;

use crate::core::ci::monitor::PollObserver;
use crate::core::ci::{CiRun, JobStatus, RunStatus};
use crate::core::error::ReleaseError;
use std::time::Duration;

/// Icon for a job line; a terminal conclusion wins over in-flight status
pub fn job_icon(job: &JobStatus) -> &'static str {
  match job.conclusion.as_deref() {
    Some("success") => "✅",
    Some("failure") => "❌",
    Some("cancelled") => "🚫",
    Some("skipped") => "⏭️",
    _ => match job.status.as_str() {
      "in_progress" => "🔄",
      "queued" | "waiting" | "pending" => "⏳",
      _ => "•",
    },
  }
}

/// Render a duration as m:ss
pub fn format_elapsed(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();
  format!("{}:{:02}", secs / 60, secs % 60)
}

/// Prints one block per poll with run state and per-job lines
pub struct ConsolePoll {
  tag: String,
}

impl ConsolePoll {
  pub fn new(tag: impl Into<String>) -> Self {
    Self { tag: tag.into() }
  }
}

impl PollObserver for ConsolePoll {
  fn on_poll(&mut self, run: &CiRun, elapsed: Duration) {
    let state = match run.status {
      RunStatus::Queued => "queued",
      RunStatus::InProgress => "in progress",
      RunStatus::Completed => "completed",
    };

    println!("⏱️  [{}] {} — {}", format_elapsed(elapsed), self.tag, state);
    for job in &run.jobs {
      println!("   {} {}", job_icon(job), job.name);
    }
  }

  fn on_transient_error(&mut self, error: &ReleaseError, attempt: u32) {
    eprintln!("   ⚠️  CI API error (attempt {}): {}", attempt, error);
  }
}
