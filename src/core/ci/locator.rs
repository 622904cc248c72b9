//! Discovery of the CI run triggered by a tag push
//!
//! CI triggering is asynchronous relative to the push, so the locator polls
//! the run listing on a fixed cadence until a run referencing the tag shows
//! up, bounded to roughly five minutes.

use super::{CiProvider, RunSummary, WORKFLOW_FILE};
use crate::core::error::{DiscoveryError, ReleaseError, ReleaseResult};
use std::time::Duration;

/// How many recent runs to inspect per attempt
const LIST_LIMIT: usize = 30;

/// Cadence and bound of the discovery loop
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryConfig {
  pub interval: Duration,
  pub max_attempts: usize,
}

impl Default for DiscoveryConfig {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(10),
      max_attempts: 30,
    }
  }
}

/// Called once per discovery attempt, for progress display
pub trait DiscoveryObserver {
  fn attempt(&mut self, n: usize, max: usize);
}

/// Find the run triggered for `tag`, polling until the attempt budget runs out
pub fn locate_run(
  ci: &dyn CiProvider,
  tag: &str,
  config: DiscoveryConfig,
  observer: &mut dyn DiscoveryObserver,
) -> ReleaseResult<RunSummary> {
  for attempt in 1..=config.max_attempts {
    observer.attempt(attempt, config.max_attempts);

    let runs = ci.list_runs(WORKFLOW_FILE, LIST_LIMIT)?;
    if let Some(run) = runs.into_iter().find(|r| r.references_tag(tag)) {
      return Ok(run);
    }

    if attempt < config.max_attempts {
      std::thread::sleep(config.interval);
    }
  }

  Err(ReleaseError::Discovery(DiscoveryError {
    tag: tag.to_string(),
    attempts: config.max_attempts,
    waited_secs: config.interval.as_secs() * config.max_attempts as u64,
  }))
}
