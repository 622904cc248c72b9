//! CI run polling loop
//!
//! Re-fetches a run's status, conclusion, and job list on a fixed interval
//! until the run reports `completed`. Every poll is a full re-read of the
//! provider's state; the loop carries no incremental bookkeeping, which makes
//! an operator interrupt at any poll boundary safe. There is no overall
//! wall-clock bound: a stuck run is surfaced by CI itself, not guessed at
//! from here.

use super::{CiProvider, CiRun, RunConclusion, RunStatus};
use crate::core::error::{CiFailure, ReleaseError, ReleaseResult};
use std::time::{Duration, Instant};

/// Consecutive provider errors tolerated before surfacing
const MAX_TRANSIENT_ERRORS: u32 = 3;

/// Receives each poll result, for rendering
pub trait PollObserver {
  /// A fresh read of the run, with elapsed time since monitoring began
  fn on_poll(&mut self, run: &CiRun, elapsed: Duration);

  /// A provider error that will be retried
  fn on_transient_error(&mut self, error: &ReleaseError, attempt: u32) {
    let _ = (error, attempt);
  }
}

/// Successful terminal state of a monitored run
#[derive(Debug)]
pub struct MonitorOutcome {
  pub run: CiRun,
  pub polls: usize,
  pub elapsed: Duration,
}

/// Polls one CI run to a terminal state
pub struct CiMonitor {
  interval: Duration,
}

impl CiMonitor {
  pub fn new(interval: Duration) -> Self {
    Self { interval }
  }

  /// Poll until the run completes
  ///
  /// Returns the outcome on a `success` conclusion; any other terminal
  /// conclusion is a `CiFailure` pointing at the run's logs.
  pub fn watch(
    &self,
    ci: &dyn CiProvider,
    run_id: u64,
    observer: &mut dyn PollObserver,
  ) -> ReleaseResult<MonitorOutcome> {
    let started = Instant::now();
    let mut polls = 0;
    let mut transient_errors = 0;

    loop {
      let run = match ci.run(run_id) {
        Ok(run) => {
          transient_errors = 0;
          run
        }
        Err(err) => {
          transient_errors += 1;
          if transient_errors >= MAX_TRANSIENT_ERRORS {
            return Err(err);
          }
          observer.on_transient_error(&err, transient_errors);
          std::thread::sleep(self.interval);
          continue;
        }
      };

      polls += 1;
      let elapsed = started.elapsed();
      observer.on_poll(&run, elapsed);

      if run.status == RunStatus::Completed {
        return match run.conclusion.clone() {
          Some(RunConclusion::Success) => Ok(MonitorOutcome { run, polls, elapsed }),
          conclusion => Err(ReleaseError::Ci(CiFailure {
            run_id: run.id,
            conclusion: conclusion.map(|c| c.as_str().to_string()).unwrap_or_else(|| "unknown".to_string()),
            url: run.url,
          })),
        };
      }

      std::thread::sleep(self.interval);
    }
  }
}
