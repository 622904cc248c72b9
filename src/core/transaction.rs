//! The commit/tag/push sequence
//!
//! Ordered so a pushed tag always points at a commit already reachable on
//! the remote: stage manifest → commit → tag → push branch → push tag.
//! A failure after the commit leaves the repository locally advanced; the
//! error reports exactly which step completed last so the operator can
//! reconcile by hand. Nothing is retried silently.

use crate::core::error::{ReleaseError, ReleaseResult, TransactionError, TxStep};
use crate::core::vcs::VersionControl;

/// What a completed transaction produced
#[derive(Debug)]
pub struct TxReceipt {
  pub commit_sha: String,
  pub tag: String,
}

/// Performs the commit → tag → push sequence for one release
pub struct ReleaseTransaction<'a> {
  vcs: &'a dyn VersionControl,
  remote: String,
  branch: String,
}

impl<'a> ReleaseTransaction<'a> {
  pub fn new(vcs: &'a dyn VersionControl, remote: impl Into<String>, branch: impl Into<String>) -> Self {
    Self {
      vcs,
      remote: remote.into(),
      branch: branch.into(),
    }
  }

  /// Run the full sequence, staging `paths` for the release commit
  pub fn execute(&self, paths: &[&str], tag: &str, message: &str) -> ReleaseResult<TxReceipt> {
    let mut completed: Option<TxStep> = None;

    let fail = |completed: Option<TxStep>, failed: TxStep, err: ReleaseError| {
      ReleaseError::Transaction(TransactionError {
        completed,
        failed,
        tag: tag.to_string(),
        reason: err.to_string(),
      })
    };

    self
      .vcs
      .stage(paths)
      .map_err(|e| fail(completed, TxStep::Stage, e))?;
    completed = Some(TxStep::Stage);

    let commit_sha = self
      .vcs
      .commit(message)
      .map_err(|e| fail(completed, TxStep::Commit, e))?;
    completed = Some(TxStep::Commit);

    self
      .vcs
      .create_tag(tag, message)
      .map_err(|e| fail(completed, TxStep::Tag, e))?;
    completed = Some(TxStep::Tag);

    self
      .vcs
      .push_branch(&self.remote, &self.branch)
      .map_err(|e| fail(completed, TxStep::PushBranch, e))?;
    completed = Some(TxStep::PushBranch);

    self
      .vcs
      .push_tag(&self.remote, tag)
      .map_err(|e| fail(completed, TxStep::PushTag, e))?;

    Ok(TxReceipt {
      commit_sha,
      tag: tag.to_string(),
    })
  }
}
