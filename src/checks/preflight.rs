//! Repository invariants checked before any mutation
//!
//! Sequential, fail-fast: the first violated invariant aborts the release
//! with a specific error and remedial hint. This stage is purely
//! observational apart from a `git fetch`, which only updates remote
//! tracking refs.
//!
//! A branch mismatch is the one soft finding: it is returned in the report
//! for the caller to resolve interactively rather than failing outright.

use crate::core::error::{PreconditionError, ReleaseError, ReleaseResult};
use crate::core::vcs::VersionControl;
use crate::core::version::{LOCKFILE, MANIFEST_FILE};

/// Branch releases are normally cut from
pub const RELEASE_BRANCH: &str = "main";

/// Remote that receives the release
pub const RELEASE_REMOTE: &str = "origin";

/// Soft finding: the release is being cut from an unexpected branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchMismatch {
  pub current: String,
  pub expected: String,
}

/// What preflight observed on the way to a green light
#[derive(Debug)]
pub struct PreflightReport {
  pub branch: String,
  pub branch_mismatch: Option<BranchMismatch>,
}

/// Runs the pre-release invariant checks
pub struct Preflight<'a> {
  vcs: &'a dyn VersionControl,
  remote: &'a str,
}

impl<'a> Preflight<'a> {
  pub fn new(vcs: &'a dyn VersionControl) -> Self {
    Self {
      vcs,
      remote: RELEASE_REMOTE,
    }
  }

  /// Check every invariant for releasing `tag`, in order, failing fast
  pub fn run(&self, tag: &str) -> ReleaseResult<PreflightReport> {
    // Tracked changes outside the manifest and lockfile block the release;
    // the version bump itself will dirty those two.
    let dirty: Vec<String> = self
      .vcs
      .changed_tracked_files()?
      .into_iter()
      .filter(|path| path != MANIFEST_FILE && path != LOCKFILE)
      .collect();
    if !dirty.is_empty() {
      return Err(ReleaseError::Precondition(PreconditionError::DirtyWorkingTree {
        files: dirty,
      }));
    }

    let staged = self.vcs.staged_files()?;
    if !staged.is_empty() {
      return Err(ReleaseError::Precondition(PreconditionError::StagedChanges {
        files: staged,
      }));
    }

    if self.vcs.local_tag_exists(tag)? {
      return Err(ReleaseError::Precondition(PreconditionError::LocalTagExists {
        tag: tag.to_string(),
      }));
    }

    // Always a live query against the remote, never a cached ref
    if self.vcs.remote_ref_exists(self.remote, &format!("refs/tags/{}", tag))? {
      return Err(ReleaseError::Precondition(PreconditionError::RemoteTagExists {
        tag: tag.to_string(),
        remote: self.remote.to_string(),
      }));
    }

    let branch = self.vcs.current_branch()?;
    let branch_mismatch = (branch != RELEASE_BRANCH).then(|| BranchMismatch {
      current: branch.clone(),
      expected: RELEASE_BRANCH.to_string(),
    });

    // A remote branch we cannot fast-forward onto means the push would be
    // rejected; a local branch that is simply ahead is fine.
    if self
      .vcs
      .remote_ref_exists(self.remote, &format!("refs/heads/{}", branch))?
    {
      self.vcs.fetch(self.remote)?;
      let remote_ref = format!("{}/{}", self.remote, branch);
      if !self.vcs.is_ancestor(&remote_ref, "HEAD")? {
        return Err(ReleaseError::Precondition(PreconditionError::RemoteDiverged {
          branch,
          remote: self.remote.to_string(),
        }));
      }
    }

    Ok(PreflightReport {
      branch,
      branch_mismatch,
    })
  }
}
