//! Git operations abstraction
//!
//! The release pipeline talks to version control through the narrow
//! `VersionControl` trait so the orchestration and checks can run against an
//! in-memory fake in tests. The real backend shells out to system git.

pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;

/// The version-control operations the release pipeline needs, and nothing more
pub trait VersionControl {
  /// Current branch name ("HEAD" when detached)
  fn current_branch(&self) -> ReleaseResult<String>;

  /// Current HEAD commit SHA
  fn head_commit(&self) -> ReleaseResult<String>;

  /// Tracked files with worktree modifications (staged-only changes excluded)
  fn changed_tracked_files(&self) -> ReleaseResult<Vec<String>>;

  /// Files currently staged in the index
  fn staged_files(&self) -> ReleaseResult<Vec<String>>;

  /// Whether a tag exists locally
  fn local_tag_exists(&self, tag: &str) -> ReleaseResult<bool>;

  /// Whether a ref exists on the remote (live query, never cached)
  fn remote_ref_exists(&self, remote: &str, refspec: &str) -> ReleaseResult<bool>;

  /// Fetch from the remote
  fn fetch(&self, remote: &str) -> ReleaseResult<()>;

  /// Whether `ancestor` is an ancestor of `descendant`
  fn is_ancestor(&self, ancestor: &str, descendant: &str) -> ReleaseResult<bool>;

  /// Stage the given paths
  fn stage(&self, paths: &[&str]) -> ReleaseResult<()>;

  /// Commit the index, returning the new commit SHA
  fn commit(&self, message: &str) -> ReleaseResult<String>;

  /// Create an annotated tag at HEAD
  fn create_tag(&self, tag: &str, message: &str) -> ReleaseResult<()>;

  /// Push a branch to the remote
  fn push_branch(&self, remote: &str, branch: &str) -> ReleaseResult<()>;

  /// Push a tag to the remote
  fn push_tag(&self, remote: &str, tag: &str) -> ReleaseResult<()>;

  /// Nearest tag matching a pattern, if any (describe)
  fn latest_tag(&self, pattern: &str) -> ReleaseResult<Option<String>>;
}
