//! System git backend
//!
//! Shells out to the git binary for every operation. Subprocess calls run
//! with an isolated environment (PATH/HOME only) and explicit config
//! overrides so user configuration cannot change behavior under us.

use super::VersionControl;
use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository, verifying the path is inside a working tree
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::message(format!(
        "Failed to open git repository: {}",
        stderr
      )));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run a git command, expecting success
  fn run(&self, args: &[&str]) -> ReleaseResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

/// Extract the path from one `git status --porcelain` line
///
/// Rename entries ("R  old -> new") report the new path.
fn porcelain_path(line: &str) -> Option<&str> {
  if line.len() < 4 {
    return None;
  }
  let path = &line[3..];
  Some(path.rsplit_once(" -> ").map(|(_, new)| new).unwrap_or(path))
}

impl VersionControl for SystemGit {
  fn current_branch(&self) -> ReleaseResult<String> {
    let output = self.git_cmd().args(["rev-parse", "--abbrev-ref", "HEAD"]).output()?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn head_commit(&self) -> ReleaseResult<String> {
    Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
  }

  fn changed_tracked_files(&self) -> ReleaseResult<Vec<String>> {
    let stdout = self.run(&["status", "--porcelain=v1"])?;

    let files = stdout
      .lines()
      .filter(|line| !line.starts_with("??"))
      // worktree column set means the file differs from the index
      .filter(|line| line.as_bytes().get(1).is_some_and(|&c| c != b' '))
      .filter_map(porcelain_path)
      .map(str::to_string)
      .collect();

    Ok(files)
  }

  fn staged_files(&self) -> ReleaseResult<Vec<String>> {
    let stdout = self.run(&["diff", "--cached", "--name-only"])?;
    Ok(stdout.lines().map(str::to_string).collect())
  }

  fn local_tag_exists(&self, tag: &str) -> ReleaseResult<bool> {
    let stdout = self.run(&["tag", "--list", tag])?;
    Ok(!stdout.trim().is_empty())
  }

  fn remote_ref_exists(&self, remote: &str, refspec: &str) -> ReleaseResult<bool> {
    let stdout = self.run(&["ls-remote", remote, refspec])?;
    Ok(!stdout.trim().is_empty())
  }

  fn fetch(&self, remote: &str) -> ReleaseResult<()> {
    self.run(&["fetch", remote])?;
    Ok(())
  }

  fn is_ancestor(&self, ancestor: &str, descendant: &str) -> ReleaseResult<bool> {
    let output = self
      .git_cmd()
      .args(["merge-base", "--is-ancestor", ancestor, descendant])
      .output()
      .context("Failed to execute git merge-base")?;

    Ok(output.status.success())
  }

  fn stage(&self, paths: &[&str]) -> ReleaseResult<()> {
    let mut args = vec!["add", "--"];
    args.extend_from_slice(paths);
    self.run(&args)?;
    Ok(())
  }

  fn commit(&self, message: &str) -> ReleaseResult<String> {
    self.run(&["commit", "-m", message])?;
    self.head_commit()
  }

  fn create_tag(&self, tag: &str, message: &str) -> ReleaseResult<()> {
    self.run(&["tag", "-a", tag, "-m", message])?;
    Ok(())
  }

  fn push_branch(&self, remote: &str, branch: &str) -> ReleaseResult<()> {
    self.run(&["push", remote, branch])?;
    Ok(())
  }

  fn push_tag(&self, remote: &str, tag: &str) -> ReleaseResult<()> {
    self.run(&["push", remote, &format!("refs/tags/{}", tag)])?;
    Ok(())
  }

  fn latest_tag(&self, pattern: &str) -> ReleaseResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["describe", "--tags", "--abbrev=0", "--match", pattern])
      .output()
      .context("Failed to execute git describe")?;

    if !output.status.success() {
      // No tag reachable from HEAD
      return Ok(None);
    }

    let tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if tag.is_empty() { None } else { Some(tag) })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn init_repo() -> (TempDir, SystemGit) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    for args in [
      vec!["init", "--initial-branch=main"],
      vec!["config", "user.name", "Test User"],
      vec!["config", "user.email", "test@example.com"],
    ] {
      Command::new("git").current_dir(&path).args(&args).output().unwrap();
    }

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    Command::new("git").current_dir(&path).args(["add", "."]).output().unwrap();
    Command::new("git")
      .current_dir(&path)
      .args(["commit", "-m", "initial"])
      .output()
      .unwrap();

    let git = SystemGit::open(&path).unwrap();
    (dir, git)
  }

  #[test]
  fn open_fails_outside_a_repo() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
      SystemGit::open(dir.path()),
      Err(ReleaseError::Git(GitError::RepoNotFound { .. }))
    ));
  }

  #[test]
  fn reports_branch_and_head() {
    let (_dir, git) = init_repo();
    assert_eq!(git.current_branch().unwrap(), "main");
    assert_eq!(git.head_commit().unwrap().len(), 40);
  }

  #[test]
  fn clean_tree_has_no_changes() {
    let (_dir, git) = init_repo();
    assert!(git.changed_tracked_files().unwrap().is_empty());
    assert!(git.staged_files().unwrap().is_empty());
  }

  #[test]
  fn modified_tracked_file_is_reported_untracked_is_not() {
    let (dir, git) = init_repo();
    std::fs::write(dir.path().join("README.md"), "# Changed\n").unwrap();
    std::fs::write(dir.path().join("scratch.txt"), "notes\n").unwrap();

    let changed = git.changed_tracked_files().unwrap();
    assert_eq!(changed, vec!["README.md".to_string()]);
  }

  #[test]
  fn staged_files_are_separate_from_worktree_changes() {
    let (dir, git) = init_repo();
    std::fs::write(dir.path().join("new.txt"), "content\n").unwrap();
    git.stage(&["new.txt"]).unwrap();

    assert_eq!(git.staged_files().unwrap(), vec!["new.txt".to_string()]);
    assert!(git.changed_tracked_files().unwrap().is_empty());
  }

  #[test]
  fn commit_and_tag_roundtrip() {
    let (dir, git) = init_repo();
    std::fs::write(dir.path().join("file.txt"), "x\n").unwrap();
    git.stage(&["file.txt"]).unwrap();

    let sha = git.commit("add file").unwrap();
    assert_eq!(sha, git.head_commit().unwrap());

    git.create_tag("v0.1.0", "Release v0.1.0").unwrap();
    assert!(git.local_tag_exists("v0.1.0").unwrap());
    assert!(!git.local_tag_exists("v9.9.9").unwrap());
    assert_eq!(git.latest_tag("v*").unwrap(), Some("v0.1.0".to_string()));
  }

  #[test]
  fn latest_tag_is_none_without_tags() {
    let (_dir, git) = init_repo();
    assert_eq!(git.latest_tag("v*").unwrap(), None);
  }

  #[test]
  fn push_and_remote_refs_with_bare_remote() {
    let (dir, git) = init_repo();

    let remote_dir = TempDir::new().unwrap();
    Command::new("git")
      .current_dir(remote_dir.path())
      .args(["init", "--bare"])
      .output()
      .unwrap();
    Command::new("git")
      .current_dir(dir.path())
      .args(["remote", "add", "origin", remote_dir.path().to_str().unwrap()])
      .output()
      .unwrap();

    git.push_branch("origin", "main").unwrap();
    assert!(git.remote_ref_exists("origin", "refs/heads/main").unwrap());
    assert!(!git.remote_ref_exists("origin", "refs/tags/v0.1.0").unwrap());

    git.create_tag("v0.1.0", "Release v0.1.0").unwrap();
    git.push_tag("origin", "v0.1.0").unwrap();
    assert!(git.remote_ref_exists("origin", "refs/tags/v0.1.0").unwrap());

    git.fetch("origin").unwrap();
    assert!(git.is_ancestor("origin/main", "HEAD").unwrap());
  }

  #[test]
  fn porcelain_path_handles_renames() {
    assert_eq!(porcelain_path(" M src/main.rs"), Some("src/main.rs"));
    assert_eq!(porcelain_path("R  old.rs -> new.rs"), Some("new.rs"));
    assert_eq!(porcelain_path(""), None);
  }
}
