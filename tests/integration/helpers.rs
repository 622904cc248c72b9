//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// An application repository with a local bare `origin`
pub struct TestWorkspace {
  _root: TempDir,
  /// Checkout the release runs against
  pub path: PathBuf,
  /// Bare remote receiving pushes
  pub origin: PathBuf,
}

impl TestWorkspace {
  /// Create a pushed, clean workspace at version 0.1.1
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("app");
    let origin = root.path().join("origin.git");

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&origin)?;

    git(&origin, &["init", "--bare"])?;

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("Cargo.toml"),
      r#"[workspace]
members = []
resolver = "2"

[workspace.package]
version = "0.1.1"
edition = "2021"
license = "MIT"
"#,
    )?;
    std::fs::write(path.join("README.md"), "# Quarterdeck\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial workspace setup"])?;
    git(&path, &["remote", "add", "origin", origin.to_str().unwrap()])?;
    git(&path, &["push", "-u", "origin", "main"])?;
    // Point the bare remote's HEAD at main so fresh clones check out main
    // instead of an unborn default branch (git init --bare defaults to master).
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    Ok(Self {
      _root: root,
      path,
      origin,
    })
  }

  /// Read a file relative to the workspace root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// `git status --porcelain` of the checkout
  pub fn porcelain(&self) -> Result<String> {
    let output = git(&self.path, &["status", "--porcelain"])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Whether a tag exists in the local checkout
  pub fn has_local_tag(&self, tag: &str) -> Result<bool> {
    let output = git(&self.path, &["tag", "--list", tag])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  /// Whether a tag exists on the bare remote
  pub fn has_remote_tag(&self, tag: &str) -> Result<bool> {
    let output = git(&self.origin, &["tag", "--list", tag])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  /// HEAD of the bare remote's main branch
  pub fn remote_head(&self) -> Result<String> {
    let output = git(&self.origin, &["rev-parse", "main"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// HEAD of the local checkout
  pub fn local_head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the deckhand binary, expecting success
pub fn run_deckhand(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = try_run_deckhand(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "deckhand command failed: deckhand {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the deckhand binary without asserting on the exit status
pub fn try_run_deckhand(cwd: &Path, args: &[&str]) -> Result<Output> {
  let deckhand_bin = env!("CARGO_BIN_EXE_deckhand");

  Command::new(deckhand_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run deckhand")
}

/// Run the deckhand binary with the given lines piped to stdin
pub fn try_run_deckhand_with_input(cwd: &Path, args: &[&str], input: &str) -> Result<Output> {
  use std::io::Write;

  let deckhand_bin = env!("CARGO_BIN_EXE_deckhand");

  let mut child = Command::new(deckhand_bin)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to spawn deckhand")?;

  child
    .stdin
    .as_mut()
    .context("Missing stdin handle")?
    .write_all(input.as_bytes())?;

  Ok(child.wait_with_output()?)
}
