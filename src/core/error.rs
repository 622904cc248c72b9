//! Error types for deckhand with contextual messages and remediation hints
//!
//! Every fatal error names the check or step that failed and, where possible,
//! carries a help message pointing at the corrective command. The release
//! pipeline distinguishes errors that happened before any mutation
//! (preconditions), errors that left the repository partially advanced
//! (transaction), and errors from the CI/verification tail.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for deckhand
#[derive(Debug)]
pub enum ReleaseError {
  /// Preflight check failed; nothing was mutated
  Precondition(PreconditionError),

  /// The commit/tag/push sequence failed partway through
  Transaction(TransactionError),

  /// The CI run triggered by the tag push could not be found in time
  Discovery(DiscoveryError),

  /// The CI run completed with a non-success conclusion
  Ci(CiFailure),

  /// Published release is missing artifacts or failed reachability probes
  Verification(VerificationFailure),

  /// Manifest version field is absent or not a plain X.Y.Z triple
  InvalidVersion { manifest: PathBuf, found: Option<String> },

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    match self {
      ReleaseError::Message { message, help } => ReleaseError::Message {
        message: format!("{}: {}", ctx.into(), message),
        help,
      },
      ReleaseError::Io(e) => ReleaseError::Message {
        message: format!("{}: {}", ctx.into(), e),
        help: None,
      },
      other => other,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Precondition(e) => e.help_message(),
      ReleaseError::Transaction(e) => Some(e.help_message()),
      ReleaseError::Discovery(e) => Some(e.help_message()),
      ReleaseError::Ci(e) => Some(e.help_message()),
      ReleaseError::Verification(_) => {
        Some("Re-run the release workflow for the tag, then `deckhand check <tag>` again.".to_string())
      }
      ReleaseError::InvalidVersion { .. } => {
        Some("The manifest must carry a plain `version = \"X.Y.Z\"` field.".to_string())
      }
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Precondition(e) => write!(f, "{}", e),
      ReleaseError::Transaction(e) => write!(f, "{}", e),
      ReleaseError::Discovery(e) => write!(f, "{}", e),
      ReleaseError::Ci(e) => write!(f, "{}", e),
      ReleaseError::Verification(e) => write!(f, "{}", e),
      ReleaseError::InvalidVersion { manifest, found } => match found {
        Some(v) => write!(f, "Invalid version '{}' in {}", v, manifest.display()),
        None => write!(f, "No version field found in {}", manifest.display()),
      },
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ReleaseError {
  fn from(err: toml_edit::TomlError) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<cargo_metadata::Error> for ReleaseError {
  fn from(err: cargo_metadata::Error) -> Self {
    ReleaseError::message(format!("Cargo metadata error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ReleaseError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ReleaseError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<semver::Error> for ReleaseError {
  fn from(err: semver::Error) -> Self {
    ReleaseError::message(format!("Version parse error: {}", err))
  }
}

impl From<reqwest::Error> for ReleaseError {
  fn from(err: reqwest::Error) -> Self {
    ReleaseError::message(format!("HTTP error: {}", err))
  }
}

/// Convert anyhow::Error to ReleaseError (test helpers and metadata plumbing)
impl From<anyhow::Error> for ReleaseError {
  fn from(err: anyhow::Error) -> Self {
    ReleaseError::message(err.to_string())
  }
}

/// Preflight failures: observed before any mutation
#[derive(Debug)]
pub enum PreconditionError {
  /// Tracked files modified outside the version manifest and lockfile
  DirtyWorkingTree { files: Vec<String> },

  /// Files already staged in the index
  StagedChanges { files: Vec<String> },

  /// The release tag already exists locally
  LocalTagExists { tag: String },

  /// The release tag already exists on the remote
  RemoteTagExists { tag: String, remote: String },

  /// Local HEAD is behind (or has diverged from) the remote tracking branch
  RemoteDiverged { branch: String, remote: String },
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::DirtyWorkingTree { .. } => {
        Some("Commit or stash your changes first: `git stash` or `git commit -am ...`".to_string())
      }
      PreconditionError::StagedChanges { .. } => {
        Some("Commit or unstage the index first: `git reset HEAD`".to_string())
      }
      PreconditionError::LocalTagExists { tag } => Some(format!(
        "Bump to a different version, or delete the tag: `git tag -d {}`",
        tag
      )),
      PreconditionError::RemoteTagExists { tag, remote } => Some(format!(
        "That version was already released. Bump again, or delete the remote tag: `git push {} :refs/tags/{}`",
        remote, tag
      )),
      PreconditionError::RemoteDiverged { branch, remote } => Some(format!(
        "Integrate the remote first: `git pull --rebase {} {}`",
        remote, branch
      )),
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::DirtyWorkingTree { files } => {
        write!(f, "Working tree has uncommitted changes:")?;
        for file in files {
          write!(f, "\n   {}", file)?;
        }
        Ok(())
      }
      PreconditionError::StagedChanges { files } => {
        write!(f, "Index has staged changes:")?;
        for file in files {
          write!(f, "\n   {}", file)?;
        }
        Ok(())
      }
      PreconditionError::LocalTagExists { tag } => {
        write!(f, "Tag {} already exists locally", tag)
      }
      PreconditionError::RemoteTagExists { tag, remote } => {
        write!(f, "Tag {} already exists on {}", tag, remote)
      }
      PreconditionError::RemoteDiverged { branch, remote } => {
        write!(f, "Local {} is behind {}/{}", branch, remote, branch)
      }
    }
  }
}

/// Steps of the commit/tag/push sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TxStep {
  Stage,
  Commit,
  Tag,
  PushBranch,
  PushTag,
}

impl fmt::Display for TxStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TxStep::Stage => "stage manifest",
      TxStep::Commit => "commit",
      TxStep::Tag => "create tag",
      TxStep::PushBranch => "push branch",
      TxStep::PushTag => "push tag",
    };
    write!(f, "{}", name)
  }
}

/// A failed commit/tag/push sequence with the exact point of failure
#[derive(Debug)]
pub struct TransactionError {
  /// Last step that completed successfully, if any
  pub completed: Option<TxStep>,
  /// The step that failed
  pub failed: TxStep,
  /// The release tag being created
  pub tag: String,
  /// What the underlying command reported
  pub reason: String,
}

impl TransactionError {
  fn help_message(&self) -> String {
    match self.failed {
      TxStep::Stage | TxStep::Commit => {
        "Nothing was committed. Inspect `git status` and retry the release.".to_string()
      }
      TxStep::Tag => format!(
        "The release commit exists locally but is untagged and unpushed. \
         Retry with `git tag {0} && git push origin HEAD {0}`, or `git reset --hard HEAD~1` to abandon it.",
        self.tag
      ),
      TxStep::PushBranch => format!(
        "Commit and tag {} exist locally but were not pushed. \
         Reconcile with `git push origin HEAD {}`.",
        self.tag, self.tag
      ),
      TxStep::PushTag => format!(
        "The branch was pushed but tag {0} was not. Push it with `git push origin {0}`.",
        self.tag
      ),
    }
  }
}

impl fmt::Display for TransactionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.completed {
      Some(step) => write!(
        f,
        "Release transaction failed at '{}' (last completed step: '{}'): {}",
        self.failed, step, self.reason
      ),
      None => write!(f, "Release transaction failed at '{}': {}", self.failed, self.reason),
    }
  }
}

/// The CI run for a pushed tag never appeared within the attempt budget
#[derive(Debug)]
pub struct DiscoveryError {
  pub tag: String,
  pub attempts: usize,
  pub waited_secs: u64,
}

impl DiscoveryError {
  fn help_message(&self) -> String {
    format!(
      "CI may simply be slow to trigger. Watch for it later with `deckhand monitor {}`.",
      self.tag
    )
  }
}

impl fmt::Display for DiscoveryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "No CI run referencing {} appeared after {} attempts (~{}s)",
      self.tag, self.attempts, self.waited_secs
    )
  }
}

/// A CI run reached a terminal state other than success
#[derive(Debug)]
pub struct CiFailure {
  pub run_id: u64,
  pub conclusion: String,
  pub url: String,
}

impl CiFailure {
  fn help_message(&self) -> String {
    format!("Inspect the failing jobs: `gh run view {} --log-failed`", self.run_id)
  }
}

impl fmt::Display for CiFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "CI run {} completed with conclusion '{}'\n   {}",
      self.run_id, self.conclusion, self.url
    )
  }
}

/// Release artifacts missing or unreachable
#[derive(Debug)]
pub struct VerificationFailure {
  pub tag: String,
  pub missing: Vec<String>,
  pub failed_probes: Vec<String>,
}

impl fmt::Display for VerificationFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Release {} failed artifact verification", self.tag)?;
    if !self.missing.is_empty() {
      write!(f, "\n   missing: {}", self.missing.join(", "))?;
    }
    if !self.failed_probes.is_empty() {
      write!(f, "\n   unreachable: {}", self.failed_probes.join(", "))?;
    }
    Ok(())
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run deckhand from inside the application repository (looked at: {})",
        path.display()
      )),
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("non-fast-forward") {
          Some("The remote has commits you don't have. Pull first.".to_string())
        } else if stderr.contains("permission denied") || stderr.contains("403") {
          Some("Check your SSH key permissions and repository access.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Result type alias for deckhand
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
