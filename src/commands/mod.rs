//! CLI commands for deckhand
//!
//! One module per user-facing command:
//!
//! - **release**: The full bump → preflight → commit/tag/push → CI → verify pipeline
//! - **status**: Read-only report of version, tags, CI, and release state
//! - **monitor**: Re-attach to a tag's CI run and verify its artifacts
//! - **check**: Verify the published artifacts of an existing release

pub mod check;
pub mod monitor;
pub mod release;
pub mod status;

pub use check::run_check;
pub use monitor::run_monitor;
pub use release::run_release;
pub use status::run_status;

use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::core::version::{VersionStore, MANIFEST_FILE};
use std::path::PathBuf;

/// The application repository a command operates on
pub struct Workspace {
  pub root: PathBuf,
  pub git: SystemGit,
  pub store: VersionStore,
}

impl Workspace {
  /// Resolve the workspace containing the current directory
  pub fn open() -> ReleaseResult<Self> {
    let metadata = cargo_metadata::MetadataCommand::new().no_deps().exec()?;
    let root = metadata.workspace_root.into_std_path_buf();

    let git = SystemGit::open(&root)?;
    let store = VersionStore::new(root.join(MANIFEST_FILE));

    Ok(Self { root, git, store })
  }
}
