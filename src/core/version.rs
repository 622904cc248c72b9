//! Manifest version storage and bump arithmetic
//!
//! The released version lives in the application workspace manifest as a
//! plain `version = "X.Y.Z"` field, either under `[workspace.package]` or
//! `[package]`. Reads and writes go through `toml_edit` so a version bump
//! touches exactly one value and leaves every other byte of the manifest
//! untouched.

use crate::core::error::{ReleaseError, ReleaseResult};
use semver::Version;
use std::path::PathBuf;

/// Manifest file carrying the version field
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Lockfile staged alongside the manifest when present
pub const LOCKFILE: &str = "Cargo.lock";

/// Which component of the version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BumpKind {
  Patch,
  Minor,
  Major,
}

impl std::fmt::Display for BumpKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      BumpKind::Patch => "patch",
      BumpKind::Minor => "minor",
      BumpKind::Major => "major",
    };
    write!(f, "{}", name)
  }
}

/// Apply a bump to a version (pure)
pub fn bump(current: &Version, kind: BumpKind) -> Version {
  match kind {
    BumpKind::Patch => Version::new(current.major, current.minor, current.patch + 1),
    BumpKind::Minor => Version::new(current.major, current.minor + 1, 0),
    BumpKind::Major => Version::new(current.major + 1, 0, 0),
  }
}

/// Format the release tag for a version
pub fn release_tag(version: &Version) -> String {
  format!("v{}", version)
}

/// Reads and rewrites the version field of a manifest file
pub struct VersionStore {
  manifest_path: PathBuf,
}

impl VersionStore {
  pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
    Self {
      manifest_path: manifest_path.into(),
    }
  }

  /// Raw manifest content, for pre-mutation snapshots
  pub fn snapshot(&self) -> ReleaseResult<String> {
    Ok(std::fs::read_to_string(&self.manifest_path)?)
  }

  /// Restore a previously taken snapshot byte-for-byte
  pub fn restore(&self, snapshot: &str) -> ReleaseResult<()> {
    std::fs::write(&self.manifest_path, snapshot)?;
    Ok(())
  }

  /// Parse the current version out of the manifest
  pub fn read(&self) -> ReleaseResult<Version> {
    let content = self.snapshot()?;
    let doc: toml_edit::DocumentMut = content.parse()?;

    let Some(raw) = version_field(&doc).and_then(|item| item.as_str()) else {
      return Err(ReleaseError::InvalidVersion {
        manifest: self.manifest_path.clone(),
        found: None,
      });
    };

    let version = raw.parse::<Version>().map_err(|_| ReleaseError::InvalidVersion {
      manifest: self.manifest_path.clone(),
      found: Some(raw.to_string()),
    })?;

    // Releases carry plain triples only; prerelease/build metadata is not
    // something this pipeline knows how to bump.
    if !version.pre.is_empty() || !version.build.is_empty() {
      return Err(ReleaseError::InvalidVersion {
        manifest: self.manifest_path.clone(),
        found: Some(raw.to_string()),
      });
    }

    Ok(version)
  }

  /// Rewrite only the version field, preserving the rest of the manifest
  pub fn write(&self, version: &Version) -> ReleaseResult<()> {
    let content = self.snapshot()?;
    let mut doc: toml_edit::DocumentMut = content.parse()?;

    let Some(item) = version_field_mut(&mut doc) else {
      return Err(ReleaseError::InvalidVersion {
        manifest: self.manifest_path.clone(),
        found: None,
      });
    };

    // Swap the value while keeping its decor, so trailing comments and
    // spacing around the field survive the rewrite.
    match item.as_value_mut() {
      Some(value) => {
        let decor = value.decor().clone();
        *value = toml_edit::Value::from(version.to_string());
        *value.decor_mut() = decor;
      }
      None => *item = toml_edit::value(version.to_string()),
    }

    std::fs::write(&self.manifest_path, doc.to_string())?;
    Ok(())
  }
}

fn version_field(doc: &toml_edit::DocumentMut) -> Option<&toml_edit::Item> {
  doc
    .get("workspace")
    .and_then(|w| w.get("package"))
    .and_then(|p| p.get("version"))
    .or_else(|| doc.get("package").and_then(|p| p.get("version")))
}

fn version_field_mut(doc: &mut toml_edit::DocumentMut) -> Option<&mut toml_edit::Item> {
  if doc
    .get("workspace")
    .and_then(|w| w.get("package"))
    .and_then(|p| p.get("version"))
    .is_some()
  {
    return doc
      .get_mut("workspace")
      .and_then(|w| w.get_mut("package"))
      .and_then(|p| p.get_mut("version"));
  }

  doc.get_mut("package").and_then(|p| p.get_mut("version"))
}
