//! Release artifact expectations and verification
//!
//! A complete Quarterdeck release carries a fixed set of assets: one archive
//! per desktop platform, the Windows installer, and the checksum file. The
//! verifier diffs the published asset list against that set and probes the
//! download URLs of the two platform archives — the only assets whose names
//! are constructible from the tag alone.

use crate::core::ci::CiProvider;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::collections::BTreeSet;
use std::time::Duration;

/// Every asset a complete release must carry
pub const EXPECTED_ASSETS: &[&str] = &[
  "quarterdeck-linux-x86_64.tar.gz",
  "quarterdeck-macos-aarch64.zip",
  "Quarterdeck-Setup-x86_64.exe",
  "SHA256SUMS.txt",
];

/// Platform archives probed for reachability
pub const PROBE_ASSETS: &[&str] = &["quarterdeck-linux-x86_64.tar.gz", "quarterdeck-macos-aarch64.zip"];

/// Base URL of published release downloads
pub const DOWNLOAD_BASE: &str = "https://github.com/quarterdeck-app/quarterdeck/releases/download";

/// Download URL for an asset of a tagged release
pub fn download_url(tag: &str, asset: &str) -> String {
  format!("{}/{}/{}", DOWNLOAD_BASE, tag, asset)
}

/// Issues a reachability request against a download URL
pub trait UrlProber {
  /// HTTP status code for the URL, following redirects
  fn probe(&self, url: &str) -> ReleaseResult<u16>;
}

/// Blocking HTTP prober
pub struct HttpProber {
  client: reqwest::blocking::Client,
}

impl HttpProber {
  pub fn new() -> ReleaseResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .timeout(Duration::from_secs(15))
      .build()
      .context("Failed to build HTTP client")?;
    Ok(Self { client })
  }
}

impl UrlProber for HttpProber {
  fn probe(&self, url: &str) -> ReleaseResult<u16> {
    let response = self.client.head(url).send()?;
    Ok(response.status().as_u16())
  }
}

/// Outcome of one reachability probe
#[derive(Debug, Clone)]
pub struct ProbeResult {
  pub url: String,
  /// HTTP status, or None when the request itself failed
  pub status: Option<u16>,
}

impl ProbeResult {
  pub fn ok(&self) -> bool {
    self.status == Some(200)
  }
}

/// What verification found for a published release
#[derive(Debug)]
pub struct VerificationResult {
  pub tag: String,
  pub is_draft: bool,
  pub published_at: Option<chrono::DateTime<chrono::Utc>>,
  pub found: usize,
  pub missing: Vec<String>,
  /// Published assets outside the expected set (informational only)
  pub extra: Vec<String>,
  pub probes: Vec<ProbeResult>,
}

impl VerificationResult {
  /// True only when nothing is missing and every probe returned 200
  pub fn overall_ok(&self) -> bool {
    self.missing.is_empty() && self.probes.iter().all(ProbeResult::ok)
  }

  pub fn failed_probe_urls(&self) -> Vec<String> {
    self.probes.iter().filter(|p| !p.ok()).map(|p| p.url.clone()).collect()
  }
}

/// Compare published assets against the expected manifest and probe downloads
pub fn verify_release(ci: &dyn CiProvider, prober: &dyn UrlProber, tag: &str) -> ReleaseResult<VerificationResult> {
  let assets = ci.release_assets(tag)?;

  let published: BTreeSet<&str> = assets.asset_names.iter().map(String::as_str).collect();
  let expected: BTreeSet<&str> = EXPECTED_ASSETS.iter().copied().collect();

  let missing: Vec<String> = expected.difference(&published).map(|s| s.to_string()).collect();
  let extra: Vec<String> = published.difference(&expected).map(|s| s.to_string()).collect();
  let found = expected.intersection(&published).count();

  let probes = PROBE_ASSETS
    .iter()
    .map(|asset| {
      let url = download_url(tag, asset);
      let status = prober.probe(&url).ok();
      ProbeResult { url, status }
    })
    .collect();

  Ok(VerificationResult {
    tag: tag.to_string(),
    is_draft: assets.is_draft,
    published_at: assets.published_at,
    found,
    missing,
    extra,
    probes,
  })
}

/// Turn a failed verification into the error the CLI exits with
pub fn verification_error(result: &VerificationResult) -> ReleaseError {
  ReleaseError::Verification(crate::core::error::VerificationFailure {
    tag: result.tag.clone(),
    missing: result.missing.clone(),
    failed_probes: result.failed_probe_urls(),
  })
}
