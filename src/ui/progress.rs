//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars. The only bounded wait in
//! the pipeline is CI run discovery, which renders one bar across its
//! attempt budget.

use crate::core::ci::locator::DiscoveryObserver;
use linya::{Bar, Progress};

/// Progress bar across the run-discovery attempt budget
pub struct DiscoveryProgress {
  progress: Progress,
  bar: Option<Bar>,
}

impl DiscoveryProgress {
  pub fn new() -> Self {
    Self {
      progress: Progress::new(),
      bar: None,
    }
  }
}

impl Default for DiscoveryProgress {
  fn default() -> Self {
    Self::new()
  }
}

impl DiscoveryObserver for DiscoveryProgress {
  fn attempt(&mut self, n: usize, max: usize) {
    if self.bar.is_none() {
      self.bar = Some(self.progress.bar(max, "Waiting for CI to pick up the tag"));
    }
    if let Some(bar) = &self.bar {
      self.progress.set_and_draw(bar, n);
    }
  }
}
