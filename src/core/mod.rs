//! Core engine for the release pipeline
//!
//! The fundamental building blocks behind the deckhand commands:
//!
//! - **artifacts**: Expected release assets and reachability verification
//! - **ci**: CI provider abstraction (gh CLI), run discovery and polling
//! - **error**: Error types with contextual help messages
//! - **prompt**: Injectable interactive-confirmation capability
//! - **transaction**: The commit → tag → push sequence
//! - **vcs**: Git operations abstraction (SystemGit)
//! - **version**: Manifest version storage and bump arithmetic

pub mod artifacts;
pub mod ci;
pub mod error;
pub mod prompt;
pub mod transaction;
pub mod vcs;
pub mod version;
