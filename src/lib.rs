//! # Branch Release
//!
//! Publishes build artifacts to a dedicated release branch and tags the
//! release commit with the version declared in the project manifest.
//!
//! ## Features
//!
//! - **Idempotent**: a version that already has a remote tag is skipped
//! - **History preserving**: mainline is merged into the release branch, never rebased
//! - **Restoring**: the starting branch and uncommitted work are restored after every run
//! - **Token safe**: the push token is redacted from logs, console output and errors
//!
//! ## Usage
//!
//! ```bash
//! branch-release                          # build with `npm run-script build-dist`
//! branch-release -b dist -s build         # custom branch and script
//! GH_TOKEN=... branch-release --gate diff # release only when the version changed
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod process;
pub mod redact;
pub mod release;
pub mod version;

pub use cli::Args;
pub use config::ReleaseConfig;
pub use error::{ReleaseError, Result};
pub use git::{GitOperations, SystemGit};
pub use release::{Release, ReleaseOutcome, ReleasePipeline};
pub use version::VersionResolver;
