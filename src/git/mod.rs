//! Git integration for release workflows.
//!
//! Git is driven through the system `git` binary. The release pipeline depends
//! only on the [`GitOperations`] trait.

#[cfg(test)]
pub(crate) mod fake;
mod operations;
mod remote;
mod system;

pub use operations::{GitOperations, GitResult};
pub use remote::{PushTarget, host_path, resolve_push_target};
pub use system::SystemGit;
