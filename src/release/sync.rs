//! Release branch synchronization.
//!
//! The release branch is refreshed from its remote counterpart when one
//! exists, otherwise created from mainline, and mainline is then merged into it
//! with conflicts resolved in mainline's favour. Merging (never rebasing) keeps
//! earlier artifact commits in the branch history.

use crate::config::ReleaseConfig;
use crate::error::{Result, SyncError};
use crate::git::GitOperations;

/// Where the local release branch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOrigin {
    /// Fetched from the remote branch of the same name
    Remote,
    /// Created fresh from mainline
    Fresh,
}

/// Whether an `ls-remote --heads` listing contains `branch`
pub fn remote_has_branch(listing: &str, branch: &str) -> bool {
    let wanted = format!("refs/heads/{}", branch);
    listing
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|reference| reference == wanted)
}

/// Prepares the release branch for a build
#[derive(Debug)]
pub struct BranchSynchronizer<'a, G> {
    git: &'a G,
    config: &'a ReleaseConfig,
}

impl<'a, G: GitOperations> BranchSynchronizer<'a, G> {
    /// Create a synchronizer
    pub fn new(git: &'a G, config: &'a ReleaseConfig) -> Self {
        Self { git, config }
    }

    /// Check out the release branch and merge mainline into it
    pub async fn synchronize(&self) -> Result<BranchOrigin> {
        let remote = &self.config.remote;
        let branch = &self.config.releases_branch;
        let mainline = &self.config.mainline_branch;

        // Start from mainline so a fresh branch is cut from it and the fetch
        // below never targets the checked-out branch.
        self.git
            .checkout(mainline)
            .await
            .map_err(|e| SyncError::Checkout {
                branch: mainline.clone(),
                reason: e.to_string(),
            })?;

        log::info!("check if remote branch exists");
        let heads = self
            .git
            .ls_remote_heads(remote)
            .await
            .map_err(|e| SyncError::RemoteQuery {
                remote: remote.clone(),
                reason: e.to_string(),
            })?;

        let origin = if remote_has_branch(&heads, branch) {
            self.git
                .fetch_branch(remote, branch)
                .await
                .map_err(|e| SyncError::Fetch {
                    remote: remote.clone(),
                    branch: branch.clone(),
                    reason: e.to_string(),
                })?;
            self.git
                .checkout(branch)
                .await
                .map_err(|e| SyncError::Checkout {
                    branch: branch.clone(),
                    reason: e.to_string(),
                })?;
            BranchOrigin::Remote
        } else {
            log::info!("remote has no '{}' branch; creating it from {}", branch, mainline);
            self.git
                .checkout_new_branch(branch)
                .await
                .map_err(|e| SyncError::Checkout {
                    branch: branch.clone(),
                    reason: e.to_string(),
                })?;
            BranchOrigin::Fresh
        };

        self.git
            .merge_theirs(mainline)
            .await
            .map_err(|e| SyncError::Merge {
                mainline: mainline.clone(),
                branch: branch.clone(),
                reason: e.to_string(),
            })?;

        Ok(origin)
    }
}
