//! Release commit and tag creation.

use crate::config::ReleaseConfig;
use crate::error::{ComposeError, Result};
use crate::git::GitOperations;
use semver::Version;

/// Commit and tag created for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRelease {
    /// Commit SHA
    pub commit: String,
    /// Tag name
    pub tag: String,
    /// Commit message
    pub message: String,
}

/// Stages build output, commits and tags it
#[derive(Debug)]
pub struct ReleaseComposer<'a, G> {
    git: &'a G,
    config: &'a ReleaseConfig,
}

impl<'a, G: GitOperations> ReleaseComposer<'a, G> {
    /// Create a composer
    pub fn new(git: &'a G, config: &'a ReleaseConfig) -> Self {
        Self { git, config }
    }

    /// Stage everything plus the (usually ignored) output directory, commit and tag
    pub async fn compose(&self, version: &Version) -> Result<ComposedRelease> {
        let stage = |path: &str, e: crate::error::GitError| ComposeError::Stage {
            path: path.to_string(),
            reason: e.to_string(),
        };

        self.git.add(".", false).await.map_err(|e| stage(".", e))?;

        let dist = self.config.dist_dir.to_string_lossy().into_owned();
        self.git.add(&dist, true).await.map_err(|e| stage(&dist, e))?;

        let message = self.config.render_commit_message(version);
        let commit = self
            .git
            .commit(&message, self.config.allow_empty_commit)
            .await
            .map_err(|e| ComposeError::Commit {
                message: message.clone(),
                reason: e.to_string(),
            })?;

        let tag = self.config.tag_name(version);
        self.git.tag(&tag).await.map_err(|e| ComposeError::Tag {
            tag: tag.clone(),
            reason: e.to_string(),
        })?;

        Ok(ComposedRelease {
            commit,
            tag,
            message,
        })
    }
}
