//! Version resolution from the committed manifest.
//!
//! Versions are always read from a revision (`git show <rev>:<manifest>`),
//! never from the working tree, so uncommitted edits cannot leak into a
//! release.

mod manifest;

pub use manifest::ManifestFormat;

use crate::error::{ReleaseError, Result};
use crate::git::GitOperations;
use semver::Version;

/// Normalise a declared version the way npm's `semver.clean` does and parse it
///
/// Surrounding whitespace and a leading `=` or `v` are dropped.
pub fn clean_version(declared: &str) -> Result<Version> {
    let trimmed = declared.trim();
    let stripped = trimmed.trim_start_matches('=').trim_start();
    let stripped = stripped
        .strip_prefix('v')
        .or_else(|| stripped.strip_prefix('V'))
        .unwrap_or(stripped);

    Version::parse(stripped).map_err(|source| ReleaseError::VersionFormat {
        version: declared.to_string(),
        source,
    })
}

/// Reads the declared version of the mainline manifest at specific revisions
#[derive(Debug)]
pub struct VersionResolver<'a, G> {
    git: &'a G,
    mainline: &'a str,
    manifest: &'a str,
    format: ManifestFormat,
}

impl<'a, G: GitOperations> VersionResolver<'a, G> {
    /// Create a resolver for `manifest` on `mainline`
    pub fn new(git: &'a G, mainline: &'a str, manifest: &'a str, format: ManifestFormat) -> Self {
        Self {
            git,
            mainline,
            manifest,
            format,
        }
    }

    /// Version declared at the tip of mainline
    pub async fn at_head(&self) -> Result<Version> {
        self.at(self.mainline).await
    }

    /// Version declared at the first parent of mainline's tip
    ///
    /// `None` when there is no parent commit or the manifest did not exist there.
    pub async fn at_parent(&self) -> Result<Option<Version>> {
        let parent = format!("{}^", self.mainline);
        if !self.git.revision_exists(&parent).await? {
            log::debug!("{} has no parent commit", self.mainline);
            return Ok(None);
        }

        match self.at(&parent).await {
            Ok(version) => Ok(Some(version)),
            Err(ReleaseError::ManifestRead { reason, .. }) => {
                log::debug!("no readable manifest at {}: {}", parent, reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Version declared at an arbitrary revision
    pub async fn at(&self, revision: &str) -> Result<Version> {
        let manifest_read = |reason: String| ReleaseError::ManifestRead {
            revision: revision.to_string(),
            path: self.manifest.to_string(),
            reason,
        };

        let content = self
            .git
            .show_file(revision, self.manifest)
            .await
            .map_err(|e| manifest_read(e.to_string()))?;
        let declared = self.format.declared_version(&content).map_err(manifest_read)?;

        clean_version(&declared)
    }
}
