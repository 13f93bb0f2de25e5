//! Error types for branch_release operations.
//!
//! Every variant carries a human-readable diagnostic. Text captured from git or
//! the build command is redacted by the process runner before it lands here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for branch_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all branch_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Manifest missing or unparsable at a revision
    #[error("Failed to read manifest '{path}' at {revision}: {reason}")]
    ManifestRead {
        /// Revision the manifest was read from
        revision: String,
        /// Manifest path relative to the repository root
        path: String,
        /// Reason for the error
        reason: String,
    },

    /// Declared version is not valid semver
    #[error("Invalid version '{version}' declared in manifest: {source}")]
    VersionFormat {
        /// Version string as declared
        version: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// Release branch synchronization errors
    #[error("Branch sync failed: {0}")]
    Sync(#[from] SyncError),

    /// Build command errors
    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    /// Commit and tag errors
    #[error("Release commit failed: {0}")]
    Compose(#[from] ComposeError),

    /// Push errors
    #[error("Push failed: {0}")]
    Push(#[from] PushError),

    /// Git tooling errors outside a specific stage
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// CLI and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Git command errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git executable not found on PATH
    #[error("git executable not found on PATH")]
    NotInstalled,

    /// Not a git repository
    #[error("Not a git repository: {path}")]
    NotRepository {
        /// Path that was expected to be a repository
        path: PathBuf,
    },

    /// A git command exited unsuccessfully
    #[error("'{command}' failed: {output}")]
    CommandFailed {
        /// Command line as echoed (redacted)
        command: String,
        /// Captured diagnostic output (redacted)
        output: String,
    },
}

/// Release branch synchronization errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Could not list remote branches
    #[error("could not query branches of remote '{remote}': {reason}")]
    RemoteQuery {
        /// Remote name
        remote: String,
        /// Reason for the error
        reason: String,
    },

    /// Fetching the remote release branch failed
    #[error("could not fetch '{branch}' from '{remote}': {reason}")]
    Fetch {
        /// Remote name
        remote: String,
        /// Branch name
        branch: String,
        /// Reason for the error
        reason: String,
    },

    /// Checking out a branch failed
    #[error("could not check out '{branch}': {reason}")]
    Checkout {
        /// Branch name
        branch: String,
        /// Reason for the error
        reason: String,
    },

    /// Merging mainline into the release branch failed
    #[error("merging '{mainline}' into '{branch}' failed: {reason}")]
    Merge {
        /// Mainline branch name
        mainline: String,
        /// Release branch name
        branch: String,
        /// Reason for the error
        reason: String,
    },
}

/// Build command errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Output directory could not be cleared
    #[error("could not clear output directory {path}: {source}")]
    ClearOutput {
        /// Output directory
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Build process exited non-zero
    #[error("'{command}' exited with {status}: {output}")]
    Failed {
        /// Build command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured stdout/stderr
        output: String,
    },

    /// Build process could not be started
    #[error("could not start '{command}': {reason}")]
    Spawn {
        /// Build command line
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Commit and tag errors
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Staging files failed
    #[error("could not stage '{path}': {reason}")]
    Stage {
        /// Pathspec being staged
        path: String,
        /// Reason for the error
        reason: String,
    },

    /// Committing failed
    #[error("could not commit '{message}': {reason}")]
    Commit {
        /// Commit message
        message: String,
        /// Reason for the error
        reason: String,
    },

    /// Tagging failed
    #[error("could not create tag '{tag}': {reason}")]
    Tag {
        /// Tag name
        tag: String,
        /// Reason for the error
        reason: String,
    },
}

/// Push errors
#[derive(Error, Debug)]
pub enum PushError {
    /// Remote URL could not be read from git config
    #[error("could not read URL of remote '{remote}': {reason}")]
    RemoteUrl {
        /// Remote name
        remote: String,
        /// Reason for the error
        reason: String,
    },

    /// Pushing a ref failed
    #[error("could not push '{refspec}': {reason}")]
    Rejected {
        /// Refspec that failed
        refspec: String,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments or environment values
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::ManifestRead { path, revision, .. } => vec![
                format!("Check that '{}' is committed on {}", path, revision),
                "Use --manifest to point at a different manifest file".to_string(),
            ],
            ReleaseError::VersionFormat { .. } => vec![
                "Declare a semantic version such as 1.2.3 in the manifest".to_string(),
            ],
            ReleaseError::Sync(SyncError::Merge { .. }) => vec![
                "Inspect the release branch history: git log --oneline --graph".to_string(),
                "Resolve the conflict manually and push the release branch".to_string(),
            ],
            ReleaseError::Sync(_) => vec![
                "Verify the remote is reachable: git ls-remote --heads".to_string(),
            ],
            ReleaseError::Build(BuildError::Failed { command, .. }) => vec![
                format!("Run '{}' locally to reproduce the failure", command),
            ],
            ReleaseError::Build(_) => vec![
                "Check --script and --script-runner".to_string(),
            ],
            ReleaseError::Compose(ComposeError::Commit { .. }) => vec![
                "Configure a committer identity: git config user.name / user.email".to_string(),
                "Omit --no-empty-commit if the artifacts did not change".to_string(),
            ],
            ReleaseError::Compose(ComposeError::Tag { tag, .. }) => vec![
                format!("Delete the stale local tag: git tag -d {}", tag),
            ],
            ReleaseError::Push(_) => vec![
                "Check that the token has push access to the repository".to_string(),
                "Verify git remote URL: git remote -v".to_string(),
            ],
            ReleaseError::Git(GitError::NotInstalled) => vec![
                "Install git and make sure it is on PATH".to_string(),
            ],
            ReleaseError::Git(GitError::NotRepository { .. }) => vec![
                "Run from inside a git checkout or pass --repo".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
