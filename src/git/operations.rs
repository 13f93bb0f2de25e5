//! Git operations trait used by the release pipeline.
//!
//! The pipeline only talks to git through [`GitOperations`]. The production
//! implementation shells out to the system `git` binary (see `system.rs`).

use crate::error::GitError;
use std::future::Future;

/// Result type for raw git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Trait defining every git operation the release workflow needs
pub trait GitOperations {
    /// Name of the checked-out branch, or `None` on a detached HEAD
    fn current_branch(&self) -> impl Future<Output = GitResult<Option<String>>>;

    /// Full SHA of HEAD
    fn head_commit(&self) -> impl Future<Output = GitResult<String>>;

    /// Whether the working tree has no staged, unstaged or untracked changes
    fn is_clean(&self) -> impl Future<Output = GitResult<bool>>;

    /// Whether `revision` resolves to a commit
    fn revision_exists(&self, revision: &str) -> impl Future<Output = GitResult<bool>>;

    /// Content of `path` as committed at `revision`
    fn show_file(&self, revision: &str, path: &str) -> impl Future<Output = GitResult<String>>;

    /// Value of a git config key, `None` when unset
    fn config_get(&self, key: &str) -> impl Future<Output = GitResult<Option<String>>>;

    /// Raw `ls-remote --heads` listing of a remote
    fn ls_remote_heads(&self, remote: &str) -> impl Future<Output = GitResult<String>>;

    /// Raw `ls-remote --tags` listing of a remote
    fn ls_remote_tags(&self, remote: &str) -> impl Future<Output = GitResult<String>>;

    /// Fetch `branch` from `remote` into the same-named local branch, overwriting it
    fn fetch_branch(&self, remote: &str, branch: &str) -> impl Future<Output = GitResult<()>>;

    /// Check out an existing branch or commit
    fn checkout(&self, reference: &str) -> impl Future<Output = GitResult<()>>;

    /// Create or reset `branch` at the current position and check it out
    fn checkout_new_branch(&self, branch: &str) -> impl Future<Output = GitResult<()>>;

    /// Merge `branch` into the current branch, taking its side on conflicting hunks
    fn merge_theirs(&self, branch: &str) -> impl Future<Output = GitResult<()>>;

    /// Stage a pathspec, optionally forcing ignored files
    fn add(&self, pathspec: &str, force: bool) -> impl Future<Output = GitResult<()>>;

    /// Commit the index and return the new commit SHA
    fn commit(&self, message: &str, allow_empty: bool) -> impl Future<Output = GitResult<String>>;

    /// Create a lightweight tag at HEAD
    fn tag(&self, name: &str) -> impl Future<Output = GitResult<()>>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> impl Future<Output = GitResult<()>>;

    /// Push a single refspec to a remote name or URL
    fn push(&self, target: &str, refspec: &str) -> impl Future<Output = GitResult<()>>;

    /// Stash all local changes including untracked files
    fn stash_push(&self, message: &str) -> impl Future<Output = GitResult<()>>;

    /// Re-apply and drop the most recent stash entry
    fn stash_pop(&self) -> impl Future<Output = GitResult<()>>;

    /// Discard index and working tree changes to tracked files
    fn reset_hard(&self) -> impl Future<Output = GitResult<()>>;

    /// Remove untracked files and directories (ignored files are kept)
    fn clean(&self) -> impl Future<Output = GitResult<()>>;
}
