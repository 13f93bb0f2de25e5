//! In-memory git double for pipeline tests.

use crate::error::GitError;
use crate::git::{GitOperations, GitResult};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub current: Option<String>,
    pub dirty: bool,
    pub stash: Vec<String>,
    pub files: HashMap<(String, String), String>,
    pub config: HashMap<String, String>,
    pub remote_heads: String,
    pub remote_tags: String,
    pub local_tags: Vec<String>,
    pub pushed: Vec<(String, String)>,
    pub commits: Vec<String>,
    pub calls: Vec<String>,
    pub fail_on: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    state: RefCell<FakeState>,
}

impl FakeGit {
    pub fn on_branch(branch: &str) -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().current = Some(branch.to_string());
        fake
    }

    pub fn with_file(self, revision: &str, path: &str, content: &str) -> Self {
        self.state
            .borrow_mut()
            .files
            .insert((revision.to_string(), path.to_string()), content.to_string());
        self
    }

    pub fn with_config(self, key: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .config
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_remote_heads(self, listing: &str) -> Self {
        self.state.borrow_mut().remote_heads = listing.to_string();
        self
    }

    pub fn with_remote_tags(self, listing: &str) -> Self {
        self.state.borrow_mut().remote_tags = listing.to_string();
        self
    }

    pub fn dirty(self) -> Self {
        self.state.borrow_mut().dirty = true;
        self
    }

    /// Fail the first call whose recorded form starts with `prefix`
    pub fn failing_on(self, prefix: &str) -> Self {
        self.state.borrow_mut().fail_on = Some(prefix.to_string());
        self
    }

    pub fn state(&self) -> Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) -> GitResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call.clone());
        if state.fail_on.as_deref().is_some_and(|p| call.starts_with(p)) {
            state.fail_on = None;
            return Err(GitError::CommandFailed {
                command: format!("git {}", call),
                output: "fatal: injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl GitOperations for FakeGit {
    async fn current_branch(&self) -> GitResult<Option<String>> {
        Ok(self.state.borrow().current.clone())
    }

    async fn head_commit(&self) -> GitResult<String> {
        Ok(format!("sha-{}", self.state.borrow().commits.len()))
    }

    async fn is_clean(&self) -> GitResult<bool> {
        Ok(!self.state.borrow().dirty)
    }

    async fn revision_exists(&self, revision: &str) -> GitResult<bool> {
        Ok(self.state.borrow().files.keys().any(|(rev, _)| rev == revision))
    }

    async fn show_file(&self, revision: &str, path: &str) -> GitResult<String> {
        self.record(format!("show {}:{}", revision, path))?;
        self.state
            .borrow()
            .files
            .get(&(revision.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| GitError::CommandFailed {
                command: format!("git show {}:{}", revision, path),
                output: format!("fatal: path '{}' does not exist in '{}'", path, revision),
            })
    }

    async fn config_get(&self, key: &str) -> GitResult<Option<String>> {
        self.record(format!("config --get {}", key))?;
        Ok(self.state.borrow().config.get(key).cloned())
    }

    async fn ls_remote_heads(&self, remote: &str) -> GitResult<String> {
        self.record(format!("ls-remote --heads {}", remote))?;
        Ok(self.state.borrow().remote_heads.clone())
    }

    async fn ls_remote_tags(&self, remote: &str) -> GitResult<String> {
        self.record(format!("ls-remote --tags {}", remote))?;
        Ok(self.state.borrow().remote_tags.clone())
    }

    async fn fetch_branch(&self, remote: &str, branch: &str) -> GitResult<()> {
        self.record(format!("fetch {} {}", remote, branch))
    }

    async fn checkout(&self, reference: &str) -> GitResult<()> {
        self.record(format!("checkout {}", reference))?;
        self.state.borrow_mut().current = Some(reference.to_string());
        Ok(())
    }

    async fn checkout_new_branch(&self, branch: &str) -> GitResult<()> {
        self.record(format!("checkout -B {}", branch))?;
        self.state.borrow_mut().current = Some(branch.to_string());
        Ok(())
    }

    async fn merge_theirs(&self, branch: &str) -> GitResult<()> {
        self.record(format!("merge -X theirs {}", branch))
    }

    async fn add(&self, pathspec: &str, force: bool) -> GitResult<()> {
        if force {
            self.record(format!("add -f {}", pathspec))
        } else {
            self.record(format!("add {}", pathspec))
        }
    }

    async fn commit(&self, message: &str, allow_empty: bool) -> GitResult<String> {
        let flag = if allow_empty { " --allow-empty" } else { "" };
        self.record(format!("commit{} -m {}", flag, message))?;
        let mut state = self.state.borrow_mut();
        state.commits.push(message.to_string());
        Ok(format!("sha-{}", state.commits.len()))
    }

    async fn tag(&self, name: &str) -> GitResult<()> {
        self.record(format!("tag {}", name))?;
        self.state.borrow_mut().local_tags.push(name.to_string());
        Ok(())
    }

    async fn delete_tag(&self, name: &str) -> GitResult<()> {
        self.record(format!("tag -d {}", name))?;
        self.state.borrow_mut().local_tags.retain(|t| t != name);
        Ok(())
    }

    async fn push(&self, target: &str, refspec: &str) -> GitResult<()> {
        self.record(format!("push {} {}", target, refspec))?;
        self.state
            .borrow_mut()
            .pushed
            .push((target.to_string(), refspec.to_string()));
        Ok(())
    }

    async fn stash_push(&self, message: &str) -> GitResult<()> {
        self.record(format!("stash push {}", message))?;
        let mut state = self.state.borrow_mut();
        state.stash.push(message.to_string());
        state.dirty = false;
        Ok(())
    }

    async fn stash_pop(&self) -> GitResult<()> {
        self.record("stash pop".to_string())?;
        let mut state = self.state.borrow_mut();
        state.stash.pop();
        state.dirty = true;
        Ok(())
    }

    async fn reset_hard(&self) -> GitResult<()> {
        self.record("reset --hard".to_string())
    }

    async fn clean(&self) -> GitResult<()> {
        self.record("clean -fd".to_string())
    }
}
