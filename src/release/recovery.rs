//! Release session bookkeeping and working tree restoration.
//!
//! A session is opened before the first mutating git call. It remembers where
//! the operator started and stashes any uncommitted work, and it is always
//! closed through [`ReleaseSession::finish`] or [`ReleaseSession::recover`],
//! both of which return to the starting ref and pop the stash.

use crate::error::Result;
use crate::git::GitOperations;

const STASH_MESSAGE: &str = "branch-release: pre-run state";

/// Lifecycle of a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Nothing mutated yet
    Clean,
    /// Working tree and refs are being changed
    Working,
    /// Branch and tag pushed
    Released,
    /// A stage failed and restoration is in progress
    Recovering,
    /// Restoration finished after a failure
    Failed,
}

/// Ref checked out when the run started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartingRef {
    /// A named branch
    Branch(String),
    /// Detached HEAD at a commit
    Commit(String),
}

impl StartingRef {
    /// Name or SHA to pass to `git checkout`
    pub fn as_checkout(&self) -> &str {
        match self {
            StartingRef::Branch(name) => name,
            StartingRef::Commit(sha) => sha,
        }
    }
}

impl std::fmt::Display for StartingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartingRef::Branch(name) => write!(f, "branch '{}'", name),
            StartingRef::Commit(sha) => write!(f, "commit {}", sha),
        }
    }
}

/// What restoration did
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Phase the session ended in
    pub phase: RunPhase,
    /// Ref the session tried to return to
    pub starting: StartingRef,
    /// Steps that completed
    pub steps: Vec<String>,
    /// Steps that failed, already redacted by the git layer
    pub warnings: Vec<String>,
}

impl RestoreReport {
    fn new(phase: RunPhase, starting: StartingRef) -> Self {
        Self {
            phase,
            starting,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether every step succeeded
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// One-line description for the operator
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("Working tree restored to {}", self.starting)
        } else {
            format!(
                "Working tree only partly restored ({} of {} steps failed)",
                self.warnings.len(),
                self.steps.len() + self.warnings.len()
            )
        }
    }

    fn record<E: std::fmt::Display>(&mut self, step: String, result: std::result::Result<(), E>) -> bool {
        match result {
            Ok(()) => {
                log::debug!("restore: {}", step);
                self.steps.push(step);
                true
            }
            Err(e) => {
                log::warn!("restore step failed: {}: {}", step, e);
                self.warnings.push(format!("{}: {}", step, e));
                false
            }
        }
    }
}

/// One release run's mutable git state
#[derive(Debug)]
pub struct ReleaseSession<'a, G> {
    git: &'a G,
    starting: StartingRef,
    stashed: bool,
    tag: Option<String>,
    tag_pushed: bool,
    phase: RunPhase,
}

impl<'a, G: GitOperations> ReleaseSession<'a, G> {
    /// Capture the starting ref and stash uncommitted work, untracked files included
    pub async fn begin(git: &'a G) -> Result<Self> {
        let starting = match git.current_branch().await? {
            Some(branch) => StartingRef::Branch(branch),
            None => StartingRef::Commit(git.head_commit().await?),
        };

        let stashed = if git.is_clean().await? {
            false
        } else {
            log::info!("stashing uncommitted changes");
            git.stash_push(STASH_MESSAGE).await?;
            true
        };

        let mut session = Self {
            git,
            starting,
            stashed,
            tag: None,
            tag_pushed: false,
            phase: RunPhase::Clean,
        };
        session.transition(RunPhase::Working);
        Ok(session)
    }

    fn transition(&mut self, to: RunPhase) {
        log::debug!("release phase {:?} -> {:?}", self.phase, to);
        self.phase = to;
    }

    /// Current phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Ref the run started from
    pub fn starting_ref(&self) -> &StartingRef {
        &self.starting
    }

    /// Whether uncommitted work was stashed at the start
    pub fn stashed(&self) -> bool {
        self.stashed
    }

    /// Remember a locally created tag so recovery can delete it
    pub fn record_tag(&mut self, tag: &str) {
        self.tag = Some(tag.to_string());
    }

    /// The tag reached the remote; recovery must leave it alone
    pub fn record_tag_pushed(&mut self) {
        self.tag_pushed = true;
    }

    /// Close a successful run: return to the starting ref and pop the stash
    pub async fn finish(mut self) -> RestoreReport {
        self.transition(RunPhase::Released);
        let mut report = RestoreReport::new(self.phase, self.starting.clone());
        self.restore_position(&mut report).await;
        report
    }

    /// Undo a failed run as far as possible
    pub async fn recover(mut self) -> RestoreReport {
        self.transition(RunPhase::Recovering);
        let mut report = RestoreReport::new(self.phase, self.starting.clone());

        report.record("reset --hard".to_string(), self.git.reset_hard().await);
        report.record("clean untracked files".to_string(), self.git.clean().await);

        if let Some(tag) = self.tag.as_deref().filter(|_| !self.tag_pushed) {
            report.record(format!("delete local tag {}", tag), self.git.delete_tag(tag).await);
        }

        self.restore_position(&mut report).await;
        self.transition(RunPhase::Failed);
        report.phase = self.phase;
        report
    }

    async fn restore_position(&self, report: &mut RestoreReport) {
        let back = report.record(
            format!("check out {}", self.starting),
            self.git.checkout(self.starting.as_checkout()).await,
        );

        if !self.stashed {
            return;
        }
        if back {
            report.record("pop stash".to_string(), self.git.stash_pop().await);
        } else {
            // Popping onto the wrong branch would mix the operator's work into it.
            report.warnings.push(format!(
                "uncommitted changes left in the stash ('{}'); run 'git stash pop' on {}",
                STASH_MESSAGE, self.starting
            ));
        }
    }
}
