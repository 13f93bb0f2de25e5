//! System git backend.
//!
//! Every operation is one `git` subprocess run through [`ProcessRunner`], so
//! command echoes and captured output are already redacted when they reach an
//! error or a log line.

use crate::error::GitError;
use crate::git::{GitOperations, GitResult};
use crate::process::{ProcessOutput, ProcessRunner};

/// Git operations using the `git` executable on PATH
#[derive(Debug, Clone)]
pub struct SystemGit {
    runner: ProcessRunner,
}

impl SystemGit {
    /// Open the repository at the runner's working directory
    pub async fn open(runner: ProcessRunner) -> GitResult<Self> {
        which::which("git").map_err(|_| GitError::NotInstalled)?;
        if !runner.cwd().is_dir() {
            return Err(GitError::NotRepository {
                path: runner.cwd().to_path_buf(),
            });
        }

        let git = Self { runner };
        let output = git.run(&["rev-parse", "--is-inside-work-tree"]).await?;
        if !output.success() || output.stdout.trim() != "true" {
            return Err(GitError::NotRepository {
                path: git.runner.cwd().to_path_buf(),
            });
        }

        Ok(git)
    }

    /// Run git and return the output whatever the exit status
    async fn run(&self, args: &[&str]) -> GitResult<ProcessOutput> {
        // Never block on a credential prompt.
        self.runner
            .run_with_env("git", args, &[("GIT_TERMINAL_PROMPT", "0")])
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => GitError::NotInstalled,
                _ => GitError::CommandFailed {
                    command: self.runner.echo("git", args),
                    output: e.to_string(),
                },
            })
    }

    /// Run git and fail on a non-zero exit
    async fn run_checked(&self, args: &[&str]) -> GitResult<ProcessOutput> {
        let output = self.run(args).await?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: output.command.clone(),
                output: output.diagnostics(),
            });
        }
        Ok(output)
    }
}

impl GitOperations for SystemGit {
    async fn current_branch(&self) -> GitResult<Option<String>> {
        let output = self.run(&["symbolic-ref", "--quiet", "--short", "HEAD"]).await?;
        if !output.success() {
            // Detached HEAD
            return Ok(None);
        }
        Ok(Some(output.stdout.trim().to_string()))
    }

    async fn head_commit(&self) -> GitResult<String> {
        let output = self.run_checked(&["rev-parse", "HEAD"]).await?;
        Ok(output.stdout.trim().to_string())
    }

    async fn is_clean(&self) -> GitResult<bool> {
        let output = self.run_checked(&["status", "--porcelain"]).await?;
        Ok(output.stdout.trim().is_empty())
    }

    async fn revision_exists(&self, revision: &str) -> GitResult<bool> {
        let spec = format!("{}^{{commit}}", revision);
        let output = self.run(&["rev-parse", "--verify", "--quiet", &spec]).await?;
        Ok(output.success())
    }

    async fn show_file(&self, revision: &str, path: &str) -> GitResult<String> {
        let spec = format!("{}:{}", revision, path);
        let output = self.run_checked(&["show", &spec]).await?;
        Ok(output.stdout)
    }

    async fn config_get(&self, key: &str) -> GitResult<Option<String>> {
        let output = self.run(&["config", "--get", key]).await?;
        match output.status.code() {
            Some(0) => Ok(Some(output.stdout.trim().to_string())),
            // Exit code 1 means the key is not set
            Some(1) => Ok(None),
            _ => Err(GitError::CommandFailed {
                command: output.command.clone(),
                output: output.diagnostics(),
            }),
        }
    }

    async fn ls_remote_heads(&self, remote: &str) -> GitResult<String> {
        let output = self.run_checked(&["ls-remote", "--heads", remote]).await?;
        Ok(output.stdout)
    }

    async fn ls_remote_tags(&self, remote: &str) -> GitResult<String> {
        let output = self.run_checked(&["ls-remote", "--tags", remote]).await?;
        Ok(output.stdout)
    }

    async fn fetch_branch(&self, remote: &str, branch: &str) -> GitResult<()> {
        let refspec = format!("+refs/heads/{branch}:refs/heads/{branch}");
        self.run_checked(&["fetch", remote, &refspec]).await?;
        Ok(())
    }

    async fn checkout(&self, reference: &str) -> GitResult<()> {
        self.run_checked(&["checkout", reference]).await?;
        Ok(())
    }

    async fn checkout_new_branch(&self, branch: &str) -> GitResult<()> {
        self.run_checked(&["checkout", "-B", branch]).await?;
        Ok(())
    }

    async fn merge_theirs(&self, branch: &str) -> GitResult<()> {
        self.run_checked(&["merge", "--no-edit", "-X", "theirs", branch])
            .await?;
        Ok(())
    }

    async fn add(&self, pathspec: &str, force: bool) -> GitResult<()> {
        if force {
            self.run_checked(&["add", "-f", "--", pathspec]).await?;
        } else {
            self.run_checked(&["add", "--", pathspec]).await?;
        }
        Ok(())
    }

    async fn commit(&self, message: &str, allow_empty: bool) -> GitResult<String> {
        let mut args = vec!["commit", "-m", message];
        if allow_empty {
            args.push("--allow-empty");
        }
        self.run_checked(&args).await?;
        self.head_commit().await
    }

    async fn tag(&self, name: &str) -> GitResult<()> {
        self.run_checked(&["tag", name]).await?;
        Ok(())
    }

    async fn delete_tag(&self, name: &str) -> GitResult<()> {
        self.run_checked(&["tag", "-d", name]).await?;
        Ok(())
    }

    async fn push(&self, target: &str, refspec: &str) -> GitResult<()> {
        self.run_checked(&["push", target, refspec]).await?;
        Ok(())
    }

    async fn stash_push(&self, message: &str) -> GitResult<()> {
        self.run_checked(&["stash", "push", "--include-untracked", "-m", message])
            .await?;
        Ok(())
    }

    async fn stash_pop(&self) -> GitResult<()> {
        self.run_checked(&["stash", "pop"]).await?;
        Ok(())
    }

    async fn reset_hard(&self) -> GitResult<()> {
        self.run_checked(&["reset", "--hard"]).await?;
        Ok(())
    }

    async fn clean(&self) -> GitResult<()> {
        self.run_checked(&["clean", "-fd"]).await?;
        Ok(())
    }
}
