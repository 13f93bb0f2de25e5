//! External process execution with captured, redacted output.
//!
//! All git and build invocations go through [`ProcessRunner`]. The echoed
//! command line and everything the child prints are redacted here, before any
//! caller can log it or fold it into an error.

use crate::redact::Redactor;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Command line as echoed (redacted)
    pub command: String,
    /// Exit status
    pub status: ExitStatus,
    /// Captured stdout (redacted)
    pub stdout: String,
    /// Captured stderr (redacted)
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Best diagnostic text: stderr and stdout, trimmed, whichever are non-empty
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{}\n{}", stderr, stdout),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => format!("no output ({})", self.status),
        }
    }
}

/// Runs external commands in a fixed working directory
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
    redactor: Redactor,
}

impl ProcessRunner {
    /// Create a runner rooted at `cwd`
    pub fn new(cwd: impl Into<PathBuf>, redactor: Redactor) -> Self {
        Self {
            cwd: cwd.into(),
            redactor,
        }
    }

    /// Working directory of spawned processes
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Redactor applied to echoed commands and captured output
    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Render a command line for display, redacted
    pub fn echo(&self, program: &str, args: &[&str]) -> String {
        let mut line = String::from(program);
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.redactor.redact(&line).into_owned()
    }

    /// Run `program` with `args` and wait for it to exit
    pub async fn run(&self, program: &str, args: &[&str]) -> std::io::Result<ProcessOutput> {
        self.run_with_env(program, args, &[]).await
    }

    /// Run `program` with extra environment variables
    pub async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> std::io::Result<ProcessOutput> {
        let command = self.echo(program, args);
        log::info!("running: '{}'", command);

        let output = Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .await?;

        let result = ProcessOutput {
            command,
            status: output.status,
            stdout: self.redactor.redact_bytes(&output.stdout),
            stderr: self.redactor.redact_bytes(&output.stderr),
        };

        if !result.success() {
            log::debug!("'{}' exited with {}", result.command, result.status);
        }

        Ok(result)
    }

    /// Run a command line through the platform shell
    pub async fn run_shell(&self, command_line: &str) -> std::io::Result<ProcessOutput> {
        #[cfg(windows)]
        let (shell, flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (shell, flag) = ("sh", "-c");

        let mut output = self.run(shell, &[flag, command_line]).await?;
        output.command = self.redactor.redact(command_line).into_owned();
        Ok(output)
    }
}
