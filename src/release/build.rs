//! Build step: wipe the output directory, then run the build command.

use crate::config::ReleaseConfig;
use crate::error::{BuildError, Result};
use crate::process::ProcessRunner;
use std::path::Path;
use walkdir::WalkDir;

/// Remove everything inside `dir`, keeping (or creating) the directory itself
///
/// Returns the number of files and directories removed.
pub fn clear_output_dir(dir: &Path) -> std::io::Result<usize> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        return Ok(0);
    }

    let removed = WalkDir::new(dir).min_depth(1).into_iter().count();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        // symlink_metadata so a symlinked directory is unlinked, not followed
        if std::fs::symlink_metadata(&path)?.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }

    Ok(removed)
}

/// Runs the configured build command against a freshly cleared output directory
#[derive(Debug)]
pub struct BuildExecutor<'a> {
    runner: &'a ProcessRunner,
    config: &'a ReleaseConfig,
}

impl<'a> BuildExecutor<'a> {
    /// Create an executor
    pub fn new(runner: &'a ProcessRunner, config: &'a ReleaseConfig) -> Self {
        Self { runner, config }
    }

    /// Clear the output directory and run the build
    pub async fn build(&self) -> Result<()> {
        let dist = self.runner.cwd().join(&self.config.dist_dir);

        log::info!("Clearing {} folder", self.config.dist_dir.display());
        let removed = clear_output_dir(&dist).map_err(|source| BuildError::ClearOutput {
            path: dist.clone(),
            source,
        })?;
        if removed > 0 {
            log::debug!("removed {} stale entries from {}", removed, dist.display());
        }

        let command = self.config.build_command();
        let output = self
            .runner
            .run_shell(&command)
            .await
            .map_err(|e| BuildError::Spawn {
                command: self.runner.redactor().redact(&command).into_owned(),
                reason: e.to_string(),
            })?;

        if !output.success() {
            return Err(BuildError::Failed {
                command: output.command.clone(),
                status: output.status.to_string(),
                output: output.diagnostics(),
            }
            .into());
        }

        Ok(())
    }
}
