//! Command line interface for branch-release.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::git::SystemGit;
use crate::process::ProcessRunner;
use crate::release::{ReleaseOutcome, ReleasePipeline};

/// Main CLI entry point, returning the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    let config = args.to_config();
    let redactor = config.redactor();

    crate::logging::init_logger(redactor.clone(), args.verbose, args.quiet);
    let output = OutputManager::new(args.verbose, args.quiet).with_redactor(redactor);

    match execute(&config, &output).await {
        Ok(ReleaseOutcome::Released(release)) => {
            output.success(&format!(
                "Released {} on '{}' ({})",
                release.tag, release.branch, release.commit
            ));
            0
        }
        Ok(ReleaseOutcome::Skipped { version, reason }) => {
            output.info(&format!("Nothing to release: {} {}", version, reason));
            0
        }
        Err(e) => {
            report_failure(&output, &e);
            1
        }
    }
}

/// Validate the configuration, open the repository and run the pipeline
pub async fn execute(config: &ReleaseConfig, output: &OutputManager) -> Result<ReleaseOutcome> {
    config.validate()?;
    log::debug!("configuration: {:?}", config);

    let runner = ProcessRunner::new(&config.repo_path, config.redactor());
    let git = SystemGit::open(runner.clone()).await?;

    ReleasePipeline::new(&git, config, &runner, output).run().await
}

fn report_failure(output: &OutputManager, error: &ReleaseError) {
    output.error(&format!("Release failed: {}", error));

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() && !output.is_quiet() {
        output.info("Recovery suggestions:");
        for suggestion in suggestions {
            output.indent(&suggestion);
        }
    }
}
