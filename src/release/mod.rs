//! Release orchestration.
//!
//! Stages run strictly in order: resolve version, gate, sync, build, compose,
//! publish. Everything from sync onwards runs inside a [`ReleaseSession`], which
//! is closed on both paths so the operator ends up back where they started.

mod build;
mod compose;
mod gate;
mod publish;
mod recovery;
mod sync;

pub use build::{BuildExecutor, clear_output_dir};
pub use compose::{ComposedRelease, ReleaseComposer};
pub use gate::{
    GateDecision, GatePolicy, SkipReason, decide_by_diff, decide_by_tags, is_tagged, tag_pattern,
};
pub use publish::PublishClient;
pub use recovery::{ReleaseSession, RestoreReport, RunPhase, StartingRef};
pub use sync::{BranchOrigin, BranchSynchronizer, remote_has_branch};

use crate::cli::OutputManager;
use crate::config::ReleaseConfig;
use crate::error::Result;
use crate::git::GitOperations;
use crate::process::ProcessRunner;
use crate::version::VersionResolver;
use semver::Version;

/// A published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Released version
    pub version: Version,
    /// Release commit SHA
    pub commit: String,
    /// Pushed tag
    pub tag: String,
    /// Branch the commit was pushed to
    pub branch: String,
}

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The gate decided nothing needs releasing
    Skipped {
        /// Version declared on mainline
        version: Version,
        /// Why the gate skipped
        reason: SkipReason,
    },
    /// Branch and tag were pushed
    Released(Release),
}

/// Drives one release run
#[derive(Debug)]
pub struct ReleasePipeline<'a, G> {
    git: &'a G,
    config: &'a ReleaseConfig,
    runner: &'a ProcessRunner,
    output: &'a OutputManager,
}

impl<'a, G: GitOperations> ReleasePipeline<'a, G> {
    /// Create a pipeline
    pub fn new(
        git: &'a G,
        config: &'a ReleaseConfig,
        runner: &'a ProcessRunner,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            git,
            config,
            runner,
            output,
        }
    }

    /// Run the release
    pub async fn run(&self) -> Result<ReleaseOutcome> {
        let declared = self.resolver().at_head().await?;
        self.output.verbose(&format!(
            "{} declares version {}",
            self.config.manifest, declared
        ));

        let version = match self.gate(&declared).await? {
            GateDecision::Skip(reason) => {
                return Ok(ReleaseOutcome::Skipped {
                    version: declared,
                    reason,
                });
            }
            GateDecision::Proceed(version) => version,
        };

        self.output.info(&format!(
            "Releasing {} to '{}'",
            self.config.tag_name(&version),
            self.config.releases_branch
        ));

        let mut session = ReleaseSession::begin(self.git).await?;
        if session.stashed() {
            self.output.verbose("Stashed uncommitted changes");
        }

        match self.stages(&mut session, &version).await {
            Ok(release) => {
                let report = session.finish().await;
                self.show_report(&report);
                Ok(ReleaseOutcome::Released(release))
            }
            Err(e) => {
                log::error!("release failed, restoring working tree: {}", e);
                let report = session.recover().await;
                self.show_report(&report);
                if report.is_clean() {
                    self.output.info(&report.summary());
                } else {
                    self.output.warn(&report.summary());
                }
                Err(e)
            }
        }
    }

    fn resolver(&self) -> VersionResolver<'a, G> {
        VersionResolver::new(
            self.git,
            &self.config.mainline_branch,
            &self.config.manifest,
            self.config.manifest_format(),
        )
    }

    /// Decide whether the declared mainline version still needs releasing
    pub async fn gate(&self, version: &Version) -> Result<GateDecision> {
        let version = version.clone();
        let decision = match self.config.gate {
            GatePolicy::Tags => {
                log::info!("check if remote tag exists");
                let tags = self.git.ls_remote_tags(&self.config.remote).await?;
                decide_by_tags(version, &tags)
            }
            GatePolicy::Diff => {
                let previous = self.resolver().at_parent().await?;
                decide_by_diff(version, previous.as_ref())
            }
        };
        Ok(decision)
    }

    async fn stages(&self, session: &mut ReleaseSession<'a, G>, version: &Version) -> Result<Release> {
        let origin = BranchSynchronizer::new(self.git, self.config).synchronize().await?;
        self.output.verbose(&match origin {
            BranchOrigin::Remote => format!("Updated '{}' from the remote", self.config.releases_branch),
            BranchOrigin::Fresh => format!("Created '{}'", self.config.releases_branch),
        });

        self.output.info(&format!("Building with '{}'", self.config.build_command()));
        BuildExecutor::new(self.runner, self.config).build().await?;

        let composed = ReleaseComposer::new(self.git, self.config).compose(version).await?;
        session.record_tag(&composed.tag);
        self.output.verbose(&format!("Committed {} ({})", composed.commit, composed.message));

        let client = PublishClient::new(self.git, self.config);
        let target = client.push_target().await?;
        client.push_branch(&target).await?;
        client.push_tag(&target, &composed.tag).await?;
        session.record_tag_pushed();

        Ok(Release {
            version: version.clone(),
            commit: composed.commit,
            tag: composed.tag,
            branch: self.config.releases_branch.clone(),
        })
    }

    fn show_report(&self, report: &RestoreReport) {
        for step in &report.steps {
            self.output.verbose(&format!("Restore: {}", step));
        }
        for warning in &report.warnings {
            self.output.warn(&format!("Could not restore working tree: {}", warning));
        }
    }
}
