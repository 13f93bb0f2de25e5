//! Command line argument parsing.
//!
//! Every option can also come from the environment; an explicit flag wins.

use crate::config::ReleaseConfig;
use crate::release::GatePolicy;
use clap::Parser;
use clap::builder::FalseyValueParser;
use std::path::PathBuf;

/// Publish build output to a release branch and tag it with the manifest version
#[derive(Parser, Debug)]
#[command(
    name = "branch-release",
    version,
    about = "Publish build artifacts to a release branch and tag",
    long_about = "Builds the project, commits the build output to a dedicated release branch,
tags the commit with the version declared in the manifest and pushes both.

Runs are idempotent: a version that already has a remote tag is skipped.

Usage:
  branch-release
  branch-release --branch dist --script build
  GH_TOKEN=... branch-release --mainline main"
)]
pub struct Args {
    /// Branch that receives the build output
    #[arg(short = 'b', long = "branch", env = "BR_RELEASES_BRANCH", default_value = "releases")]
    pub releases_branch: String,

    /// Token injected into the push URL
    #[arg(short = 't', long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Build output directory, relative to the repository root
    #[arg(short = 'd', long, env = "BR_DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Commit message; %ver% is replaced by the version
    #[arg(short = 'm', long, env = "BR_COMMIT_MESSAGE", default_value = "Release v%ver%")]
    pub message: String,

    /// Build script name passed to the script runner
    #[arg(short = 's', long, env = "BR_BUILD_SCRIPT", default_value = "build-dist")]
    pub script: String,

    /// Command that runs the build script
    #[arg(long, env = "BR_SCRIPT_RUNNER", default_value = "npm run-script")]
    pub script_runner: String,

    /// Branch whose manifest declares the version
    #[arg(long, env = "BR_MAINLINE_BRANCH", default_value = "master")]
    pub mainline: String,

    /// Remote to query and push to
    #[arg(long, env = "BR_REMOTE", default_value = "origin")]
    pub remote: String,

    /// Manifest declaring the version (package.json or Cargo.toml)
    #[arg(long, env = "BR_MANIFEST", default_value = "package.json")]
    pub manifest: String,

    /// Prefix for tag names
    #[arg(long, env = "BR_TAG_PREFIX", default_value = "v")]
    pub tag_prefix: String,

    /// How to detect an already released version
    #[arg(long, env = "BR_GATE", value_enum, default_value_t = GatePolicy::Tags)]
    pub gate: GatePolicy,

    /// Fail instead of committing when the build output is unchanged
    #[arg(long, env = "BR_NO_EMPTY_COMMIT", value_parser = FalseyValueParser::new())]
    pub no_empty_commit: bool,

    /// Repository to release
    #[arg(short = 'C', long = "repo", env = "BR_REPO", default_value = ".")]
    pub repo_path: PathBuf,

    /// Show progress details
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Build the release configuration
    pub fn to_config(&self) -> ReleaseConfig {
        ReleaseConfig {
            repo_path: self.repo_path.clone(),
            releases_branch: self.releases_branch.clone(),
            mainline_branch: self.mainline.clone(),
            remote: self.remote.clone(),
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            dist_dir: self.dist_dir.clone(),
            commit_message: self.message.clone(),
            build_script: self.script.clone(),
            script_runner: self.script_runner.clone(),
            manifest: self.manifest.clone(),
            tag_prefix: self.tag_prefix.clone(),
            gate: self.gate,
            allow_empty_commit: !self.no_empty_commit,
        }
    }
}
