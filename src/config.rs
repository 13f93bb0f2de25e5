//! Release configuration.
//!
//! Built once from CLI flags and environment variables, validated, then passed
//! by reference to every stage. Nothing below `cli` reads the environment.

use crate::error::{CliError, Result};
use crate::redact::Redactor;
use crate::release::GatePolicy;
use crate::version::ManifestFormat;
use semver::Version;
use std::path::PathBuf;

/// Placeholder in the commit message template replaced by the version
pub const VERSION_PLACEHOLDER: &str = "%ver%";

/// Configuration for release operations
#[derive(Clone)]
pub struct ReleaseConfig {
    /// Repository working directory
    pub repo_path: PathBuf,
    /// Branch that receives artifacts and tags
    pub releases_branch: String,
    /// Branch whose manifest is the source of truth
    pub mainline_branch: String,
    /// Remote to query and push to
    pub remote: String,
    /// Token injected into the push URL
    pub token: Option<String>,
    /// Build output directory, relative to the repository root
    pub dist_dir: PathBuf,
    /// Commit message template containing `%ver%`
    pub commit_message: String,
    /// Script name passed to the script runner
    pub build_script: String,
    /// Command that runs the build script
    pub script_runner: String,
    /// Manifest path relative to the repository root
    pub manifest: String,
    /// Prefix prepended to the version for tag names
    pub tag_prefix: String,
    /// Idempotency policy
    pub gate: GatePolicy,
    /// Commit even when artifacts are byte-identical to the previous release
    pub allow_empty_commit: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            repo_path: PathBuf::from("."),
            releases_branch: "releases".to_string(),
            mainline_branch: "master".to_string(),
            remote: "origin".to_string(),
            token: None,
            dist_dir: PathBuf::from("dist"),
            commit_message: "Release v%ver%".to_string(),
            build_script: "build-dist".to_string(),
            script_runner: "npm run-script".to_string(),
            manifest: "package.json".to_string(),
            tag_prefix: "v".to_string(),
            gate: GatePolicy::Tags,
            allow_empty_commit: true,
        }
    }
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("repo_path", &self.repo_path)
            .field("releases_branch", &self.releases_branch)
            .field("mainline_branch", &self.mainline_branch)
            .field("remote", &self.remote)
            .field("token", &self.token.as_ref().map(|_| crate::redact::PLACEHOLDER))
            .field("dist_dir", &self.dist_dir)
            .field("commit_message", &self.commit_message)
            .field("build_script", &self.build_script)
            .field("script_runner", &self.script_runner)
            .field("manifest", &self.manifest)
            .field("tag_prefix", &self.tag_prefix)
            .field("gate", &self.gate)
            .field("allow_empty_commit", &self.allow_empty_commit)
            .finish()
    }
}

impl ReleaseConfig {
    /// Check the configuration for values that would break a run
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| -> Result<()> {
            Err(CliError::InvalidArguments { reason }.into())
        };

        for (name, value) in [
            ("release branch", &self.releases_branch),
            ("mainline branch", &self.mainline_branch),
            ("remote", &self.remote),
            ("manifest", &self.manifest),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("{} must not be empty", name));
            }
        }

        if self.releases_branch == self.mainline_branch {
            return invalid(format!(
                "release branch '{}' must differ from the mainline branch",
                self.releases_branch
            ));
        }

        if self.dist_dir.as_os_str().is_empty()
            || self.dist_dir.is_absolute()
            || self
                .dist_dir
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return invalid(format!(
                "output directory '{}' must be a relative path inside the repository",
                self.dist_dir.display()
            ));
        }

        if !self.commit_message.contains(VERSION_PLACEHOLDER) {
            return invalid(format!(
                "commit message template '{}' must contain {}",
                self.commit_message, VERSION_PLACEHOLDER
            ));
        }

        if self.build_command().is_empty() {
            return invalid("build command must not be empty".to_string());
        }

        if ManifestFormat::from_path(&self.manifest).is_none() {
            return invalid(format!(
                "unsupported manifest '{}': expected package.json or Cargo.toml",
                self.manifest
            ));
        }

        Ok(())
    }

    /// Full build command line: `<script-runner> <script>`
    pub fn build_command(&self) -> String {
        format!("{} {}", self.script_runner.trim(), self.build_script.trim())
            .trim()
            .to_string()
    }

    /// Manifest format inferred from the manifest file name
    pub fn manifest_format(&self) -> ManifestFormat {
        ManifestFormat::from_path(&self.manifest).unwrap_or(ManifestFormat::PackageJson)
    }

    /// Tag name for a release version
    pub fn tag_name(&self, version: &Version) -> String {
        format!("{}{}", self.tag_prefix, version)
    }

    /// Commit message with the first `%ver%` replaced by the version
    pub fn render_commit_message(&self, version: &Version) -> String {
        self.commit_message
            .replacen(VERSION_PLACEHOLDER, &version.to_string(), 1)
    }

    /// Redactor for the configured token
    pub fn redactor(&self) -> Redactor {
        Redactor::new(self.token.as_deref())
    }
}
