//! Idempotency gate: decide whether a version still needs releasing.

use regex::Regex;
use semver::Version;

/// How the gate decides that a version was already released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GatePolicy {
    /// Skip when the remote already has a tag ending in the version
    #[default]
    Tags,
    /// Skip when the version equals the one declared at mainline's parent commit
    Diff,
}

/// Why a run was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A remote tag already names this version
    AlreadyReleased,
    /// The manifest version did not change in the last mainline commit
    VersionUnchanged,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AlreadyReleased => f.write_str("already released"),
            SkipReason::VersionUnchanged => f.write_str("version unchanged"),
        }
    }
}

/// Gate outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Nothing to do
    Skip(SkipReason),
    /// Release this version
    Proceed(Version),
}

/// Build the pattern that finds `version` as the terminal part of a tag ref
///
/// The version must start a line or follow a character that is neither a digit
/// nor a dot, so `2.3` does not match `12.3` or `1.2.3`. A peeled `^{}` suffix
/// from `ls-remote` is accepted.
pub fn tag_pattern(version: &Version) -> Regex {
    let escaped = regex::escape(&version.to_string());
    let pattern = format!(r"(?m)(?:^|[^0-9.]){}(?:\^\{{\}})?$", escaped);
    Regex::new(&pattern).expect("escaped version pattern is valid")
}

/// Whether any line of an `ls-remote --tags` listing names `version`
pub fn is_tagged(version: &Version, remote_tags: &str) -> bool {
    tag_pattern(version).is_match(remote_tags)
}

/// Tag-based policy
pub fn decide_by_tags(version: Version, remote_tags: &str) -> GateDecision {
    if is_tagged(&version, remote_tags) {
        GateDecision::Skip(SkipReason::AlreadyReleased)
    } else {
        GateDecision::Proceed(version)
    }
}

/// Diff-based policy
pub fn decide_by_diff(version: Version, previous: Option<&Version>) -> GateDecision {
    match previous {
        Some(previous) if *previous == version => GateDecision::Skip(SkipReason::VersionUnchanged),
        _ => GateDecision::Proceed(version),
    }
}
