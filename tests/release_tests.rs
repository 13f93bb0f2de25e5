//! End-to-end runs against scratch repositories with a bare remote.

#![cfg(unix)]

mod common;

use common::Fixture;
use predicates::prelude::*;

#[test]
fn test_release_pushes_branch_and_tag() {
    let fixture = Fixture::new("1.0.0");

    fixture
        .release_cmd("build.sh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Released v1.0.0 on 'releases'"));

    assert!(fixture.remote_tags().lines().any(|t| t == "v1.0.0"));
    let artifact = fixture.remote_git(&["show", "releases:dist/app.js"]);
    assert!(artifact.starts_with("built"));

    let manifest = fixture.remote_git(&["show", "v1.0.0:package.json"]);
    assert!(manifest.contains("\"version\": \"1.0.0\""));

    let message = fixture.remote_git(&["log", "-1", "--format=%s", "v1.0.0"]);
    assert_eq!(message.trim(), "Release v1.0.0");

    assert_eq!(fixture.current_branch(), "master");
    assert!(fixture.git(&["status", "--porcelain"]).trim().is_empty());
}

#[test]
fn test_second_run_is_skipped() {
    let fixture = Fixture::new("1.0.0");
    fixture.release_cmd("build.sh").assert().success();
    let head = fixture.remote_git(&["rev-parse", "releases"]);

    fixture
        .release_cmd("build.sh")
        .assert()
        .success()
        .stdout(predicate::str::contains("already released"));

    assert_eq!(fixture.remote_git(&["rev-parse", "releases"]), head);
}

#[test]
fn test_new_version_extends_release_history() {
    let fixture = Fixture::new("1.0.0");
    fixture.release_cmd("build.sh").assert().success();

    fixture.bump("1.1.0");
    fixture.write("scratch.txt", "untracked\n");
    fixture.release_cmd("build.sh").assert().success();

    let tags = fixture.remote_tags();
    assert!(tags.lines().any(|t| t == "v1.0.0"));
    assert!(tags.lines().any(|t| t == "v1.1.0"));

    // Merged, not rebased: the first release is an ancestor of the second.
    fixture.remote_git(&["merge-base", "--is-ancestor", "v1.0.0", "v1.1.0"]);

    let manifest = fixture.remote_git(&["show", "releases:package.json"]);
    assert!(manifest.contains("\"version\": \"1.1.0\""));

    // The untracked file was stashed for the run and restored afterwards.
    assert_eq!(fixture.read("scratch.txt"), "untracked\n");
    assert_eq!(fixture.current_branch(), "master");
}

#[test]
fn test_diff_gate_skips_when_version_unchanged() {
    let fixture = Fixture::new("1.0.0");
    fixture.write("notes.txt", "docs only\n");
    fixture.git(&["commit", "--quiet", "-am", "docs"]);

    fixture
        .release_cmd("build.sh")
        .args(["--gate", "diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version unchanged"));

    assert!(fixture.remote_tags().trim().is_empty());
}

#[test]
fn test_failed_build_restores_working_tree() {
    let fixture = Fixture::new("1.0.0");
    fixture.git(&["checkout", "--quiet", "-b", "feature"]);
    fixture.write("notes.txt", "work in progress\n");
    fixture.write("scratch.txt", "untracked\n");

    fixture
        .release_cmd("fail.sh")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(
            "Working tree restored to branch 'feature'",
        ))
        .stderr(predicate::str::contains("Release failed"));

    assert_eq!(fixture.current_branch(), "feature");
    assert_eq!(fixture.read("notes.txt"), "work in progress\n");
    assert_eq!(fixture.read("scratch.txt"), "untracked\n");
    assert!(fixture.git(&["stash", "list"]).trim().is_empty());
    assert!(fixture.git(&["tag", "--list"]).trim().is_empty());
    assert!(fixture.remote_tags().trim().is_empty());
}

#[test]
fn test_custom_branch_and_tag_prefix() {
    let fixture = Fixture::new("2.0.0");

    fixture
        .release_cmd("build.sh")
        .args(["--branch", "gh-pages", "--tag-prefix", "release-"])
        .assert()
        .success();

    assert!(fixture.remote_tags().lines().any(|t| t == "release-2.0.0"));
    fixture.remote_git(&["rev-parse", "--verify", "refs/heads/gh-pages"]);

    // The gate recognises versions under any prefix.
    fixture
        .release_cmd("build.sh")
        .args(["--branch", "gh-pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already released"));
}

#[test]
fn test_repeated_failure_leaves_same_state() {
    let fixture = Fixture::new("1.0.0");
    fixture.release_cmd("fail.sh").assert().code(1);
    let branches = fixture.git(&["branch", "--list"]);
    let head = fixture.git(&["rev-parse", "HEAD"]);
    let status = fixture.git(&["status", "--porcelain"]);

    fixture.release_cmd("fail.sh").assert().code(1);

    assert_eq!(fixture.git(&["branch", "--list"]), branches);
    assert_eq!(fixture.git(&["rev-parse", "HEAD"]), head);
    assert_eq!(fixture.git(&["status", "--porcelain"]), status);
    assert_eq!(fixture.current_branch(), "master");
}
