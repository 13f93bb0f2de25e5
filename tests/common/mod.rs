//! Scratch repositories for end-to-end release tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BUILD_SCRIPT: &str = "mkdir -p dist\necho built > dist/app.js\n";
pub const FAILING_SCRIPT: &str = "echo 'compile error' >&2\nexit 1\n";

/// A working clone with a bare `origin`
pub struct Fixture {
    _temp: TempDir,
    pub remote: PathBuf,
    pub work: PathBuf,
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn manifest(version: &str) -> String {
    format!("{{\n  \"name\": \"widget\",\n  \"version\": \"{}\"\n}}\n", version)
}

impl Fixture {
    /// Repository on `master` declaring `version`, pushed to its remote
    pub fn new(version: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let remote = temp.path().join("remote.git");
        let work = temp.path().join("work");
        std::fs::create_dir_all(&remote).expect("mkdir remote");
        std::fs::create_dir_all(&work).expect("mkdir work");

        git(&remote, &["init", "--quiet", "--bare"]);
        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        git(&work, &["config", "user.name", "Release Bot"]);
        git(&work, &["config", "user.email", "release@example.com"]);
        git(&work, &["config", "commit.gpgsign", "false"]);
        git(&work, &["config", "tag.gpgsign", "false"]);

        let fixture = Self {
            _temp: temp,
            remote,
            work,
        };
        fixture.write("package.json", &manifest(version));
        fixture.write(".gitignore", "dist/\n");
        fixture.write("build.sh", BUILD_SCRIPT);
        fixture.write("fail.sh", FAILING_SCRIPT);
        fixture.write("notes.txt", "original\n");
        fixture.git(&["add", "."]);
        fixture.git(&["commit", "--quiet", "-m", "initial"]);

        let remote_path = fixture.remote.to_string_lossy().into_owned();
        fixture.git(&["remote", "add", "origin", &remote_path]);
        fixture.git(&["push", "--quiet", "origin", "master"]);
        fixture
    }

    pub fn write(&self, path: &str, content: &str) {
        std::fs::write(self.work.join(path), content).expect("write fixture file");
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.work.join(path)).expect("read fixture file")
    }

    pub fn git(&self, args: &[&str]) -> String {
        git(&self.work, args)
    }

    pub fn remote_git(&self, args: &[&str]) -> String {
        git(&self.remote, args)
    }

    /// Commit a new manifest version on master and push it
    pub fn bump(&self, version: &str) {
        self.git(&["checkout", "--quiet", "master"]);
        self.write("package.json", &manifest(version));
        self.git(&["commit", "--quiet", "-am", &format!("bump to {}", version)]);
        self.git(&["push", "--quiet", "origin", "master"]);
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).trim().to_string()
    }

    pub fn remote_tags(&self) -> String {
        self.remote_git(&["tag", "--list"])
    }

    /// The release binary pointed at this repository with a shell build
    pub fn release_cmd(&self, script: &str) -> Command {
        let mut cmd = Command::cargo_bin("branch-release").expect("binary exists");
        for var in [
            "GH_TOKEN",
            "RUST_LOG",
            "BR_RELEASES_BRANCH",
            "BR_DIST_DIR",
            "BR_COMMIT_MESSAGE",
            "BR_BUILD_SCRIPT",
            "BR_SCRIPT_RUNNER",
            "BR_MAINLINE_BRANCH",
            "BR_REMOTE",
            "BR_MANIFEST",
            "BR_TAG_PREFIX",
            "BR_GATE",
            "BR_NO_EMPTY_COMMIT",
            "BR_REPO",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("GIT_TERMINAL_PROMPT", "0")
            .arg("--repo")
            .arg(&self.work)
            .args(["--script-runner", "sh", "--script", script]);
        cmd
    }
}
