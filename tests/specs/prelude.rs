// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for driving the `runas` binary.
//!
//! Every command runs against a [`Host`]: a temp directory holding a
//! pass-through escalation script, a config file and per-user homes. The
//! script drops sudo's own flags and execs the rest, so commands run as the
//! test user while still going through the full invocation path.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

pub const USER: &str = "alice";

/// Reports a missing command the way sudo does: its own message and exit 1.
const PASS_THROUGH: &str = r#"#!/bin/sh
[ "$1" = "-n" ] && shift
[ "$1" = "-u" ] && shift 2
if ! command -v "$1" >/dev/null 2>&1; then
    echo "sudo: $1: command not found" >&2
    exit 1
fi
exec "$@"
"#;

/// `runas` with no host; enough for help and usage checks.
pub fn cli() -> Cmd {
    Cmd::new()
}

pub struct Cmd {
    cmd: Command,
}

impl Cmd {
    fn new() -> Self {
        let mut cmd = Command::cargo_bin("runas").unwrap();
        for var in ["RUNAS_CONFIG", "RUNAS_SUDO", "RUNAS_HOME_ROOT", "RUNAS_TIMEOUT_MS", "RUNAS_LOG"] {
            cmd.env_remove(var);
        }
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Run {
        Run { output: self.cmd.output().unwrap() }
    }

    pub fn passes(self) -> Run {
        let run = self.run();
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    pub fn fails(self) -> Run {
        let run = self.run();
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }

    pub fn exits_with(self, code: i32) -> Run {
        let run = self.run();
        assert_eq!(run.output.status.code(), Some(code), "wrong exit code\n{}", run.describe());
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    fn describe(&self) -> String {
        format!("status: {:?}\nstdout:\n{}\nstderr:\n{}", self.output.status, self.stdout(), self.stderr())
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {:?}\n{}", needle, self.describe());
        self
    }

    pub fn stderr_lacks(self, needle: &str) -> Self {
        assert!(!self.stderr().contains(needle), "stderr has {:?}\n{}", needle, self.describe());
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }
}

pub struct Host {
    dir: TempDir,
}

impl Host {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-sudo");
        std::fs::write(&script, PASS_THROUGH).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("home").join(USER)).unwrap();
        Self { dir }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Absolute path under the host as a string argument.
    pub fn arg(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    pub fn runas(&self) -> Cmd {
        Cmd::new()
            .env("RUNAS_SUDO", self.path("fake-sudo"))
            .env("RUNAS_CONFIG", self.path("config.toml"))
            .env("RUNAS_HOME_ROOT", self.path("home"))
    }

    /// Non-bare repository with one commit on `main`, or `None` without git.
    pub fn git_repo(&self, rel: &str) -> Option<PathBuf> {
        if !git_available() {
            return None;
        }
        let repo = self.path(rel);
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::write(repo.join("README"), "hello\n").unwrap();
        git(&repo, &["init", "-q"]);
        git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&repo, &["add", "README"]);
        git(&repo, &["-c", "user.name=t", "-c", "user.email=t@example.com", "-c", "commit.gpgsign=false", "commit", "-q", "-m", "init"]);
        Some(repo)
    }
}

pub fn git_available() -> bool {
    std::process::Command::new("git").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git").arg("-C").arg(dir).args(args).status().unwrap();
    assert!(status.success(), "git {:?} failed", args);
}
