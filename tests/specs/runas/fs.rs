// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas fs` helpers against a real temp directory.

use crate::prelude::*;

#[test]
fn exists_reports_true_and_false() {
    let host = Host::new();
    let home = host.arg("home/alice");
    host.runas().args(&["fs", "exists", "-u", USER, &home]).passes().stdout_has("true");

    let missing = host.arg("home/alice/missing");
    let run = host.runas().args(&["-o", "json", "fs", "exists", "-u", USER, &missing]).passes();
    assert_eq!(run.json()["exists"], false);
}

#[test]
fn mkdir_creates_parents_and_rm_removes_tree() {
    let host = Host::new();
    let nested = host.arg("home/alice/a/b/c");
    host.runas().args(&["fs", "mkdir", "-u", USER, &nested]).passes();
    assert!(host.path("home/alice/a/b/c").is_dir());

    // second call on an existing directory is still a success
    host.runas().args(&["fs", "mkdir", "-u", USER, "--no-parents", &nested]).passes();

    let top = host.arg("home/alice/a");
    host.runas().args(&["fs", "rm", "-u", USER, &top]).passes().stdout_has("Removed");
    assert!(!host.path("home/alice/a").exists());
}

#[test]
fn mkdir_without_parents_fails_on_missing_parent() {
    let host = Host::new();
    let nested = host.arg("home/alice/x/y");
    host.runas().args(&["fs", "mkdir", "-u", USER, "--no-parents", &nested]).exits_with(1);
    assert!(!host.path("home/alice/x").exists());
}

#[test]
fn rm_of_root_is_refused() {
    let host = Host::new();
    host.runas().args(&["fs", "rm", "-u", USER, "/"]).exits_with(2).stderr_has("invalid invocation");
}

#[test]
fn relative_paths_are_refused() {
    let host = Host::new();
    host.runas().args(&["fs", "exists", "-u", USER, "relative/path"]).exits_with(2);
}

#[test]
fn chmod_applies_octal_mode() {
    use std::os::unix::fs::PermissionsExt;

    let host = Host::new();
    let dir = host.arg("home/alice");
    host.runas().args(&["fs", "chmod", &dir, "750"]).passes();
    let mode = std::fs::metadata(host.path("home/alice")).unwrap().permissions().mode();
    assert_eq!(mode & 0o7777, 0o750);
}
