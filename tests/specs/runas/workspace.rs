// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace lifecycle and git actions with a local source repository.
//!
//! Specs that need git return early when it is not installed.

use crate::prelude::*;

fn location(host: &Host) -> Vec<String> {
    vec!["-u".into(), USER.into(), "--path".into(), host.arg("home/alice/workspace/acme/site")]
}

fn with<'a>(head: &[&'a str], tail: &'a [String]) -> Vec<&'a str> {
    head.iter().copied().chain(tail.iter().map(String::as_str)).collect()
}

#[test]
fn path_resolves_tenant_and_project_under_home() {
    let host = Host::new();
    host.runas()
        .args(&["workspace", "path", "-u", USER, "--tenant", "Acme Corp", "--project", "Web Site"])
        .passes()
        .stdout_has(&host.arg("home/alice/workspace/"));
}

#[test]
fn status_of_missing_workspace_is_absent() {
    let host = Host::new();
    let loc = location(&host);
    host.runas().args(&with(&["workspace", "status"], &loc)).passes().stdout_has("absent");
}

#[test]
fn init_clones_and_reports_valid() {
    let host = Host::new();
    let Some(repo) = host.git_repo("source") else { return };
    let url = repo.to_string_lossy().into_owned();
    let loc = location(&host);

    host.runas().args(&with(&["workspace", "init", "--url", &url, "--branch", "main"], &loc)).passes();
    assert!(host.path("home/alice/workspace/acme/site/.git").is_dir());
    assert!(host.path("home/alice/workspace/acme/site/README").is_file());

    host.runas().args(&with(&["workspace", "status"], &loc)).passes().stdout_has("valid");

    // a second init leaves the workspace alone
    host.runas()
        .args(&with(&["workspace", "init", "--url", &url], &loc))
        .exits_with(1)
        .stderr_has("already initialized");
    assert!(host.path("home/alice/workspace/acme/site/README").is_file());

    host.runas().args(&with(&["workspace", "destroy"], &loc)).passes();
    assert!(!host.path("home/alice/workspace/acme/site").exists());
}

#[test]
fn failed_clone_removes_partial_directory() {
    let host = Host::new();
    if !git_available() {
        return;
    }
    let missing = host.arg("no-such-secret-repo");
    let loc = location(&host);

    host.runas()
        .args(&with(&["workspace", "init", "--url", &missing], &loc))
        .exits_with(1)
        .stderr_has("partial directory removed")
        .stderr_lacks("no-such-secret-repo");
    assert!(!host.path("home/alice/workspace/acme/site").exists());
}

#[test]
fn git_status_and_pull_inside_workspace() {
    let host = Host::new();
    let Some(repo) = host.git_repo("source") else { return };
    let url = repo.to_string_lossy().into_owned();
    let loc = location(&host);
    host.runas().args(&with(&["workspace", "init", "--url", &url], &loc)).passes();

    host.runas().args(&with(&["git", "status"], &loc)).passes().stdout_has("## main");

    std::fs::write(host.path("home/alice/workspace/acme/site/scratch.txt"), "x").unwrap();
    host.runas()
        .args(&with(&["git", "pull", "--clean"], &loc))
        .passes()
        .stdout_has("Executed: git reset --hard HEAD")
        .stdout_has("Pulling origin/main");
    assert!(!host.path("home/alice/workspace/acme/site/scratch.txt").exists());
}

#[test]
fn git_outside_a_workspace_fails() {
    let host = Host::new();
    let loc = location(&host);
    host.runas().args(&with(&["git", "status"], &loc)).exits_with(1).stderr_has("hint:");
}
