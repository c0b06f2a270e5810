// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas exec` through a pass-through escalation script.

use crate::prelude::*;

#[test]
fn captures_stdout() {
    let host = Host::new();
    host.runas().args(&["exec", "-u", USER, "--", "echo", "hello"]).passes().stdout_has("hello");
}

#[test]
fn json_output_reports_exit_code() {
    let host = Host::new();
    let run = host.runas().args(&["-o", "json", "exec", "-u", USER, "--", "echo", "hi"]).passes();
    let json = run.json();
    assert_eq!(json["exit_code"], 0);
    assert_eq!(json["stdout"], "hi\n");
}

#[test]
fn environment_reaches_the_command() {
    let host = Host::new();
    host.runas()
        .args(&["exec", "-u", USER, "-e", "RUNAS_SPEC_VALUE=xyz", "--", "printenv", "RUNAS_SPEC_VALUE"])
        .passes()
        .stdout_has("xyz");
}

#[test]
fn metacharacters_are_not_interpreted() {
    let host = Host::new();
    let marker = host.arg("pwned");
    let payload = format!("$(touch {}); `touch {}`", marker, marker);
    host.runas().args(&["exec", "-u", USER, "--", "echo", &payload]).passes().stdout_has("$(touch");
    assert!(!host.path("pwned").exists());
}

#[test]
fn failure_exits_one_without_leaking_output() {
    let host = Host::new();
    host.runas()
        .args(&["exec", "-u", USER, "--", "ls", "/definitely-missing-secret-dir"])
        .exits_with(1)
        .stderr_has("error:")
        .stderr_has("hint:")
        .stderr_lacks("definitely-missing-secret-dir");
}

#[test]
fn no_check_forwards_exit_code() {
    let host = Host::new();
    host.runas().args(&["exec", "-u", USER, "--no-check", "--", "sh", "-c", "exit 7"]).exits_with(7);
}

#[test]
fn timeout_exits_three() {
    let host = Host::new();
    let started = std::time::Instant::now();
    host.runas()
        .args(&["exec", "-u", USER, "-t", "0.3", "--", "sleep", "10"])
        .exits_with(3)
        .stderr_has("timed out");
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[test]
fn missing_command_exits_four() {
    let host = Host::new();
    host.runas().args(&["exec", "-u", USER, "--", "no-such-program-xyz"]).exits_with(4);
}

#[test]
fn missing_command_with_no_check_forwards_127() {
    let host = Host::new();
    host.runas().args(&["exec", "-u", USER, "--no-check", "--", "no-such-program-xyz"]).exits_with(127);
}

#[test]
fn missing_mechanism_exits_four() {
    let host = Host::new();
    host.runas()
        .env("RUNAS_SUDO", host.path("no-such-sudo"))
        .args(&["exec", "-u", USER, "--", "true"])
        .exits_with(4)
        .stderr_has("not found");
}
