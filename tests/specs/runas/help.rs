// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and usage output.

use crate::prelude::*;

#[test]
fn no_args_is_a_usage_error() {
    cli().exits_with(2).stderr_has("Usage:");
}

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("exec")
        .stdout_has("fs")
        .stdout_has("workspace")
        .stdout_has("git");
}

#[test]
fn fs_help_lists_helpers() {
    cli()
        .args(&["fs", "--help"])
        .passes()
        .stdout_has("exists")
        .stdout_has("mkdir")
        .stdout_has("chown")
        .stdout_has("chmod");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn workspace_requires_a_location() {
    cli().args(&["workspace", "status", "--user", USER]).exits_with(2);
}
