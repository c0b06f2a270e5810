// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use runas_core::{ExecErrorKind, Identity, Target};

fn clone_failure() -> ExecError {
    let target = Target::User(Identity::new("alice").unwrap());
    let argv = vec!["git".to_string(), "clone".to_string(), "https://token@example.com/r".to_string()];
    ExecError::new(&target, &argv, ExecErrorKind::NonZeroExit(128))
        .with_stderr("fatal: could not read Username for https://token@example.com")
}

fn init_failed(cleanup: Cleanup) -> WorkspaceError {
    WorkspaceError::InitFailed {
        identity: "alice".into(),
        path: "/home/alice/workspace/acme/proj".into(),
        source: clone_failure(),
        cleanup,
    }
}

#[test]
fn init_failure_keeps_original_cause() {
    let err = init_failed(Cleanup::Removed);
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), clone_failure().to_string());
    assert_eq!(err.exec_error().map(|e| &e.kind), Some(&ExecErrorKind::NonZeroExit(128)));
}

#[test]
fn init_failure_message_omits_arguments_and_stderr() {
    let msg = init_failed(Cleanup::Failed("rm exited with code 1".into())).to_string();
    assert!(msg.contains("alice"));
    assert!(msg.contains("cleanup also failed"));
    assert!(!msg.contains("token"));
    assert!(!msg.contains("/home/alice"));
}

#[yare::parameterized(
    not_needed = { Cleanup::NotNeeded, true },
    removed    = { Cleanup::Removed, true },
    failed     = { Cleanup::Failed("boom".into()), false },
)]
fn cleanup_is_clean(cleanup: Cleanup, clean: bool) {
    assert_eq!(cleanup.is_clean(), clean);
}

#[test]
fn failed_cleanup_has_its_own_hint() {
    let failed = init_failed(Cleanup::Failed("boom".into()));
    let removed = init_failed(Cleanup::Removed);
    assert_ne!(failed.hint(), removed.hint());
    assert_eq!(removed.hint(), clone_failure().hint());
}

#[test]
fn git_errors_have_hints() {
    assert!(!GitError::NoRemote.hint().is_empty());
    assert!(!GitError::NotAWorkspace { path: "/w".into() }.hint().is_empty());
    assert_eq!(GitError::Exec(clone_failure()).hint(), clone_failure().hint());
}
