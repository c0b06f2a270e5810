// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution failure type shared by the executor and every helper built on it.

use std::time::Duration;

use crate::identity::Target;

/// Why an invocation could not be completed as requested.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecErrorKind {
    /// The child did not finish within its timeout and was terminated.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The escalation mechanism or the target executable is missing.
    #[error("command not found")]
    NotFound,

    /// The command ran and reported failure while `raise_on_failure` was set.
    #[error("exited with code {0}")]
    NonZeroExit(i32),

    /// The child could not be spawned or waited on for another reason.
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// The invocation was rejected before anything was spawned.
    #[error("invalid invocation: {0}")]
    Invalid(String),
}

/// A failed privileged invocation.
///
/// `argv` is kept for diagnostics only. The `Display` output names the program
/// and target but never the arguments or captured stderr, which may carry
/// paths or credentials.
#[derive(Debug, Clone, thiserror::Error)]
#[error("`{program}` as {target} {kind}")]
pub struct ExecError {
    pub target: String,
    pub program: String,
    pub argv: Vec<String>,
    pub kind: ExecErrorKind,
    pub stderr: String,
}

impl ExecError {
    pub fn new(target: &Target, argv: &[String], kind: ExecErrorKind) -> Self {
        Self {
            target: target.to_string(),
            program: argv.first().cloned().unwrap_or_default(),
            argv: argv.to_vec(),
            kind,
            stderr: String::new(),
        }
    }

    /// Shorthand for an [`ExecErrorKind::Invalid`] failure.
    pub fn invalid(target: &Target, argv: &[String], reason: impl Into<String>) -> Self {
        Self::new(target, argv, ExecErrorKind::Invalid(reason.into()))
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ExecErrorKind::Timeout(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ExecErrorKind::NotFound
    }

    /// Only timeouts are safe to retry blindly (and only for idempotent commands).
    pub fn is_retryable(&self) -> bool {
        self.is_timeout()
    }

    /// Exit code of the command, when it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self.kind {
            ExecErrorKind::NonZeroExit(code) => Some(code),
            _ => None,
        }
    }

    /// Operator-facing remediation hint. Contains no paths or stderr.
    pub fn hint(&self) -> &'static str {
        match self.kind {
            ExecErrorKind::Timeout(_) => {
                "the command did not finish in time; retry, or raise the timeout in the runas config"
            }
            ExecErrorKind::NotFound => {
                "check that sudo and the target command are installed and on PATH"
            }
            ExecErrorKind::NonZeroExit(_) => {
                "check the sudoers rules for this identity, directory permissions, and git safe.directory settings"
            }
            ExecErrorKind::Spawn(_) => "check that the service may execute the escalation mechanism",
            ExecErrorKind::Invalid(_) => "the request was malformed; nothing was executed",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
