// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination. Library errors
//! are classified by [`classify`] so timeouts and missing binaries get their
//! own codes.

use std::fmt;

use runas_adapters::UserLookupError;
use runas_core::{ConfigError, ExecError, ExecErrorKind};
use runas_engine::{GitError, WorkspaceError};

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_TIMEOUT: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), hint: None }
    }

    /// Exit with `code` without printing anything.
    pub fn silent(code: i32) -> Self {
        Self::new(code, String::new())
    }

    fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

fn exec_code(err: &ExecError) -> i32 {
    match err.kind {
        ExecErrorKind::Timeout(_) => EXIT_TIMEOUT,
        ExecErrorKind::NotFound => EXIT_NOT_FOUND,
        ExecErrorKind::Invalid(_) => EXIT_USAGE,
        ExecErrorKind::NonZeroExit(_) | ExecErrorKind::Spawn(_) => EXIT_FAILURE,
    }
}

/// Map any command failure to an exit code, message and hint.
///
/// Library errors already embed their cause in `Display`, which never
/// includes argument vectors or captured stderr.
pub fn classify(err: &anyhow::Error) -> ExitError {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return ExitError { code: exit.code, message: exit.message.clone(), hint: exit.hint };
    }
    let message = err.to_string();
    if let Some(e) = err.downcast_ref::<ExecError>() {
        return ExitError::new(exec_code(e), message).with_hint(e.hint());
    }
    if let Some(e) = err.downcast_ref::<WorkspaceError>() {
        let code = e.exec_error().map(exec_code).unwrap_or(EXIT_FAILURE);
        return ExitError::new(code, message).with_hint(e.hint());
    }
    if let Some(e) = err.downcast_ref::<GitError>() {
        let code = match e {
            GitError::Exec(exec) => exec_code(exec),
            GitError::Invalid(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        };
        return ExitError::new(code, message).with_hint(e.hint());
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return ExitError::new(EXIT_FAILURE, message).with_hint(e.hint());
    }
    if let Some(e) = err.downcast_ref::<UserLookupError>() {
        return ExitError::new(EXIT_FAILURE, message).with_hint(e.hint());
    }
    ExitError::new(EXIT_FAILURE, format!("{:#}", err))
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
