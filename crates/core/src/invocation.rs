// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command invocations: what to run, as whom, and for how long.
//!
//! An [`Invocation`] is immutable once built. All validation happens in
//! [`InvocationBuilder::build`], so executors can assume a well-formed request.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ExecError, ExecErrorKind};
use crate::identity::{Identity, Target};
use crate::output::ExecOutput;

/// Exit status used by `env` and POSIX shells when the command is missing.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// A single privileged command request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    target: Target,
    argv: Vec<String>,
    timeout: Duration,
    env: BTreeMap<String, String>,
    capture: bool,
    raise_on_failure: bool,
}

impl Invocation {
    /// Start building an invocation that runs as `identity`.
    pub fn as_user<I, S>(identity: Identity, argv: I, timeout: Duration) -> InvocationBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InvocationBuilder::new(Target::User(identity), argv, timeout)
    }

    /// Start building an invocation that runs with the invoking process's
    /// own elevated rights.
    pub fn elevated<I, S>(argv: I, timeout: Duration) -> InvocationBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InvocationBuilder::new(Target::Superuser, argv, timeout)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The executable name (argv\[0\]).
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    pub fn raise_on_failure(&self) -> bool {
        self.raise_on_failure
    }

    /// Build an error for this invocation.
    pub fn error(&self, kind: ExecErrorKind) -> ExecError {
        ExecError::new(&self.target, &self.argv, kind)
    }

    /// Apply the raise-vs-return contract to a completed run.
    ///
    /// Without `raise_on_failure` every completed run is returned as-is,
    /// whatever its exit status. With it, exit 127 becomes
    /// [`ExecErrorKind::NotFound`] and any other non-zero exit
    /// [`ExecErrorKind::NonZeroExit`].
    pub fn settle(&self, output: ExecOutput) -> Result<ExecOutput, ExecError> {
        if !self.raise_on_failure || output.succeeded() {
            return Ok(output);
        }
        let kind = match output.exit_code {
            EXIT_COMMAND_NOT_FOUND => ExecErrorKind::NotFound,
            code => ExecErrorKind::NonZeroExit(code),
        };
        Err(self.error(kind).with_stderr(output.stderr))
    }
}

/// Builder for [`Invocation`].
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    target: Target,
    argv: Vec<String>,
    timeout: Duration,
    env: BTreeMap<String, String>,
    capture: bool,
    raise_on_failure: bool,
}

impl InvocationBuilder {
    fn new<I, S>(target: Target, argv: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target,
            argv: argv.into_iter().map(Into::into).collect(),
            timeout,
            env: BTreeMap::new(),
            capture: true,
            raise_on_failure: true,
        }
    }

    /// Add one environment variable to the overlay.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Merge a map into the overlay; later entries win.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env.extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }

    pub fn build(self) -> Result<Invocation, ExecError> {
        let invalid = |reason: String| ExecError::invalid(&self.target, &self.argv, reason);

        let Some(program) = self.argv.first() else {
            return Err(invalid("argument vector is empty".to_string()));
        };
        if program.is_empty() {
            return Err(invalid("program name is empty".to_string()));
        }
        // `env` would read `A=B` as an assignment and `-x` as an option
        if program.chars().any(char::is_whitespace) || program.contains('=') || program.starts_with('-')
        {
            return Err(invalid("program name must be a bare executable name".to_string()));
        }
        if self.argv.iter().any(|arg| arg.contains('\0')) {
            return Err(invalid("arguments must not contain NUL".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be positive".to_string()));
        }
        for (key, value) in &self.env {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(invalid(format!("invalid environment variable name {:?}", key)));
            }
            if value.contains('\0') {
                return Err(invalid(format!("environment variable {} contains NUL", key)));
            }
        }

        Ok(Invocation {
            target: self.target,
            argv: self.argv,
            timeout: self.timeout,
            env: self.env,
            capture: self.capture,
            raise_on_failure: self.raise_on_failure,
        })
    }
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
