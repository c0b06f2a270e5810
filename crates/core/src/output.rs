// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured result of a completed invocation.

use serde::Serialize;
use std::time::Duration;

/// Outcome of a mechanically successful invocation.
///
/// "Mechanically" means the child ran to completion; the command itself may
/// still have failed, see [`ExecOutput::succeeded`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecOutput {
    pub exit_code: i32,
    /// Empty when output was not captured.
    pub stdout: String,
    /// Empty when output was not captured.
    pub stderr: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl ExecOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { exit_code, stdout: stdout.into(), stderr: stderr.into(), duration: Duration::ZERO }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Trimmed stdout followed by trimmed stderr, skipping empty parts.
    ///
    /// Git reports progress on stderr, so transcripts need both streams.
    pub fn combined(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
