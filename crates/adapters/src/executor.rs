// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Privileged command executor.
//!
//! Runs an [`Invocation`] through the configured escalation mechanism:
//!
//! ```text
//! sudo -n [-u USER] env [K=V ...] ARGV...
//! ```
//!
//! The child is spawned directly with an argument vector. Nothing is ever
//! passed through a shell, so metacharacters in paths or names stay literal.

use std::collections::BTreeMap;

use async_trait::async_trait;
use runas_core::{ExecError, ExecErrorKind, ExecOutput, ExecutorConfig, Invocation, Target};
use tokio::process::Command;

use crate::subprocess::{run_with_timeout, RunError};

/// Executes invocations as other identities.
///
/// One child per call, no retries. Implementations must honor the
/// invocation's timeout and its raise-vs-return contract
/// ([`Invocation::settle`]).
#[async_trait]
pub trait PrivilegedExecutor: Clone + Send + Sync + 'static {
    async fn execute(&self, invocation: Invocation) -> Result<ExecOutput, ExecError>;
}

/// Executor backed by `sudo` (or whatever [`ExecutorConfig::program`] names).
#[derive(Debug, Clone)]
pub struct SudoExecutor {
    config: ExecutorConfig,
}

impl SudoExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

#[async_trait]
impl PrivilegedExecutor for SudoExecutor {
    async fn execute(&self, invocation: Invocation) -> Result<ExecOutput, ExecError> {
        let line = command_line(&self.config, &invocation);
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&line[1..]);

        tracing::debug!(
            target_user = %invocation.target(),
            program = invocation.program(),
            args = invocation.argv().len() - 1,
            env_keys = ?invocation.env().keys().collect::<Vec<_>>(),
            timeout = ?invocation.timeout(),
            "running privileged command"
        );

        let raw = run_with_timeout(cmd, invocation.timeout(), invocation.capture(), invocation.program())
            .await
            .map_err(|e| match e {
                RunError::Timeout { timeout, .. } => invocation.error(ExecErrorKind::Timeout(timeout)),
                RunError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    invocation.error(ExecErrorKind::NotFound)
                }
                RunError::Spawn { source, .. } | RunError::Wait { source, .. } => {
                    invocation.error(ExecErrorKind::Spawn(source.to_string()))
                }
            })?;

        let mut output = ExecOutput::new(
            raw.exit_code,
            String::from_utf8_lossy(&raw.stdout),
            String::from_utf8_lossy(&raw.stderr),
        );
        output.duration = raw.duration;

        tracing::debug!(
            target_user = %invocation.target(),
            program = invocation.program(),
            exit_code = output.exit_code,
            elapsed_ms = output.duration.as_millis() as u64,
            "privileged command finished"
        );

        invocation.settle(output)
    }
}

/// Build the full command line for an invocation (element 0 is the mechanism).
///
/// The target always runs under `env_program`, followed by the overlay
/// (`base_env` with the invocation's own variables on top). sudo reports a
/// missing target with its own exit 1; `env` reports it with 127, which
/// [`Invocation::settle`] maps to not-found.
pub fn command_line(config: &ExecutorConfig, invocation: &Invocation) -> Vec<String> {
    let mut line = vec![config.program.clone(), config.non_interactive_flag.clone()];

    if let Target::User(identity) = invocation.target() {
        line.push(config.user_flag.clone());
        line.push(identity.as_str().to_string());
    }

    let mut env: BTreeMap<&str, &str> =
        config.base_env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    env.extend(invocation.env().iter().map(|(k, v)| (k.as_str(), v.as_str())));
    line.push(config.env_program.clone());
    line.extend(env.into_iter().map(|(k, v)| format!("{}={}", k, v)));

    line.extend(invocation.argv().iter().cloned());
    line
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
