// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem helpers built on the privileged executor.
//!
//! Each helper fixes the argument vector for one operation so callers never
//! assemble privileged command lines themselves. Paths must be absolute,
//! which also guarantees they can never be read as an option.

use std::path::{Component, Path};
use std::time::Duration;

use runas_adapters::PrivilegedExecutor;
use runas_core::{ExecError, ExecErrorKind, Identity, Invocation, Target, Timeouts, EXIT_COMMAND_NOT_FOUND};

/// Highest mode accepted by [`FsOps::change_mode`] (setuid, setgid, sticky, rwx).
pub const MAX_MODE: u32 = 0o7777;

#[derive(Debug, Clone)]
pub struct FsOps<E> {
    executor: E,
    timeouts: Timeouts,
}

impl<E: PrivilegedExecutor> FsOps<E> {
    pub fn new(executor: E, timeouts: Timeouts) -> Self {
        Self { executor, timeouts }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// `test -e PATH` as `identity`. Absence is `Ok(false)`, never an error.
    pub async fn path_exists(&self, identity: &Identity, path: &Path) -> Result<bool, ExecError> {
        self.test(identity, "-e", path).await
    }

    /// `test -d PATH` as `identity`.
    pub async fn is_directory(&self, identity: &Identity, path: &Path) -> Result<bool, ExecError> {
        self.test(identity, "-d", path).await
    }

    /// `mkdir [-p] PATH` as `identity`. Succeeds if the directory already exists.
    pub async fn make_directory(
        &self,
        identity: &Identity,
        path: &Path,
        parents: bool,
    ) -> Result<(), ExecError> {
        let target = Target::User(identity.clone());
        let path_arg = path_arg(&target, "mkdir", path)?;
        let mut argv = vec!["mkdir"];
        if parents {
            argv.push("-p");
        }
        argv.push(&path_arg);

        let invocation =
            Invocation::as_user(identity.clone(), argv, self.timeouts.mkdir).build()?;
        match self.executor.execute(invocation).await {
            Ok(_) => Ok(()),
            // plain mkdir fails on an existing directory
            Err(e) if !parents && matches!(e.kind, ExecErrorKind::NonZeroExit(_)) => {
                if self.is_directory(identity, path).await? {
                    Ok(())
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// `chown OWNER[:GROUP] PATH` / `chown :GROUP PATH` with elevated rights.
    pub async fn change_owner(
        &self,
        path: &Path,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<(), ExecError> {
        let spec = match (owner, group) {
            (Some(owner), Some(group)) => {
                account_arg("chown", owner)?;
                account_arg("chown", group)?;
                format!("{}:{}", owner, group)
            }
            (Some(owner), None) => {
                account_arg("chown", owner)?;
                owner.to_string()
            }
            (None, Some(group)) => {
                account_arg("chown", group)?;
                format!(":{}", group)
            }
            (None, None) => {
                return Err(invalid("chown", "an owner or a group is required"));
            }
        };
        let path = path_arg(&Target::Superuser, "chown", path)?;
        self.elevated(["chown", spec.as_str(), path.as_str()]).await
    }

    /// `chmod OCTAL PATH` with elevated rights.
    pub async fn change_mode(&self, path: &Path, mode: u32) -> Result<(), ExecError> {
        if mode > MAX_MODE {
            return Err(invalid("chmod", format!("mode {:o} exceeds {:o}", mode, MAX_MODE)));
        }
        let mode = format!("{:o}", mode);
        let path = path_arg(&Target::Superuser, "chmod", path)?;
        self.elevated(["chmod", mode.as_str(), path.as_str()]).await
    }

    /// `chgrp GROUP PATH` with elevated rights.
    pub async fn change_group(&self, path: &Path, group: &str) -> Result<(), ExecError> {
        account_arg("chgrp", group)?;
        let path = path_arg(&Target::Superuser, "chgrp", path)?;
        self.elevated(["chgrp", group, path.as_str()]).await
    }

    /// `rm -rf -- PATH` as `identity`. An absent path is not an error.
    pub async fn remove_recursive(
        &self,
        identity: &Identity,
        path: &Path,
        timeout: Option<Duration>,
    ) -> Result<(), ExecError> {
        let target = Target::User(identity.clone());
        let path_arg = path_arg(&target, "rm", path)?;
        if path.parent().is_none() {
            return Err(ExecError::invalid(&target, &["rm".to_string()], "refusing to remove /"));
        }
        let timeout = timeout.unwrap_or(self.timeouts.remove);
        let invocation =
            Invocation::as_user(identity.clone(), ["rm", "-rf", "--", path_arg.as_str()], timeout)
                .build()?;
        self.executor.execute(invocation).await?;
        tracing::debug!(user = %identity, "removed directory tree");
        Ok(())
    }

    async fn test(&self, identity: &Identity, flag: &str, path: &Path) -> Result<bool, ExecError> {
        let target = Target::User(identity.clone());
        let path = path_arg(&target, "test", path)?;
        let invocation =
            Invocation::as_user(identity.clone(), ["test", flag, path.as_str()], self.timeouts.path_check)
                .raise_on_failure(false)
                .build()?;
        let output = self.executor.execute(invocation.clone()).await?;
        match output.exit_code {
            0 => Ok(true),
            // `test` is silent when false; sudo also exits 1 but always says why
            1 if output.stderr.trim().is_empty() => Ok(false),
            EXIT_COMMAND_NOT_FOUND => Err(invocation.error(ExecErrorKind::NotFound).with_stderr(output.stderr)),
            code => Err(invocation.error(ExecErrorKind::NonZeroExit(code)).with_stderr(output.stderr)),
        }
    }

    async fn elevated<const N: usize>(&self, argv: [&str; N]) -> Result<(), ExecError> {
        let invocation = Invocation::elevated(argv, self.timeouts.ownership).build()?;
        self.executor.execute(invocation).await?;
        Ok(())
    }
}

fn invalid(program: &str, reason: impl Into<String>) -> ExecError {
    ExecError::invalid(&Target::Superuser, &[program.to_string()], reason)
}

/// Validate an absolute, UTF-8 path without `..` and return it as an argument.
fn path_arg(target: &Target, program: &str, path: &Path) -> Result<String, ExecError> {
    let reject = |reason: &str| ExecError::invalid(target, &[program.to_string()], reason);
    if !path.is_absolute() {
        return Err(reject("path must be absolute"));
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(reject("path must not contain `..`"));
    }
    path.to_str().map(str::to_string).ok_or_else(|| reject("path must be valid UTF-8"))
}

/// Owner and group names end up in a `chown` spec or as a `chgrp` operand.
fn account_arg(program: &str, name: &str) -> Result<(), ExecError> {
    if name.is_empty() || name.starts_with('-') || name.contains(':') {
        return Err(invalid(program, format!("invalid owner or group name {:?}", name)));
    }
    Ok(())
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
