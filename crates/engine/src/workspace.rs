// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace lifecycle: locate, check, initialize by clone, destroy.
//!
//! ```text
//! ABSENT --(mkdir + clone)--> VALID
//! ABSENT --(mkdir, clone fails)--> PARTIAL --(rm -rf)--> ABSENT
//! VALID  --(destroy)--> ABSENT
//! ```
//!
//! Nothing is persisted; state is recomputed from the filesystem, as the
//! workspace owner, on every check.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use runas_adapters::{home_for, PrivilegedExecutor};
use runas_core::{
    workspace_path, Config, ExecError, GitConfig, Identity, Invocation, Target, WorkspaceConfig,
    WorkspaceStatus,
};

use crate::error::{Cleanup, WorkspaceError};
use crate::fs::FsOps;
use crate::locks::PathLocks;

/// Where to clone from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSource {
    pub url: String,
    pub branch: String,
}

impl CloneSource {
    pub fn new(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self { url: url.into(), branch: branch.into() }
    }
}

#[derive(Clone)]
pub struct WorkspaceManager<E> {
    fs: FsOps<E>,
    workspace: WorkspaceConfig,
    git: GitConfig,
    locks: PathLocks,
}

impl<E: PrivilegedExecutor> WorkspaceManager<E> {
    pub fn new(executor: E, config: &Config) -> Self {
        Self {
            fs: FsOps::new(executor, config.executor.timeouts.clone()),
            workspace: config.workspace.clone(),
            git: config.git.clone(),
            locks: PathLocks::new(),
        }
    }

    pub fn fs(&self) -> &FsOps<E> {
        &self.fs
    }

    /// `<home>/<dir>/<tenant slug>/<project slug>` for `identity`.
    pub async fn locate(
        &self,
        identity: &Identity,
        tenant: &str,
        project: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let home = home_for(&self.workspace, identity).await?;
        workspace_path(&self.workspace, &home, tenant, project).ok_or_else(|| {
            WorkspaceError::Unlocatable { tenant: tenant.to_string(), project: project.to_string() }
        })
    }

    fn metadata_path(&self, path: &Path) -> PathBuf {
        path.join(&self.workspace.metadata_dir)
    }

    /// True only if both the directory and its metadata directory exist.
    pub async fn workspace_exists(&self, identity: &Identity, path: &Path) -> Result<bool, ExecError> {
        Ok(self.fs.path_exists(identity, path).await?
            && self.fs.path_exists(identity, &self.metadata_path(path)).await?)
    }

    pub async fn workspace_status(
        &self,
        identity: &Identity,
        path: &Path,
    ) -> Result<WorkspaceStatus, ExecError> {
        let exists = self.fs.path_exists(identity, path).await?;
        let has_metadata = exists && self.fs.path_exists(identity, &self.metadata_path(path)).await?;
        Ok(WorkspaceStatus { path: path.to_path_buf(), exists, has_metadata })
    }

    /// Create `path` and clone `source` into it as `identity`.
    ///
    /// Concurrent calls for the same path in this process are serialized, and
    /// a call against an already valid workspace fails with
    /// [`WorkspaceError::AlreadyInitialized`]. On failure, whatever is left
    /// at `path` is removed once; the outcome is reported in
    /// [`WorkspaceError::InitFailed::cleanup`].
    ///
    /// `env` is laid over the default git environment and is only needed when
    /// credentials other than the user's own must be injected.
    pub async fn initialize_workspace(
        &self,
        identity: &Identity,
        path: &Path,
        source: &CloneSource,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<PathBuf, WorkspaceError> {
        validate_source(identity, source)?;
        let _guard = self.locks.lock(path).await;

        if self.workspace_exists(identity, path).await? {
            return Err(WorkspaceError::AlreadyInitialized { path: path.to_path_buf() });
        }

        tracing::info!(user = %identity, branch = %source.branch, "initializing workspace");

        if let Err(e) = self.create_and_clone(identity, path, source, env).await {
            let cleanup = self.cleanup(identity, path).await;
            tracing::warn!(user = %identity, error = %e, %cleanup, "workspace initialization failed");
            return Err(WorkspaceError::InitFailed {
                identity: identity.to_string(),
                path: path.to_path_buf(),
                source: e,
                cleanup,
            });
        }

        tracing::info!(user = %identity, "workspace ready");
        Ok(path.to_path_buf())
    }

    /// Remove a workspace entirely.
    pub async fn destroy_workspace(&self, identity: &Identity, path: &Path) -> Result<(), WorkspaceError> {
        let _guard = self.locks.lock(path).await;
        self.fs.remove_recursive(identity, path, None).await?;
        tracing::info!(user = %identity, "workspace destroyed");
        Ok(())
    }

    async fn create_and_clone(
        &self,
        identity: &Identity,
        path: &Path,
        source: &CloneSource,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<(), ExecError> {
        self.fs.make_directory(identity, path, true).await?;

        let path_arg = path.to_string_lossy();
        let argv = [
            self.git.program.as_str(),
            "clone",
            "--branch",
            source.branch.as_str(),
            "--",
            source.url.as_str(),
            path_arg.as_ref(),
        ];
        let invocation = Invocation::as_user(identity.clone(), argv, self.fs.timeouts().clone)
            .envs(git_env(&self.git, env))
            .build()?;

        self.fs.executor().execute(invocation).await?;
        Ok(())
    }

    /// Best-effort removal after a failed initialization. Attempted at most once.
    ///
    /// Anything left at `path` is partial: a valid workspace never gets this
    /// far, so a directory left by an earlier failed attempt is removed too.
    async fn cleanup(&self, identity: &Identity, path: &Path) -> Cleanup {
        match self.fs.path_exists(identity, path).await {
            Ok(false) => return Cleanup::NotNeeded,
            Ok(true) => {}
            Err(e) => tracing::debug!(error = %e, "existence check before cleanup failed"),
        }
        match self.fs.remove_recursive(identity, path, None).await {
            Ok(()) => Cleanup::Removed,
            Err(e) => {
                tracing::warn!(user = %identity, error = %e, "failed to remove partial workspace");
                Cleanup::Failed(e.to_string())
            }
        }
    }
}

/// Default git environment with the caller's overrides on top.
///
/// Both defaults keep git from prompting: ssh in BatchMode and no terminal
/// credential prompts.
pub fn git_env(
    config: &GitConfig,
    overrides: Option<&BTreeMap<String, String>>,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::from([
        ("GIT_SSH_COMMAND".to_string(), config.ssh_command.clone()),
        ("GIT_TERMINAL_PROMPT".to_string(), "0".to_string()),
    ]);
    if let Some(overrides) = overrides {
        env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    env
}

/// Reject sources git could misread before anything touches the filesystem.
fn validate_source(identity: &Identity, source: &CloneSource) -> Result<(), ExecError> {
    let reason = if source.url.is_empty() {
        "clone URL is empty"
    } else if source.branch.is_empty() || source.branch.starts_with('-') {
        "branch must be non-empty and must not start with '-'"
    } else {
        return Ok(());
    };
    let argv = ["git".to_string(), "clone".to_string()];
    Err(ExecError::invalid(&Target::User(identity.clone()), &argv, reason))
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
