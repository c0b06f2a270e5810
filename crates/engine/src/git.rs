// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git actions run as the workspace owner.
//!
//! Each action returns a human-readable transcript of what ran and what git
//! printed.

use std::path::Path;
use std::time::Duration;

use runas_adapters::PrivilegedExecutor;
use runas_core::{Config, ExecOutput, GitConfig, Identity, Invocation, Timeouts};

use crate::error::GitError;
use crate::fs::FsOps;
use crate::workspace::git_env;

const DEFAULT_REMOTE: &str = "origin";

#[derive(Clone)]
pub struct GitActions<E> {
    fs: FsOps<E>,
    git: GitConfig,
    metadata_dir: String,
}

impl<E: PrivilegedExecutor> GitActions<E> {
    pub fn new(executor: E, config: &Config) -> Self {
        Self {
            fs: FsOps::new(executor, config.executor.timeouts.clone()),
            git: config.git.clone(),
            metadata_dir: config.workspace.metadata_dir.clone(),
        }
    }

    fn timeouts(&self) -> &Timeouts {
        self.fs.timeouts()
    }

    /// `git status --short --branch`.
    pub async fn status(&self, identity: &Identity, path: &Path) -> Result<String, GitError> {
        self.ensure_workspace(identity, path).await?;
        let out = self.git(identity, path, &["status", "--short", "--branch"], self.timeouts().git).await?;
        Ok(out.combined())
    }

    /// Remotes in the order git lists them.
    pub async fn remotes(&self, identity: &Identity, path: &Path) -> Result<Vec<String>, GitError> {
        self.ensure_workspace(identity, path).await?;
        self.list_remotes(identity, path).await
    }

    /// Pull `branch` from the selected remote. With `clean`, local changes and
    /// untracked files are discarded first.
    pub async fn pull(
        &self,
        identity: &Identity,
        path: &Path,
        branch: &str,
        clean: bool,
    ) -> Result<String, GitError> {
        check_branch(branch)?;
        self.ensure_workspace(identity, path).await?;
        let remote = self.select_remote(identity, path).await?;
        let local = self.timeouts().git;

        let mut transcript = Vec::new();
        if clean {
            tracing::info!(user = %identity, "discarding local changes before pull");
            self.git(identity, path, &["reset", "--hard", "HEAD"], local).await?;
            transcript.push("Executed: git reset --hard HEAD".to_string());
            self.git(identity, path, &["clean", "-fd"], local).await?;
            transcript.push("Executed: git clean -fd".to_string());
        }

        transcript.push(format!("Pulling {}/{} ...", remote, branch));
        let pulled = self.git(identity, path, &["pull", remote.as_str(), branch], self.timeouts().network).await?;
        push_nonempty(&mut transcript, pulled.combined());

        let status = self.git(identity, path, &["status", "--short", "--branch"], local).await?;
        let status = status.combined();
        if !status.is_empty() {
            transcript.push(format!("Working tree status:\n{}", status));
        }
        Ok(transcript.join("\n"))
    }

    /// Push `branch` to the selected remote.
    pub async fn push(&self, identity: &Identity, path: &Path, branch: &str) -> Result<String, GitError> {
        check_branch(branch)?;
        self.ensure_workspace(identity, path).await?;
        let remote = self.select_remote(identity, path).await?;

        let mut transcript = vec![format!("Pushing to {}/{} ...", remote, branch)];
        let pushed = self.git(identity, path, &["push", remote.as_str(), branch], self.timeouts().network).await?;
        let pushed = pushed.combined();
        transcript.push(if pushed.is_empty() { "Push completed.".to_string() } else { pushed });
        Ok(transcript.join("\n"))
    }

    async fn ensure_workspace(&self, identity: &Identity, path: &Path) -> Result<(), GitError> {
        let valid = self.fs.path_exists(identity, path).await?
            && self.fs.path_exists(identity, &path.join(&self.metadata_dir)).await?;
        if valid {
            Ok(())
        } else {
            Err(GitError::NotAWorkspace { path: path.to_path_buf() })
        }
    }

    async fn list_remotes(&self, identity: &Identity, path: &Path) -> Result<Vec<String>, GitError> {
        let out = self.git(identity, path, &["remote"], self.timeouts().git).await?;
        Ok(out.stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect())
    }

    /// `origin` when present, otherwise the first remote.
    async fn select_remote(&self, identity: &Identity, path: &Path) -> Result<String, GitError> {
        let remotes = self.list_remotes(identity, path).await?;
        pick_remote(&remotes).map(str::to_string).ok_or(GitError::NoRemote)
    }

    async fn git(
        &self,
        identity: &Identity,
        path: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> Result<ExecOutput, GitError> {
        let path = path.to_string_lossy();
        let mut argv = vec![self.git.program.as_str(), "-C", path.as_ref()];
        argv.extend_from_slice(args);
        let invocation = Invocation::as_user(identity.clone(), argv, timeout)
            .envs(git_env(&self.git, None))
            .build()?;
        Ok(self.fs.executor().execute(invocation).await?)
    }
}

fn pick_remote(remotes: &[String]) -> Option<&str> {
    remotes
        .iter()
        .find(|r| r.as_str() == DEFAULT_REMOTE)
        .or_else(|| remotes.first())
        .map(String::as_str)
}

fn check_branch(branch: &str) -> Result<(), GitError> {
    if branch.is_empty() || branch.starts_with('-') {
        return Err(GitError::Invalid(format!("branch {:?}", branch)));
    }
    Ok(())
}

fn push_nonempty(transcript: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        transcript.push(text);
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
