// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace and git action errors.

use std::fmt;
use std::path::PathBuf;

use runas_adapters::UserLookupError;
use runas_core::ExecError;
use thiserror::Error;

/// What happened to the workspace directory after a failed initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// Nothing was left behind.
    NotNeeded,
    /// The partial directory was removed.
    Removed,
    /// Removal was attempted and failed; the directory may be partial.
    Failed(String),
}

impl Cleanup {
    /// True unless removal was attempted and failed.
    pub fn is_clean(&self) -> bool {
        !matches!(self, Cleanup::Failed(_))
    }
}

impl fmt::Display for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cleanup::NotNeeded => write!(f, "nothing to clean up"),
            Cleanup::Removed => write!(f, "partial directory removed"),
            Cleanup::Failed(reason) => write!(f, "cleanup also failed: {}", reason),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace is already initialized")]
    AlreadyInitialized { path: PathBuf },

    #[error("workspace initialization as {identity} failed ({cleanup}): {source}")]
    InitFailed {
        identity: String,
        path: PathBuf,
        #[source]
        source: ExecError,
        cleanup: Cleanup,
    },

    #[error("cannot derive a workspace path from tenant {tenant:?} and project {project:?}")]
    Unlocatable { tenant: String, project: String },

    #[error(transparent)]
    User(#[from] UserLookupError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

impl WorkspaceError {
    /// The underlying execution failure, if any.
    pub fn exec_error(&self) -> Option<&ExecError> {
        match self {
            WorkspaceError::InitFailed { source, .. } | WorkspaceError::Exec(source) => Some(source),
            _ => None,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            WorkspaceError::AlreadyInitialized { .. } => {
                "check workspace status first, or destroy the workspace before re-initializing"
            }
            WorkspaceError::InitFailed { cleanup: Cleanup::Failed(_), .. } => {
                "a partial workspace directory may remain; destroy it before retrying"
            }
            WorkspaceError::InitFailed { source, .. } | WorkspaceError::Exec(source) => {
                source.hint()
            }
            WorkspaceError::Unlocatable { .. } => {
                "tenant and project names must contain at least one letter or digit"
            }
            WorkspaceError::User(e) => e.hint(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a workspace: directory or version-control metadata is missing")]
    NotAWorkspace { path: PathBuf },

    #[error("repository has no remotes configured")]
    NoRemote,

    #[error("invalid git argument: {0}")]
    Invalid(String),

    #[error("git action failed: {0}")]
    Exec(#[from] ExecError),
}

impl GitError {
    pub fn hint(&self) -> &'static str {
        match self {
            GitError::NotAWorkspace { .. } => "initialize the workspace first",
            GitError::NoRemote => "add a remote to the repository",
            GitError::Invalid(_) => "branch names must not be empty or start with '-'",
            GitError::Exec(e) => e.hint(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
