// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace location and lifecycle status.
//!
//! A workspace is not persisted anywhere. Its location is derived from the
//! owner's home, the tenant and the project; its state is recomputed from
//! the filesystem (as the owner) on every check.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;
use crate::slug::{slugify, MAX_SLUG_LEN};

/// Compute `<home>/<dir_name>/<tenant slug>/<project slug>`.
///
/// Returns `None` when either name slugifies to nothing.
pub fn workspace_path(
    config: &WorkspaceConfig,
    home: &Path,
    tenant: &str,
    project: &str,
) -> Option<PathBuf> {
    let tenant = slugify(tenant, MAX_SLUG_LEN);
    let project = slugify(project, MAX_SLUG_LEN);
    if tenant.is_empty() || project.is_empty() {
        return None;
    }
    Some(home.join(&config.dir_name).join(tenant).join(project))
}

/// Home directory under a configured root: `<home_root>/<username>`.
pub fn rooted_home(home_root: &Path, username: &str) -> PathBuf {
    home_root.join(username)
}

/// Derived workspace state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceState {
    /// Directory does not exist.
    Absent,
    /// Directory exists without version-control metadata (interrupted
    /// initialization or a foreign directory).
    Partial,
    /// Directory and metadata both exist.
    Valid,
}

impl fmt::Display for WorkspaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceState::Absent => write!(f, "absent"),
            WorkspaceState::Partial => write!(f, "partial"),
            WorkspaceState::Valid => write!(f, "valid"),
        }
    }
}

/// Snapshot of a workspace as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub has_metadata: bool,
}

impl WorkspaceStatus {
    pub fn state(&self) -> WorkspaceState {
        match (self.exists, self.has_metadata) {
            (true, true) => WorkspaceState::Valid,
            (true, false) => WorkspaceState::Partial,
            (false, _) => WorkspaceState::Absent,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state() == WorkspaceState::Valid
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
