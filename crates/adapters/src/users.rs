// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System user database lookups.

use std::path::PathBuf;

use nix::unistd::User;
use runas_core::{rooted_home, Identity, LinuxUser, WorkspaceConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserLookupError {
    #[error("user database lookup for {name} failed: {source}")]
    Lookup {
        name: String,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("user lookup task failed: {0}")]
    Join(String),
}

impl UserLookupError {
    pub fn hint(&self) -> &'static str {
        match self {
            UserLookupError::NoSuchUser(_) => "the target account must exist on this host",
            UserLookupError::Lookup { .. } | UserLookupError::Join(_) => {
                "check the host's name service configuration"
            }
        }
    }
}

/// Look up a user by name. `Ok(None)` means the account does not exist.
///
/// NSS lookups may block on a network directory, so this runs on the
/// blocking pool.
pub async fn lookup_user(name: &str) -> Result<Option<LinuxUser>, UserLookupError> {
    let owned = name.to_string();
    let found = tokio::task::spawn_blocking(move || User::from_name(&owned))
        .await
        .map_err(|e| UserLookupError::Join(e.to_string()))?
        .map_err(|source| UserLookupError::Lookup { name: name.to_string(), source })?;

    Ok(found.map(|user| LinuxUser {
        name: user.name,
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
        home: user.dir,
        shell: user.shell,
    }))
}

/// Home directory for `identity`: `<home_root>/<name>` when a root is
/// configured, otherwise the account's home from the user database.
pub async fn home_for(
    config: &WorkspaceConfig,
    identity: &Identity,
) -> Result<PathBuf, UserLookupError> {
    if let Some(root) = &config.home_root {
        return Ok(rooted_home(root, identity.as_str()));
    }
    lookup_user(identity.as_str())
        .await?
        .map(|user| user.home)
        .ok_or_else(|| UserLookupError::NoSuchUser(identity.to_string()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
