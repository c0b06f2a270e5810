// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target identities for privileged execution.
//!
//! An [`Identity`] is a system username that owns a workspace. Whether the
//! account exists is the caller's concern; this type only rejects names that
//! the escalation mechanism would parse as something other than a username.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A username rejected by [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identity {name:?}: {reason}")]
pub struct InvalidIdentity {
    pub name: String,
    pub reason: &'static str,
}

/// A validated system username.
///
/// Serializes as the bare name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidIdentity> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("must not be empty")
        } else if name.starts_with('-') {
            // sudo would read it as another option
            Some("must not start with '-'")
        } else if name.starts_with('#') {
            // sudo -u #1000 selects by uid
            Some("must not start with '#'")
        } else if name.contains('\0') {
            Some("must not contain NUL")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(InvalidIdentity { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = InvalidIdentity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identity::new(value)
    }
}

impl std::str::FromStr for Identity {
    type Err = InvalidIdentity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::new(s)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Who a privileged command runs as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A specific system user (the mechanism's target-user flag is passed).
    User(Identity),
    /// The invoking process's own elevated rights (no target-user flag).
    Superuser,
}

impl Target {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Target::User(identity) => Some(identity),
            Target::Superuser => None,
        }
    }
}

impl From<Identity> for Target {
    fn from(identity: Identity) -> Self {
        Target::User(identity)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User(identity) => write!(f, "{}", identity),
            Target::Superuser => write!(f, "superuser"),
        }
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
