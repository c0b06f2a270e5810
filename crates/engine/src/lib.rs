// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runas-engine: filesystem helpers, workspace lifecycle and git actions
//! executed as other system users

pub mod error;
pub mod fs;
pub mod git;
pub mod locks;
pub mod workspace;

pub use error::{Cleanup, GitError, WorkspaceError};
pub use fs::{FsOps, MAX_MODE};
pub use git::GitActions;
pub use locks::{PathGuard, PathLocks};
pub use workspace::{git_env, CloneSource, WorkspaceManager};
