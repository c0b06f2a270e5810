// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runas-core: value types for running commands as other system users

pub mod config;
pub mod error;
pub mod identity;
pub mod invocation;
pub mod output;
pub mod slug;
pub mod user;
pub mod workspace;

pub use config::{Config, ConfigError, ExecutorConfig, GitConfig, Timeouts, WorkspaceConfig};
pub use error::{ExecError, ExecErrorKind};
pub use identity::{Identity, InvalidIdentity, Target};
pub use invocation::{Invocation, InvocationBuilder, EXIT_COMMAND_NOT_FOUND};
pub use output::ExecOutput;
pub use slug::slugify;
pub use user::LinuxUser;
pub use workspace::{rooted_home, workspace_path, WorkspaceState, WorkspaceStatus};
