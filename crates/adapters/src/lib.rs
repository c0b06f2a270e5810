// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runas-adapters: process execution through sudo and user database access

pub mod executor;
pub mod subprocess;
pub mod users;

pub use executor::{command_line, PrivilegedExecutor, SudoExecutor};
pub use subprocess::{run_with_timeout, RawOutput, RunError, TERMINATE_GRACE};
pub use users::{home_for, lookup_user, UserLookupError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecCall, FakeExecutor};
