// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System account records.

use serde::Serialize;
use std::path::PathBuf;

/// A system user account as recorded in the user database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinuxUser {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    pub shell: PathBuf,
}
