// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas fs` - Filesystem helpers

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use runas_adapters::PrivilegedExecutor;
use runas_core::Identity;
use runas_engine::FsOps;

use super::{parse_mode, parse_secs};
use crate::output::{format_or_json, print_done, OutputFormat};

#[derive(Args, Debug)]
pub struct FsArgs {
    #[command(subcommand)]
    pub command: FsCommand,
}

#[derive(Subcommand, Debug)]
pub enum FsCommand {
    /// Check whether a path exists as seen by a user
    Exists {
        #[arg(short, long)]
        user: Identity,
        path: PathBuf,
    },
    /// Create a directory as a user
    Mkdir {
        #[arg(short, long)]
        user: Identity,
        path: PathBuf,
        /// Fail if the parent directory is missing
        #[arg(long)]
        no_parents: bool,
    },
    /// Recursively remove a path as a user
    Rm {
        #[arg(short, long)]
        user: Identity,
        path: PathBuf,
        /// Seconds before the removal is terminated
        #[arg(short, long, value_parser = parse_secs)]
        timeout: Option<Duration>,
    },
    /// Change owner and/or group (runs elevated)
    Chown {
        path: PathBuf,
        #[arg(long, required_unless_present = "group")]
        owner: Option<String>,
        #[arg(long)]
        group: Option<String>,
    },
    /// Change permission bits (runs elevated)
    Chmod {
        path: PathBuf,
        /// Octal mode, e.g. 750
        #[arg(value_parser = parse_mode)]
        mode: u32,
    },
    /// Change group ownership (runs elevated)
    Chgrp { path: PathBuf, group: String },
}

pub async fn handle<E: PrivilegedExecutor>(
    command: FsCommand,
    fs: &FsOps<E>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        FsCommand::Exists { user, path } => {
            let exists = fs.path_exists(&user, &path).await?;
            let report = json!({ "path": path, "exists": exists });
            format_or_json(format, &report, || println!("{}", exists))?;
        }
        FsCommand::Mkdir { user, path, no_parents } => {
            fs.make_directory(&user, &path, !no_parents).await?;
            print_done(format, &format!("Created {}", path.display()), json!({ "path": path }))?;
        }
        FsCommand::Rm { user, path, timeout } => {
            fs.remove_recursive(&user, &path, timeout).await?;
            print_done(format, &format!("Removed {}", path.display()), json!({ "path": path }))?;
        }
        FsCommand::Chown { path, owner, group } => {
            fs.change_owner(&path, owner.as_deref(), group.as_deref()).await?;
            let fields = json!({ "path": path, "owner": owner, "group": group });
            print_done(format, &format!("Changed ownership of {}", path.display()), fields)?;
        }
        FsCommand::Chmod { path, mode } => {
            fs.change_mode(&path, mode).await?;
            let message = format!("Changed mode of {} to {:o}", path.display(), mode);
            print_done(format, &message, json!({ "path": path, "mode": format!("{:o}", mode) }))?;
        }
        FsCommand::Chgrp { path, group } => {
            fs.change_group(&path, &group).await?;
            let message = format!("Changed group of {} to {}", path.display(), group);
            print_done(format, &message, json!({ "path": path, "group": group }))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
