// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas git` - Git actions inside a user's workspace

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use runas_adapters::PrivilegedExecutor;
use runas_engine::{GitActions, WorkspaceManager};

use super::workspace::WorkspaceTarget;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args, Debug)]
pub struct GitArgs {
    #[command(subcommand)]
    pub command: GitCommand,
}

#[derive(Subcommand, Debug)]
pub enum GitCommand {
    /// Short status of the working tree
    Status {
        #[command(flatten)]
        target: WorkspaceTarget,
    },
    /// List configured remotes
    Remotes {
        #[command(flatten)]
        target: WorkspaceTarget,
    },
    /// Pull a branch from the workspace's remote
    Pull {
        #[command(flatten)]
        target: WorkspaceTarget,
        #[arg(short, long, default_value = "main")]
        branch: String,
        /// Discard local changes and untracked files first
        #[arg(long)]
        clean: bool,
    },
    /// Push a branch to the workspace's remote
    Push {
        #[command(flatten)]
        target: WorkspaceTarget,
        #[arg(short, long, default_value = "main")]
        branch: String,
    },
}

pub async fn handle<E: PrivilegedExecutor>(
    command: GitCommand,
    manager: &WorkspaceManager<E>,
    git: &GitActions<E>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        GitCommand::Status { target } => {
            let path = target.resolve(manager).await?;
            let status = git.status(&target.user, &path).await?;
            print_transcript(format, &status)?;
        }
        GitCommand::Remotes { target } => {
            let path = target.resolve(manager).await?;
            let remotes = git.remotes(&target.user, &path).await?;
            format_or_json(format, &remotes, || {
                for remote in &remotes {
                    println!("{}", remote);
                }
            })?;
        }
        GitCommand::Pull { target, branch, clean } => {
            let path = target.resolve(manager).await?;
            let transcript = git.pull(&target.user, &path, &branch, clean).await?;
            print_transcript(format, &transcript)?;
        }
        GitCommand::Push { target, branch } => {
            let path = target.resolve(manager).await?;
            let transcript = git.push(&target.user, &path, &branch).await?;
            print_transcript(format, &transcript)?;
        }
    }
    Ok(())
}

fn print_transcript(format: OutputFormat, transcript: &str) -> Result<()> {
    format_or_json(format, &json!({ "output": transcript }), || println!("{}", transcript))
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
