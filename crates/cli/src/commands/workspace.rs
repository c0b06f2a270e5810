// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas workspace` - Per-user workspace lifecycle

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use serde_json::json;

use runas_adapters::PrivilegedExecutor;
use runas_core::Identity;
use runas_engine::{CloneSource, WorkspaceManager};

use super::parse_env;
use crate::output::{format_or_json, print_done, OutputFormat};

#[derive(Args, Debug)]
pub struct WorkspaceArgs {
    #[command(subcommand)]
    pub command: WorkspaceCommand,
}

/// Which workspace a command acts on.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("location").required(true).args(["path", "tenant"])))]
pub struct WorkspaceTarget {
    /// Owner of the workspace
    #[arg(short, long)]
    pub user: Identity,

    /// Explicit workspace directory
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Tenant name, resolved under the user's home
    #[arg(long, requires = "project")]
    pub tenant: Option<String>,

    /// Project name, resolved under the user's home
    #[arg(long, requires = "tenant")]
    pub project: Option<String>,
}

impl WorkspaceTarget {
    pub async fn resolve<E: PrivilegedExecutor>(&self, manager: &WorkspaceManager<E>) -> Result<PathBuf> {
        match (&self.path, &self.tenant, &self.project) {
            (Some(path), _, _) => Ok(path.clone()),
            (None, Some(tenant), Some(project)) => Ok(manager.locate(&self.user, tenant, project).await?),
            _ => anyhow::bail!("either --path or --tenant with --project is required"),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// Print the workspace directory
    Path {
        #[command(flatten)]
        target: WorkspaceTarget,
    },
    /// Show whether the workspace exists and is initialized
    Status {
        #[command(flatten)]
        target: WorkspaceTarget,
    },
    /// Create the workspace and clone a repository into it
    Init {
        #[command(flatten)]
        target: WorkspaceTarget,
        /// Repository to clone
        #[arg(long)]
        url: String,
        /// Branch to check out
        #[arg(long, default_value = "main")]
        branch: String,
        /// Extra environment variable for git (repeatable)
        #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
        env: Vec<(String, String)>,
    },
    /// Remove the workspace directory
    Destroy {
        #[command(flatten)]
        target: WorkspaceTarget,
    },
}

pub async fn handle<E: PrivilegedExecutor>(
    command: WorkspaceCommand,
    manager: &WorkspaceManager<E>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        WorkspaceCommand::Path { target } => {
            let path = target.resolve(manager).await?;
            format_or_json(format, &json!({ "path": path }), || println!("{}", path.display()))?;
        }
        WorkspaceCommand::Status { target } => {
            let path = target.resolve(manager).await?;
            let status = manager.workspace_status(&target.user, &path).await?;
            let state = status.state();
            let report = json!({
                "path": status.path,
                "state": state,
                "exists": status.exists,
                "has_metadata": status.has_metadata,
            });
            format_or_json(format, &report, || println!("{}\t{}", state, status.path.display()))?;
        }
        WorkspaceCommand::Init { target, url, branch, env } => {
            let path = target.resolve(manager).await?;
            let env: BTreeMap<String, String> = env.into_iter().collect();
            let overlay = (!env.is_empty()).then_some(&env);
            let source = CloneSource::new(url, branch);
            let path = manager.initialize_workspace(&target.user, &path, &source, overlay).await?;
            let message = format!("Initialized {} ({})", path.display(), source.branch);
            print_done(format, &message, json!({ "path": path, "branch": source.branch }))?;
        }
        WorkspaceCommand::Destroy { target } => {
            let path = target.resolve(manager).await?;
            manager.destroy_workspace(&target.user, &path).await?;
            print_done(format, &format!("Removed {}", path.display()), json!({ "path": path }))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
