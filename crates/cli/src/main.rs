// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas` - run commands and manage workspaces as other users

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod commands;
mod exit_error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use runas_adapters::SudoExecutor;
use runas_core::Config;
use runas_engine::{FsOps, GitActions, WorkspaceManager};

use commands::{exec, fs, git, workspace};
use output::OutputFormat;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "RUNAS_LOG";

#[derive(Parser)]
#[command(name = "runas", version, about = "Run commands as other users without a shell")]
struct Cli {
    /// Config file (default: $RUNAS_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command as another user
    Exec(exec::ExecArgs),
    /// Filesystem helpers
    Fs(fs::FsArgs),
    /// Workspace lifecycle
    Workspace(workspace::WorkspaceArgs),
    /// Git actions inside a workspace
    Git(git::GitArgs),
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(mechanism = %config.executor.program, "configuration loaded");
    let executor = SudoExecutor::new(config.executor.clone());
    let format = cli.output;

    match cli.command {
        Commands::Exec(args) => exec::handle(args, &executor, &config, format).await,
        Commands::Fs(args) => {
            let ops = FsOps::new(executor, config.executor.timeouts.clone());
            fs::handle(args.command, &ops, format).await
        }
        Commands::Workspace(args) => {
            let manager = WorkspaceManager::new(executor, &config);
            workspace::handle(args.command, &manager, format).await
        }
        Commands::Git(args) => {
            let manager = WorkspaceManager::new(executor.clone(), &config);
            let actions = GitActions::new(executor, &config);
            git::handle(args.command, &manager, &actions, format).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let exit = exit_error::classify(&err);
        if !exit.message.is_empty() {
            eprintln!("error: {}", exit.message);
            if let Some(hint) = exit.hint {
                eprintln!("hint: {}", hint);
            }
        }
        std::process::exit(exit.code);
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
