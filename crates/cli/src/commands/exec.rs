// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `runas exec` - Run one command as another user

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use runas_adapters::PrivilegedExecutor;
use runas_core::{Config, ExecOutput, Identity, Invocation};

use super::{parse_env, parse_secs};
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Run as this user
    #[arg(short, long, required_unless_present = "elevated", conflicts_with = "elevated")]
    pub user: Option<Identity>,

    /// Run as the superuser
    #[arg(long)]
    pub elevated: bool,

    /// Seconds before the command is terminated
    #[arg(short, long, value_parser = parse_secs)]
    pub timeout: Option<Duration>,

    /// Extra environment variable for the command (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env)]
    pub env: Vec<(String, String)>,

    /// Report a non-zero exit through this process's exit code instead of as an error
    #[arg(long)]
    pub no_check: bool,

    /// Let the command write straight to this terminal
    #[arg(long)]
    pub no_capture: bool,

    /// Command and arguments, passed through without a shell
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGV")]
    pub argv: Vec<String>,
}

impl ExecArgs {
    pub fn invocation(&self, config: &Config) -> Result<Invocation> {
        let timeout = self.timeout.unwrap_or(config.executor.timeouts.default);
        let builder = match &self.user {
            Some(user) => Invocation::as_user(user.clone(), &self.argv, timeout),
            None => Invocation::elevated(&self.argv, timeout),
        };
        Ok(builder
            .envs(self.env.iter().cloned())
            .capture(!self.no_capture)
            .raise_on_failure(!self.no_check)
            .build()?)
    }
}

pub async fn handle<E: PrivilegedExecutor>(
    args: ExecArgs,
    executor: &E,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let output = executor.execute(args.invocation(config)?).await?;
    print_output(&output, format)?;
    if !output.succeeded() {
        return Err(ExitError::silent(output.exit_code).into());
    }
    Ok(())
}

fn print_output(output: &ExecOutput, format: OutputFormat) -> Result<()> {
    format_or_json(format, output, || {
        print!("{}", output.stdout);
        eprint!("{}", output.stderr);
    })
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
