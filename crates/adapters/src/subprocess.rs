// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded child-process execution.
//!
//! Every child spawned by this crate goes through [`run_with_timeout`], so no
//! caller can wait on a process indefinitely.

use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// How long a timed-out child gets between SIGTERM and SIGKILL.
///
/// sudo relays SIGTERM to the command it started; SIGKILL cannot be relayed.
pub const TERMINATE_GRACE: Duration = Duration::from_millis(250);

/// Completed child process.
#[derive(Debug)]
pub struct RawOutput {
    /// Exit code, or `128 + signal` when the child was killed by a signal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration: Duration,
}

/// Errors from [`run_with_timeout`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{description} timed out after {timeout:?}")]
    Timeout { description: String, timeout: Duration },

    #[error("failed to spawn {description}: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {description}: {source}")]
    Wait {
        description: String,
        #[source]
        source: std::io::Error,
    },
}

/// Spawn `cmd`, wait up to `timeout`, and collect its exit code and output.
///
/// stdin is always null. With `capture` the output streams are piped and
/// collected; without it they are inherited from this process. On timeout
/// the child is sent SIGTERM, given [`TERMINATE_GRACE`], then killed and
/// reaped before [`RunError::Timeout`] is returned.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    capture: bool,
    description: &str,
) -> Result<RawOutput, RunError> {
    let (stdout, stderr) =
        if capture { (Stdio::piped(), Stdio::piped()) } else { (Stdio::inherit(), Stdio::inherit()) };
    cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr).kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|source| RunError::Spawn { description: description.to_string(), source })?;
    let pid = child.id();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let collect = async {
        let (stdout, stderr) = tokio::join!(read_pipe(stdout_pipe), read_pipe(stderr_pipe));
        let status = child.wait().await?;
        Ok::<_, std::io::Error>((status, stdout?, stderr?))
    };
    let result = tokio::time::timeout(timeout, collect).await;

    match result {
        Ok(Ok((status, stdout, stderr))) => Ok(RawOutput {
            exit_code: status.code().unwrap_or_else(|| 128 + status.signal().unwrap_or(0)),
            stdout,
            stderr,
            duration: start.elapsed(),
        }),
        Ok(Err(source)) => Err(RunError::Wait { description: description.to_string(), source }),
        Err(_) => {
            tracing::warn!(description, ?timeout, ?pid, "command timed out, terminating");
            if let Some(pid) = pid {
                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
            }
            if tokio::time::timeout(TERMINATE_GRACE, child.wait()).await.is_err() {
                if let Err(e) = child.kill().await {
                    tracing::warn!(description, error = %e, "failed to kill timed-out command");
                }
            }
            Err(RunError::Timeout { description: description.to_string(), timeout })
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
