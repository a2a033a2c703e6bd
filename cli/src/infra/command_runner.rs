//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution, with an optional timeout that kills the child.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
///
/// Children are spawned with `kill_on_drop`, so when the timeout fires and
/// the collecting future is dropped, the process is terminated with it.
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    /// `None` lets commands run until they exit on their own.
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<Output> {
        let child = tokio::process::Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let collect = collect_output(child, program);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collect)
                .await
                .map_err(|_| anyhow::anyhow!("{program} timed out after {}s", limit.as_secs()))?,
            None => collect.await,
        }
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<ExitStatus> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}

async fn collect_output(mut child: Child, program: &str) -> Result<Output> {
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let (status, stdout, stderr) = tokio::join!(
        child.wait(),
        read_stream(stdout_handle, program, "stdout"),
        read_stream(stderr_handle, program, "stderr"),
    );
    Ok(Output {
        status: status.with_context(|| format!("waiting for {program}"))?,
        stdout,
        stderr,
    })
}

/// Drain a child pipe. A read error keeps whatever arrived before it.
async fn read_stream<S: AsyncRead + Unpin>(
    handle: Option<S>,
    program: &str,
    stream: &str,
) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle
        && let Err(e) = h.read_to_end(&mut buf).await
    {
        tracing::debug!(program, stream, error = %e, read = buf.len(), "output truncated");
    }
    buf
}
