//! Infrastructure implementation of the `ContainerRuntime` port.
//!
//! `DockerRuntime<R>` routes every container operation through a
//! `CommandRunner` invoking the docker CLI (or a compatible program such as
//! podman). Environment values are passed as `-e KEY` and handed to the
//! child process environment, so secrets never appear on the argument vector
//! of long-lived containers.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, ContainerRuntime};
use crate::domain::container::Attachments;
use crate::domain::error::RuntimeError;
use crate::domain::{ContainerInfo, ContainerSpec, EphemeralCommand, EphemeralOutcome};

/// Program used when the configuration does not name one.
pub const DEFAULT_RUNTIME_PROGRAM: &str = "docker";

/// Adapter that drives the docker CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a recording
/// runner without spawning real processes.
pub struct DockerRuntime<R: CommandRunner> {
    program: String,
    runner: R,
}

impl<R: CommandRunner> DockerRuntime<R> {
    #[must_use]
    pub fn new(program: impl Into<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The underlying command runner.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn invoke(
        &self,
        args: &[String],
        envs: &[(&str, &str)],
    ) -> Result<std::process::Output> {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner
            .run_with_env(&self.program, &argv, envs)
            .await
            .with_context(|| format!("{} {}", self.program, argv.first().unwrap_or(&"")))
    }
}

/// Flags for mounts, environment keys and links, in that order.
pub(crate) fn attachment_args(attach: &Attachments) -> Vec<String> {
    let mut args = Vec::new();
    for key in attach.environment.keys() {
        args.push("-e".to_owned());
        args.push(key.clone());
    }
    for mount in &attach.mounts {
        let mut binding = format!("{}:{}", mount.host.display(), mount.container);
        if mount.read_only {
            binding.push_str(":ro");
        }
        args.push("-v".to_owned());
        args.push(binding);
    }
    for (target, alias) in &attach.links {
        args.push("--link".to_owned());
        args.push(format!("{target}:{alias}"));
    }
    args
}

/// Environment pairs handed to the child process, never to argv.
fn attachment_env(attach: &Attachments) -> Vec<(&str, &str)> {
    attach
        .environment
        .iter()
        .map(|(k, v)| (k.as_str(), v.expose()))
        .collect()
}

fn ephemeral_args(cmd: &EphemeralCommand, interactive: bool) -> Vec<String> {
    let mut args = vec!["run".to_owned(), "--rm".to_owned()];
    if interactive {
        args.push("-it".to_owned());
    }
    args.extend(attachment_args(&cmd.attach));
    args.push(cmd.image.clone());
    args.extend(cmd.command.iter().cloned());
    args
}

fn is_missing_container(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEntry {
    name: String,
    state: InspectState,
    #[serde(default)]
    network_settings: InspectNetwork,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    running: bool,
}

#[derive(Debug, Default, Deserialize)]
struct InspectNetwork {
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
}

/// Parse the JSON array printed by `docker inspect`.
pub(crate) fn parse_inspect(stdout: &[u8]) -> Result<Option<ContainerInfo>> {
    let entries: Vec<InspectEntry> =
        serde_json::from_slice(stdout).context("failed to parse container inspect output")?;
    Ok(entries.into_iter().next().map(|entry| ContainerInfo {
        name: entry.name.trim_start_matches('/').to_owned(),
        running: entry.state.running,
        ip_address: entry.network_settings.ip_address,
    }))
}

impl<R: CommandRunner> ContainerRuntime for DockerRuntime<R> {
    async fn run_ephemeral(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome> {
        tracing::debug!(image = %cmd.image, "running ephemeral container");
        let output = self
            .invoke(&ephemeral_args(cmd, false), &attachment_env(&cmd.attach))
            .await?;
        Ok(EphemeralOutcome {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_interactive(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome> {
        tracing::debug!(image = %cmd.image, "running interactive container");
        let args = ephemeral_args(cmd, true);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let status = self
            .runner
            .run_interactive(&self.program, &argv, &attachment_env(&cmd.attach))
            .await
            .with_context(|| format!("{} run -it", self.program))?;
        Ok(EphemeralOutcome {
            exit_code: status.code(),
            stderr: String::new(),
        })
    }

    async fn start_named(&self, spec: &ContainerSpec) -> Result<()> {
        tracing::info!(container = %spec.name, image = %spec.image, "starting container");
        let mut args = vec![
            "run".to_owned(),
            "-d".to_owned(),
            "--name".to_owned(),
            spec.name.clone(),
        ];
        args.extend(attachment_args(&spec.attach));
        args.push(spec.image.clone());

        let output = self.invoke(&args, &attachment_env(&spec.attach)).await?;
        if !output.status.success() {
            return Err(RuntimeError::StartFailed {
                name: spec.name.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(())
    }

    async fn inspect(&self, name: &str) -> Result<Option<ContainerInfo>> {
        let args = ["inspect", "--type", "container", name].map(str::to_owned);
        let output = self.invoke(&args, &[]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if is_missing_container(&stderr) {
                return Ok(None);
            }
            return Err(RuntimeError::InspectFailed {
                name: name.to_owned(),
                stderr,
            }
            .into());
        }
        parse_inspect(&output.stdout)
    }

    async fn remove(&self, name: &str) -> Result<()> {
        tracing::info!(container = %name, "removing container");
        let args = ["rm", "-f", name].map(str::to_owned);
        let output = self.invoke(&args, &[]).await?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if is_missing_container(&stderr) {
            tracing::debug!(container = %name, "container already absent");
            return Ok(());
        }
        Err(RuntimeError::RemoveFailed {
            name: name.to_owned(),
            stderr,
        }
        .into())
    }
}
