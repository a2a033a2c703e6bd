//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{
    ContainerInfo, ContainerSpec, CredentialSet, DatacatsConfig, EphemeralCommand,
    EphemeralOutcome,
};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_env(program, args, &[]).await
    }

    /// Run a program with extra environment variables and capture its output.
    ///
    /// Values passed in `envs` never appear on the child's argument vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout the child must be killed.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<Output>;

    /// Run a program attached to the caller's terminal and return only its
    /// exit status.
    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<ExitStatus>;
}

// ── Container Runtime Port ────────────────────────────────────────────────────

/// Container runtime operations consumed by provisioning and teardown.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Run a command to completion in a fresh container, removed afterwards.
    /// A non-zero exit is reported in the outcome, not as an `Err`.
    async fn run_ephemeral(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome>;

    /// Like `run_ephemeral` but attached to the user's terminal.
    async fn run_interactive(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome>;

    /// Start a long-lived container. Fails if the name is already in use.
    async fn start_named(&self, spec: &ContainerSpec) -> Result<()>;

    /// Live metadata, or `None` if no container has that name.
    async fn inspect(&self, name: &str) -> Result<Option<ContainerInfo>>;

    /// Force-stop and remove a named container. Removing a missing
    /// container succeeds.
    async fn remove(&self, name: &str) -> Result<()>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Local filesystem operations on the project tree.
///
/// Returns raw `io::Result` so services can tell "already exists" apart
/// from other failures.
pub trait ProjectFs {
    fn is_dir(&self, path: &Path) -> bool;
    /// Create exactly one directory; fails if it already exists.
    fn create_dir(&self, path: &Path, mode: Option<u32>) -> std::io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;
    fn copy_file(&self, from: &Path, to: &Path) -> std::io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()>;
}

// ── Secret Port ───────────────────────────────────────────────────────────────

/// Source of credential sets.
pub trait SecretGenerator {
    /// Generate four independent secrets.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure randomness source is unavailable.
    /// Implementations must not fall back to a weaker source.
    fn generate(&self) -> Result<CredentialSet>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Persistence of the user configuration.
pub trait ConfigStore {
    /// Load configuration, returning defaults if no file exists.
    fn load(&self) -> Result<DatacatsConfig>;
    fn save(&self, config: &DatacatsConfig) -> Result<()>;
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
