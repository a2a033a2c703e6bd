//! Container invocation shapes consumed by the runtime port.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use datacats_common::ContainerRole;

use crate::domain::secrets::Secret;

/// A host path bound into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
    pub read_only: bool,
}

/// Mounts, environment and links shared by ephemeral and named containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    pub mounts: Vec<Mount>,
    pub environment: BTreeMap<String, Secret>,
    /// Target container name -> alias visible inside this container.
    pub links: BTreeMap<String, String>,
}

impl Attachments {
    /// Read-only mounts, in insertion order.
    pub fn read_only(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter().filter(|m| m.read_only)
    }

    /// Read-write mounts, in insertion order.
    pub fn read_write(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter().filter(|m| !m.read_only)
    }
}

/// Builder methods for anything carrying `Attachments`.
pub trait Attach: Sized {
    fn attachments_mut(&mut self) -> &mut Attachments;

    /// Bind `host` read-only at `container`.
    #[must_use]
    fn ro(mut self, host: impl AsRef<Path>, container: &str) -> Self {
        self.attachments_mut().mounts.push(Mount {
            host: host.as_ref().to_path_buf(),
            container: container.to_owned(),
            read_only: true,
        });
        self
    }

    /// Bind `host` read-write at `container`.
    #[must_use]
    fn rw(mut self, host: impl AsRef<Path>, container: &str) -> Self {
        self.attachments_mut().mounts.push(Mount {
            host: host.as_ref().to_path_buf(),
            container: container.to_owned(),
            read_only: false,
        });
        self
    }

    #[must_use]
    fn env(mut self, key: &str, value: &Secret) -> Self {
        self.attachments_mut()
            .environment
            .insert(key.to_owned(), value.clone());
        self
    }

    /// Make the running container `target` reachable as `alias`.
    #[must_use]
    fn link(mut self, target: &str, alias: &str) -> Self {
        self.attachments_mut()
            .links
            .insert(target.to_owned(), alias.to_owned());
        self
    }
}

/// One-shot command run in a fresh container and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeralCommand {
    pub image: String,
    pub command: Vec<String>,
    pub attach: Attachments,
}

impl EphemeralCommand {
    #[must_use]
    pub fn new<I, S>(image: &str, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            image: image.to_owned(),
            command: command.into_iter().map(Into::into).collect(),
            attach: Attachments::default(),
        }
    }
}

impl Attach for EphemeralCommand {
    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attach
    }
}

/// Long-lived container with a deterministic, project-derived name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub role: ContainerRole,
    pub image: String,
    pub attach: Attachments,
}

impl ContainerSpec {
    #[must_use]
    pub fn new(role: ContainerRole, project: &str, image: &str) -> Self {
        Self {
            name: datacats_common::container_name(role, project),
            role,
            image: image.to_owned(),
            attach: Attachments::default(),
        }
    }
}

impl Attach for ContainerSpec {
    fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attach
    }
}

/// Exit of an ephemeral command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemeralOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl EphemeralOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code for display.
    #[must_use]
    pub fn code_display(&self) -> String {
        self.exit_code
            .map_or_else(|| "signal".to_string(), |c| c.to_string())
    }
}

/// Live metadata of a named container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    pub running: bool,
    /// Address on the runtime's default network; empty when not attached.
    pub ip_address: String,
}
