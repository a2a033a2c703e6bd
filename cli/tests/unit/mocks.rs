//! Mock port implementations for unit tests.
//!
//! [`FakeRuntime`] stands in for the container runtime and reproduces the
//! host-side file effects of each step (seeded templates, generated and
//! patched config, wiped directories) so services can be tested against a
//! real temporary directory tree.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use datacats_cli::application::ports::{CommandRunner, ConfigStore, ContainerRuntime, ProjectFs};
use datacats_cli::domain::layout::{SOLR_SCHEMA_TEMPLATE, WHO_INI_TEMPLATE};
use datacats_cli::domain::stack::CONF_MOUNT;
use datacats_cli::domain::{
    ContainerInfo, ContainerSpec, DatacatsConfig, EphemeralCommand, EphemeralOutcome,
    RuntimeError,
};
use datacats_cli::infra::fs::LocalProjectFs;
use datacats_common::ContainerRole;

use crate::helpers::{exit_status, ok_output};

// ── Container runtime ────────────────────────────────────────────────────────

pub struct FakeRuntime {
    calls: Mutex<Vec<String>>,
    running: Mutex<BTreeSet<String>>,
    fail_step: Option<&'static str>,
    fail_start: Option<ContainerRole>,
    fail_remove: Option<String>,
    web_ip: String,
    interactive_code: i32,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            running: Mutex::new(BTreeSet::new()),
            fail_step: None,
            fail_start: None,
            fail_remove: None,
            web_ip: "172.17.0.9".to_string(),
            interactive_code: 0,
        }
    }

    /// Ephemeral commands whose argv contains `needle` exit with code 1.
    pub fn failing_step(mut self, needle: &'static str) -> Self {
        self.fail_step = Some(needle);
        self
    }

    pub fn failing_start(mut self, role: ContainerRole) -> Self {
        self.fail_start = Some(role);
        self
    }

    pub fn failing_remove(mut self, name: &str) -> Self {
        self.fail_remove = Some(name.to_string());
        self
    }

    pub fn with_web_ip(mut self, ip: &str) -> Self {
        self.web_ip = ip.to_string();
        self
    }

    pub fn with_interactive_code(mut self, code: i32) -> Self {
        self.interactive_code = code;
        self
    }

    pub fn with_running<const N: usize>(self, names: [&str; N]) -> Self {
        self.running
            .lock()
            .expect("lock")
            .extend(names.iter().map(ToString::to_string));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn running(&self) -> BTreeSet<String> {
        self.running.lock().expect("lock").clone()
    }

    /// Index of the first call containing `needle`.
    pub fn position(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .position(|c| c.contains(needle))
            .unwrap_or_else(|| panic!("no call containing {needle:?}"))
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    fn simulate(cmd: &EphemeralCommand) -> io::Result<()> {
        let mount = |container: &str| {
            cmd.attach
                .mounts
                .iter()
                .find(|m| m.container == container)
                .map(|m| m.host.clone())
        };
        let argv = cmd.command.join(" ");

        if argv.contains("/project/src_target/.") {
            if let Some(src) = mount("/project/src_target") {
                write_file(&src.join(WHO_INI_TEMPLATE), "[plugin:auth_tkt]\n")?;
                write_file(&src.join(SOLR_SCHEMA_TEMPLATE), "<schema/>\n")?;
            }
        } else if argv.contains("make-config") {
            if let Some(conf) = mount(CONF_MOUNT) {
                write_file(&conf.join("ckan.ini"), "[app:main]\n")?;
            }
        } else if argv.contains("config-tool") {
            if let Some(conf) = mount(CONF_MOUNT) {
                let ini = conf.join("ckan.ini");
                let mut content = std::fs::read_to_string(&ini)?;
                let edits = cmd.command.iter().skip_while(|a| *a != "-e").skip(1);
                for edit in edits {
                    content.push_str(edit);
                    content.push('\n');
                }
                std::fs::write(&ini, content)?;
            }
        } else if cmd.command.first().is_some_and(|a| a == "find") {
            if let Some(dir) = mount("/wipe") {
                for entry in std::fs::read_dir(&dir)? {
                    let path = entry?.path();
                    if path.is_dir() {
                        std::fs::remove_dir_all(&path)?;
                    } else {
                        std::fs::remove_file(&path)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

impl ContainerRuntime for FakeRuntime {
    async fn run_ephemeral(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome> {
        self.record(format!("run {}", cmd.command.join(" ")));
        if self
            .fail_step
            .is_some_and(|needle| cmd.command.join(" ").contains(needle))
        {
            return Ok(EphemeralOutcome {
                exit_code: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }
        Self::simulate(cmd)?;
        Ok(EphemeralOutcome {
            exit_code: Some(0),
            stderr: String::new(),
        })
    }

    async fn run_interactive(&self, cmd: &EphemeralCommand) -> Result<EphemeralOutcome> {
        self.record(format!("interactive {}", cmd.command.join(" ")));
        Ok(EphemeralOutcome {
            exit_code: Some(self.interactive_code),
            stderr: String::new(),
        })
    }

    async fn start_named(&self, spec: &ContainerSpec) -> Result<()> {
        self.record(format!("start {}", spec.name));
        let mut running = self.running.lock().expect("lock");
        if self.fail_start == Some(spec.role) || running.contains(&spec.name) {
            return Err(RuntimeError::StartFailed {
                name: spec.name.clone(),
                stderr: "simulated start failure".to_string(),
            }
            .into());
        }
        running.insert(spec.name.clone());
        Ok(())
    }

    async fn inspect(&self, name: &str) -> Result<Option<ContainerInfo>> {
        self.record(format!("inspect {name}"));
        let running = self.running.lock().expect("lock");
        Ok(running.contains(name).then(|| ContainerInfo {
            name: name.to_string(),
            running: true,
            ip_address: if name.starts_with("datacats_web_") {
                self.web_ip.clone()
            } else {
                "172.17.0.2".to_string()
            },
        }))
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.record(format!("remove {name}"));
        if self.fail_remove.as_deref() == Some(name) {
            return Err(RuntimeError::RemoveFailed {
                name: name.to_string(),
                stderr: "device or resource busy".to_string(),
            }
            .into());
        }
        self.running.lock().expect("lock").remove(name);
        Ok(())
    }
}

// ── Filesystem wrappers ──────────────────────────────────────────────────────

/// Local filesystem whose first `remove_dir_all` of each path fails, as if
/// the tree held files owned by a container user.
#[derive(Default)]
pub struct RootOwnedFs {
    refused: Mutex<HashSet<PathBuf>>,
}

impl ProjectFs for RootOwnedFs {
    fn is_dir(&self, path: &Path) -> bool {
        LocalProjectFs.is_dir(path)
    }
    fn create_dir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        LocalProjectFs.create_dir(path, mode)
    }
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalProjectFs.create_dir_all(path)
    }
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        LocalProjectFs.copy_file(from, to)
    }
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.refused.lock().expect("lock").insert(path.to_path_buf()) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        LocalProjectFs.remove_dir_all(path)
    }
}

/// Local filesystem that reports `hidden` as absent, so a precheck passes
/// while the directory really exists (a concurrent run won the race).
pub struct RacingFs {
    pub hidden: PathBuf,
}

impl ProjectFs for RacingFs {
    fn is_dir(&self, path: &Path) -> bool {
        path != self.hidden && LocalProjectFs.is_dir(path)
    }
    fn create_dir(&self, path: &Path, mode: Option<u32>) -> io::Result<()> {
        LocalProjectFs.create_dir(path, mode)
    }
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalProjectFs.create_dir_all(path)
    }
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        LocalProjectFs.copy_file(from, to)
    }
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        LocalProjectFs.remove_dir_all(path)
    }
}

// ── Command runner ───────────────────────────────────────────────────────────

/// One recorded process invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub interactive: bool,
}

/// Records invocations and replays queued outputs (success when empty).
#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Invocation>>,
    outputs: Mutex<VecDeque<Output>>,
    statuses: Mutex<VecDeque<ExitStatus>>,
}

impl RecordingRunner {
    pub fn with_outputs(outputs: impl IntoIterator<Item = Output>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_status(code: i32) -> Self {
        Self {
            statuses: Mutex::new(VecDeque::from([exit_status(code)])),
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], envs: &[(&str, &str)], interactive: bool) {
        self.invocations.lock().expect("lock").push(Invocation {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            envs: envs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            interactive,
        });
    }
}

impl CommandRunner for RecordingRunner {
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<Output> {
        self.record(program, args, envs, false);
        Ok(self
            .outputs
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| ok_output(b"")))
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<ExitStatus> {
        self.record(program, args, envs, true);
        Ok(self
            .statuses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| exit_status(0)))
    }
}

// ── Config store ─────────────────────────────────────────────────────────────

/// In-memory `ConfigStore`.
#[derive(Default)]
pub struct MemoryConfigStore {
    saved: Mutex<Option<DatacatsConfig>>,
}

impl MemoryConfigStore {
    pub fn saved(&self) -> Option<DatacatsConfig> {
        self.saved.lock().expect("lock").clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<DatacatsConfig> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, config: &DatacatsConfig) -> Result<()> {
        *self.saved.lock().expect("lock") = Some(config.clone());
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/memory/config.yaml"))
    }
}
