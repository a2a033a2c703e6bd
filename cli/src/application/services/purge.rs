//! Application service: tear down a project's containers and state.
//!
//! Addresses every resource by recomputing its name from the project name,
//! the same way `create` derived it. The project source tree is kept.

use anyhow::{Context, Result};

use crate::application::ports::{ContainerRuntime, ProgressReporter, ProjectFs};
use crate::application::services::ledger::remove_tree;
use crate::domain::{DirectoryLayout, ImageConfig, Project, Stack};

/// What `purge_project` removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub removed_containers: Vec<String>,
    pub datadir_removed: bool,
}

/// Remove the project's containers (web first) and its state directory.
///
/// # Errors
///
/// Returns an error if a container exists but cannot be removed, or the
/// state directory cannot be deleted.
pub async fn purge_project(
    runtime: &impl ContainerRuntime,
    fs: &impl ProjectFs,
    reporter: &impl ProgressReporter,
    project: &Project,
    images: &ImageConfig,
) -> Result<PurgeOutcome> {
    let mut outcome = PurgeOutcome::default();

    for name in datacats_common::project_containers(project.name()) {
        if runtime.inspect(&name).await?.is_none() {
            tracing::debug!(container = %name, "not present");
            continue;
        }
        reporter.step(&format!("removing container {name}"));
        runtime
            .remove(&name)
            .await
            .with_context(|| format!("removing {name}"))?;
        outcome.removed_containers.push(name);
    }

    let dirs = DirectoryLayout::for_project(project);
    if fs.is_dir(dirs.datadir()) {
        reporter.step(&format!("removing {}", dirs.datadir().display()));
        let stack = Stack::new(images, project.name(), &dirs);
        remove_tree(runtime, fs, &stack, dirs.datadir()).await?;
        outcome.datadir_removed = true;
    } else {
        reporter.warn(&format!(
            "no data directory at {}",
            dirs.datadir().display()
        ));
    }

    tracing::info!(
        project = project.name(),
        containers = outcome.removed_containers.len(),
        datadir = outcome.datadir_removed,
        "purged"
    );
    Ok(outcome)
}
