//! `datacats purge <path>`: remove a project's containers and state.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::purge::purge_project;
use crate::domain::{DirectoryLayout, Project};
use crate::output::json;

/// Arguments for the purge command.
#[derive(Args)]
pub struct PurgeArgs {
    /// Path of the project directory
    pub path: PathBuf,
}

/// Run `datacats purge`.
///
/// The project source tree is never touched.
///
/// # Errors
///
/// Returns an error if a container or the data directory cannot be removed.
pub async fn run(app: &AppContext, args: &PurgeArgs) -> Result<()> {
    let project = Project::from_path(&args.path, &app.cwd, &app.home)?;
    let dirs = DirectoryLayout::for_project(&project);

    if !app.is_json() && !app.output.quiet {
        println!();
        println!("This will permanently remove:");
        for name in datacats_common::project_containers(project.name()) {
            println!("  • container {name}");
        }
        println!("  • {}", dirs.datadir().display());
        println!();
        println!("{} will be kept.", project.target().display());
        println!();
    }

    if !app.confirm("Continue?", true)? {
        app.output.info("Cancelled.");
        return Ok(());
    }

    let outcome = purge_project(
        &app.runtime,
        &app.fs,
        &app.reporter(),
        &project,
        &app.config.images,
    )
    .await?;

    if app.is_json() {
        json::print(&serde_json::json!({
            "project": project.name(),
            "removed_containers": outcome.removed_containers,
            "datadir_removed": outcome.datadir_removed,
        }))
    } else {
        app.renderer().render_purge(project.name(), &outcome);
        Ok(())
    }
}
