//! `datacats create <path>`: provision a new project stack.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use datacats_common::CreateReport;

use crate::app::AppContext;
use crate::application::services::provision::{self, CreateOptions};
use crate::domain::Project;
use crate::output::json;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Path of the new project directory; its last component is the project name
    pub path: PathBuf,

    /// Prepare database and source state only, without a running site
    #[arg(long)]
    pub image_only: bool,

    /// Skip the interactive administrator account session
    #[arg(long)]
    pub no_sysadmin: bool,

    /// Leave created directories and containers in place if a step fails
    #[arg(long)]
    pub keep_on_failure: bool,
}

impl CreateArgs {
    fn options(&self, app: &AppContext) -> CreateOptions {
        CreateOptions {
            image_only: self.image_only,
            // The session needs the terminal, which JSON and unattended runs do not own.
            sysadmin: !self.no_sysadmin && !app.is_json() && !app.non_interactive,
            rollback: app.config.provision.rollback && !self.keep_on_failure,
        }
    }
}

/// Run `datacats create`.
///
/// # Errors
///
/// Returns a `ValidationError` if the name or paths are unacceptable, or
/// the error of the first provisioning step that fails.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<()> {
    let project = Project::from_path(&args.path, &app.cwd, &app.home)?;
    let opts = args.options(app);

    let outcome = provision::create_project(
        &app.runtime,
        &app.fs,
        &app.secrets,
        &app.reporter(),
        &project,
        &app.config.images,
        opts,
    )
    .await?;

    let report = CreateReport {
        project: project.name().to_owned(),
        datadir: project.datadir().display().to_string(),
        target: project.target().display().to_string(),
        url: outcome.url(),
        containers: outcome.containers,
        image_only: opts.image_only,
        created_at: Utc::now(),
    };

    if app.is_json() {
        json::print(&report)
    } else {
        app.renderer().render_create(&report);
        Ok(())
    }
}
