//! Application service: create a project stack.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The pipeline is linear: each step must fully succeed before the next
//! begins, and the first failure stops the run. Resources created along the
//! way are tracked in a [`Ledger`] and either unwound or listed on failure.

use anyhow::{Context, Result};
use datacats_common::ContainerRole;

use crate::application::ports::{ContainerRuntime, ProgressReporter, ProjectFs, SecretGenerator};
use crate::application::services::layout;
use crate::application::services::ledger::{Compensation, Ledger};
use crate::domain::{
    CredentialSet, DirectoryLayout, EphemeralCommand, ImageConfig, LayoutError, Project,
    RuntimeError, Stack, compute_assignments,
};

/// Provisioning steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Validate,
    GenerateSecrets,
    CreateLayout,
    SeedRuntime,
    SeedSource,
    FixStorageOwnership,
    GenerateBaseConfig,
    PatchConfig,
    FixTreeOwnership,
    StartDataAndSearch,
    InitSchema,
    RemoveServices,
    StartWeb,
    AdminSession,
}

impl Step {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Validate => "validating project",
            Self::GenerateSecrets => "generating credentials",
            Self::CreateLayout => "creating project directories",
            Self::SeedRuntime => "copying runtime environment",
            Self::SeedSource => "copying application source",
            Self::FixStorageOwnership => "setting file storage ownership",
            Self::GenerateBaseConfig => "generating application config",
            Self::PatchConfig => "writing connection settings",
            Self::FixTreeOwnership => "restoring project file ownership",
            Self::StartDataAndSearch => "starting database and search containers",
            Self::InitSchema => "initialising database",
            Self::RemoveServices => "removing database and search containers",
            Self::StartWeb => "starting web container",
            Self::AdminSession => "creating administrator account",
        }
    }
}

/// Options for `create_project`.
#[derive(Debug, Clone, Copy)]
pub struct CreateOptions {
    /// Stop after schema initialisation and remove the service containers.
    pub image_only: bool,
    /// Launch the interactive administrator session at the end.
    pub sysadmin: bool,
    /// Unwind created resources when a step fails.
    pub rollback: bool,
}

/// Outcome of a successful `create_project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// Containers left running.
    pub containers: Vec<String>,
    /// Network address of the web container; `None` in image-only mode.
    pub address: Option<String>,
}

impl CreateOutcome {
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.address.as_ref().map(|ip| format!("http://{ip}/"))
    }
}

/// Create the full project stack.
///
/// Accepts port trait bounds so the caller can inject real or mock
/// implementations. The service never touches any presentation type.
///
/// # Errors
///
/// A `ValidationError` before anything is created; otherwise the error of
/// the first failing step, after the ledger has been unwound or reported.
pub async fn create_project(
    runtime: &impl ContainerRuntime,
    fs: &impl ProjectFs,
    secrets: &impl SecretGenerator,
    reporter: &impl ProgressReporter,
    project: &Project,
    images: &ImageConfig,
    opts: CreateOptions,
) -> Result<CreateOutcome> {
    tracing::debug!(project = project.name(), ?opts, "create requested");
    reporter.step(Step::Validate.describe());
    layout::precheck(fs, project)?;

    reporter.step(Step::GenerateSecrets.describe());
    let credentials = secrets
        .generate()
        .context("generating credentials")?;

    let dirs = DirectoryLayout::for_project(project);
    let stack = Stack::new(images, project.name(), &dirs);
    let mut ledger = Ledger::default();

    let result = provision(runtime, fs, reporter, &stack, &credentials, &mut ledger, opts).await;
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(project = project.name(), error = %err, "create failed");
            handle_failure(runtime, fs, reporter, &stack, ledger, opts.rollback).await;
            return Err(err);
        }
    };
    reporter.success(&format!("project \"{}\" created", project.name()));
    if let Some(url) = outcome.url() {
        reporter.success(&format!("site available at {url}"));
    }

    if opts.sysadmin && !opts.image_only {
        admin_session(runtime, reporter, &stack).await;
    }
    Ok(outcome)
}

/// Steps 3 to 13.
async fn provision(
    runtime: &impl ContainerRuntime,
    fs: &impl ProjectFs,
    reporter: &impl ProgressReporter,
    stack: &Stack<'_>,
    credentials: &CredentialSet,
    ledger: &mut Ledger,
    opts: CreateOptions,
) -> Result<CreateOutcome> {
    reporter.step(Step::CreateLayout.describe());
    layout::create(fs, stack.layout, ledger)?;

    run_step(runtime, reporter, Step::SeedRuntime, &stack.seed_runtime()).await?;

    run_step(runtime, reporter, Step::SeedSource, &stack.seed_source()).await?;
    for (from, to) in stack.layout.template_copies() {
        fs.copy_file(&from, &to)
            .map_err(|source| LayoutError::Copy { from, to, source })?;
    }

    run_step(
        runtime,
        reporter,
        Step::FixStorageOwnership,
        &stack.fix_storage_ownership(),
    )
    .await?;
    run_step(runtime, reporter, Step::GenerateBaseConfig, &stack.make_config()).await?;

    let assignments = compute_assignments(credentials);
    run_step(
        runtime,
        reporter,
        Step::PatchConfig,
        &stack.patch_config(&assignments),
    )
    .await?;
    run_step(
        runtime,
        reporter,
        Step::FixTreeOwnership,
        &stack.fix_tree_ownership(),
    )
    .await?;

    start_services(runtime, reporter, stack, credentials, ledger).await?;
    run_step(runtime, reporter, Step::InitSchema, &stack.db_init()).await?;

    if opts.image_only {
        reporter.step(Step::RemoveServices.describe());
        for role in [ContainerRole::Data, ContainerRole::Search] {
            let name = stack.name(role);
            runtime
                .remove(&name)
                .await
                .with_context(|| format!("removing {name}"))?;
            ledger.discharge(&Compensation::RemoveContainer(name));
        }
        return Ok(CreateOutcome {
            containers: Vec::new(),
            address: None,
        });
    }

    reporter.step(Step::StartWeb.describe());
    let web = stack.web_container();
    runtime.start_named(&web).await?;
    ledger.record(Compensation::RemoveContainer(web.name.clone()));

    let info = runtime
        .inspect(&web.name)
        .await?
        .ok_or_else(|| RuntimeError::InspectFailed {
            name: web.name.clone(),
            stderr: "container vanished after start".to_string(),
        })?;
    if info.ip_address.is_empty() {
        return Err(RuntimeError::MissingAddress(web.name).into());
    }

    Ok(CreateOutcome {
        containers: vec![
            stack.name(ContainerRole::Data),
            stack.name(ContainerRole::Search),
            web.name,
        ],
        address: Some(info.ip_address),
    })
}

/// Step 10: the two starts are independent and run concurrently; both must
/// succeed before the schema can be initialised.
async fn start_services(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    stack: &Stack<'_>,
    credentials: &CredentialSet,
    ledger: &mut Ledger,
) -> Result<()> {
    reporter.step(Step::StartDataAndSearch.describe());
    let data = stack.data_container(credentials);
    let search = stack.search_container();

    let (data_started, search_started) =
        tokio::join!(runtime.start_named(&data), runtime.start_named(&search));

    // Only containers this run actually started are ours to remove.
    if data_started.is_ok() {
        ledger.record(Compensation::RemoveContainer(data.name.clone()));
    }
    if search_started.is_ok() {
        ledger.record(Compensation::RemoveContainer(search.name.clone()));
    }
    data_started?;
    search_started?;
    tracing::info!(data = %data.name, search = %search.name, "service containers started");
    Ok(())
}

async fn run_step(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    step: Step,
    cmd: &EphemeralCommand,
) -> Result<()> {
    reporter.step(step.describe());
    tracing::debug!(?step, image = %cmd.image, "running ephemeral command");
    let outcome = runtime
        .run_ephemeral(cmd)
        .await
        .with_context(|| step.describe())?;
    if !outcome.success() {
        return Err(RuntimeError::CommandFailed {
            step: step.describe().to_string(),
            code: outcome.code_display(),
            stderr: outcome.stderr,
        }
        .into());
    }
    Ok(())
}

async fn handle_failure(
    runtime: &impl ContainerRuntime,
    fs: &impl ProjectFs,
    reporter: &impl ProgressReporter,
    stack: &Stack<'_>,
    ledger: Ledger,
    rollback: bool,
) {
    if ledger.is_empty() {
        return;
    }
    let leftovers = if rollback {
        reporter.warn("create failed, removing what was created...");
        ledger.unwind(runtime, fs, stack, reporter).await
    } else {
        ledger.entries().to_vec()
    };
    if !leftovers.is_empty() {
        reporter.warn("the following resources were left behind:");
        for entry in &leftovers {
            reporter.warn(&format!("  {entry}"));
        }
        let target = stack.layout.target();
        reporter.warn(&format!("remove them with: datacats purge {}", target.display()));
        if leftovers.contains(&Compensation::RemoveDir(target.to_path_buf())) {
            // purge leaves project trees in place
            reporter.warn(&format!("then delete the directory {}", target.display()));
        }
    }
}

/// Step 14. The stack is already up, so a failed session is reported but
/// does not fail the command.
async fn admin_session(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    stack: &Stack<'_>,
) {
    reporter.step(Step::AdminSession.describe());
    match runtime.run_interactive(&stack.sysadmin_session()).await {
        Ok(outcome) if outcome.success() => reporter.success("administrator account created"),
        Ok(outcome) => reporter.warn(&format!(
            "administrator session exited with code {}",
            outcome.code_display()
        )),
        Err(e) => reporter.warn(&format!("could not start administrator session: {e:#}")),
    }
}
