//! Container invocations that make up a project stack.
//!
//! Pure builders: every step of provisioning is described here as an
//! `EphemeralCommand` or `ContainerSpec`, and the application layer only
//! sequences them. Paths inside containers are the web image's contract.

use std::path::Path;

use datacats_common::{ContainerRole, DB_ALIAS, SOLR_ALIAS, container_name};

use crate::domain::config::ImageConfig;
use crate::domain::container::{Attach, ContainerSpec, EphemeralCommand};
use crate::domain::layout::DirectoryLayout;
use crate::domain::secrets::CredentialSet;
use crate::domain::settings::{ConfigAssignment, STORAGE_PATH};

pub const VENV_MOUNT: &str = "/usr/lib/ckan";
const VENV_SEED_MOUNT: &str = "/usr/lib/ckan_target";
pub const SRC_MOUNT: &str = "/project/src";
const SRC_SEED_MOUNT: &str = "/project/src_target";
pub const CONF_MOUNT: &str = "/etc/ckan/default";
pub const CKAN_INI: &str = "/etc/ckan/default/ckan.ini";
const PASTER: &str = "/usr/lib/ckan/bin/paster";
const PG_DATA_MOUNT: &str = "/var/lib/postgresql/data";
const SOLR_DATA_MOUNT: &str = "/var/lib/solr";
const SOLR_SCHEMA_MOUNT: &str = "/etc/solr/conf/schema.xml";
const WIPE_MOUNT: &str = "/wipe";

/// Identity the long-lived web container serves files as.
pub const WEB_USER: &str = "www-data";

/// Everything needed to describe one project's containers.
#[derive(Debug, Clone, Copy)]
pub struct Stack<'a> {
    pub images: &'a ImageConfig,
    pub project: &'a str,
    pub layout: &'a DirectoryLayout,
}

impl<'a> Stack<'a> {
    #[must_use]
    pub fn new(images: &'a ImageConfig, project: &'a str, layout: &'a DirectoryLayout) -> Self {
        Self {
            images,
            project,
            layout,
        }
    }

    #[must_use]
    pub fn name(&self, role: ContainerRole) -> String {
        container_name(role, self.project)
    }

    /// Copy the baked-in runtime tree into `venv`.
    #[must_use]
    pub fn seed_runtime(&self) -> EphemeralCommand {
        EphemeralCommand::new(
            &self.images.web,
            ["/bin/cp", "-a", "/usr/lib/ckan/.", "/usr/lib/ckan_target/."],
        )
        .rw(self.layout.venv(), VENV_SEED_MOUNT)
    }

    /// Copy the baked-in application source into `src`.
    #[must_use]
    pub fn seed_source(&self) -> EphemeralCommand {
        EphemeralCommand::new(
            &self.images.web,
            ["/bin/cp", "-a", "/project/src/.", "/project/src_target/."],
        )
        .rw(self.layout.src(), SRC_SEED_MOUNT)
    }

    /// Hand file storage to the web container's user.
    #[must_use]
    pub fn fix_storage_ownership(&self) -> EphemeralCommand {
        let owner = format!("{WEB_USER}:");
        EphemeralCommand::new(
            &self.images.web,
            ["/bin/chown", "-R", owner.as_str(), STORAGE_PATH],
        )
        .rw(self.layout.files(), STORAGE_PATH)
    }

    /// Write the initial `ckan.ini` with the application's own generator.
    #[must_use]
    pub fn make_config(&self) -> EphemeralCommand {
        EphemeralCommand::new(&self.images.web, [PASTER, "make-config", "ckan", CKAN_INI])
            .ro(self.layout.venv(), VENV_MOUNT)
            .ro(self.layout.src(), SRC_MOUNT)
            .rw(self.layout.conf(), CONF_MOUNT)
    }

    /// Apply computed assignments with a single config-tool invocation.
    /// Each assignment is one argument; nothing passes through a shell.
    #[must_use]
    pub fn patch_config(&self, assignments: &[ConfigAssignment]) -> EphemeralCommand {
        let mut argv = vec![
            PASTER.to_string(),
            "--plugin=ckan".to_string(),
            "config-tool".to_string(),
            CKAN_INI.to_string(),
            "-e".to_string(),
        ];
        argv.extend(assignments.iter().map(ConfigAssignment::render));
        EphemeralCommand::new(&self.images.web, argv)
            .ro(self.layout.venv(), VENV_MOUNT)
            .ro(self.layout.src(), SRC_MOUNT)
            .rw(self.layout.conf(), CONF_MOUNT)
    }

    /// Re-own runtime, source and config to the owner of the config dir,
    /// which is the invoking user.
    #[must_use]
    pub fn fix_tree_ownership(&self) -> EphemeralCommand {
        let reference = format!("--reference={CONF_MOUNT}");
        EphemeralCommand::new(
            &self.images.web,
            [
                "/bin/chown",
                "-R",
                reference.as_str(),
                VENV_MOUNT,
                SRC_MOUNT,
                CONF_MOUNT,
            ],
        )
        .rw(self.layout.venv(), VENV_MOUNT)
        .rw(self.layout.src(), SRC_MOUNT)
        .rw(self.layout.conf(), CONF_MOUNT)
    }

    /// Database container; needs every password on first start.
    #[must_use]
    pub fn data_container(&self, secrets: &CredentialSet) -> ContainerSpec {
        ContainerSpec::new(ContainerRole::Data, self.project, &self.images.data)
            .env("POSTGRES_PASSWORD", &secrets.postgres)
            .env("CKAN_PASSWORD", &secrets.ckan)
            .env("DATASTORE_RO_PASSWORD", &secrets.datastore_ro)
            .env("DATASTORE_RW_PASSWORD", &secrets.datastore_rw)
            .rw(self.layout.data(), PG_DATA_MOUNT)
    }

    /// Search container using the schema copied into `conf`.
    #[must_use]
    pub fn search_container(&self) -> ContainerSpec {
        ContainerSpec::new(ContainerRole::Search, self.project, &self.images.search)
            .rw(self.layout.search(), SOLR_DATA_MOUNT)
            .ro(self.layout.schema_xml(), SOLR_SCHEMA_MOUNT)
    }

    /// Initialise the application database schema.
    #[must_use]
    pub fn db_init(&self) -> EphemeralCommand {
        self.linked_app_command([PASTER, "--plugin=ckan", "db", "init", "-c", CKAN_INI])
    }

    /// The long-lived web application container.
    #[must_use]
    pub fn web_container(&self) -> ContainerSpec {
        ContainerSpec::new(ContainerRole::Web, self.project, &self.images.web)
            .rw(self.layout.files(), STORAGE_PATH)
            .ro(self.layout.venv(), VENV_MOUNT)
            .ro(self.layout.src(), SRC_MOUNT)
            .ro(self.layout.conf(), CONF_MOUNT)
            .link(&self.name(ContainerRole::Search), SOLR_ALIAS)
            .link(&self.name(ContainerRole::Data), DB_ALIAS)
    }

    /// Interactive creation of the first administrative account.
    #[must_use]
    pub fn sysadmin_session(&self) -> EphemeralCommand {
        self.linked_app_command([
            PASTER,
            "--plugin=ckan",
            "sysadmin",
            "add",
            "admin",
            "-c",
            CKAN_INI,
        ])
    }

    /// Delete the contents of `dir` as the container's root user; used when
    /// files created inside containers cannot be removed by the local user.
    #[must_use]
    pub fn wipe_dir(&self, dir: &Path) -> EphemeralCommand {
        EphemeralCommand::new(
            &self.images.web,
            ["find", WIPE_MOUNT, "-mindepth", "1", "-delete"],
        )
        .rw(dir, WIPE_MOUNT)
    }

    fn linked_app_command<const N: usize>(&self, argv: [&str; N]) -> EphemeralCommand {
        EphemeralCommand::new(&self.images.web, argv)
            .ro(self.layout.venv(), VENV_MOUNT)
            .ro(self.layout.src(), SRC_MOUNT)
            .ro(self.layout.conf(), CONF_MOUNT)
            .link(&self.name(ContainerRole::Search), SOLR_ALIAS)
            .link(&self.name(ContainerRole::Data), DB_ALIAS)
    }
}
