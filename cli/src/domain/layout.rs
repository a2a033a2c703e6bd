//! On-disk layout of a project.
//!
//! ```text
//! ~/.datacats/<name>/{venv,search,data,files}   persistent state (0700)
//! <workdir>/<name>/{conf,src}                   source and configuration
//! ```

use std::path::{Path, PathBuf};

use crate::domain::project::Project;

/// Config templates copied out of the seeded source tree into `conf/`.
pub const WHO_INI_TEMPLATE: &str = "ckan/ckan/config/who.ini";
pub const SOLR_SCHEMA_TEMPLATE: &str = "ckan/ckan/config/solr/schema.xml";

/// Mode of the persistent state directory: it holds secrets and database files.
pub const DATADIR_MODE: u32 = 0o700;

/// Computed paths for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    datadir: PathBuf,
    target: PathBuf,
}

impl DirectoryLayout {
    #[must_use]
    pub fn for_project(project: &Project) -> Self {
        Self {
            datadir: project.datadir().to_path_buf(),
            target: project.target().to_path_buf(),
        }
    }

    #[must_use]
    pub fn datadir(&self) -> &Path {
        &self.datadir
    }

    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Runtime/dependency tree.
    #[must_use]
    pub fn venv(&self) -> PathBuf {
        self.datadir.join("venv")
    }

    /// Search index state.
    #[must_use]
    pub fn search(&self) -> PathBuf {
        self.datadir.join("search")
    }

    /// Database state.
    #[must_use]
    pub fn data(&self) -> PathBuf {
        self.datadir.join("data")
    }

    /// User-uploaded file storage.
    #[must_use]
    pub fn files(&self) -> PathBuf {
        self.datadir.join("files")
    }

    #[must_use]
    pub fn conf(&self) -> PathBuf {
        self.target.join("conf")
    }

    #[must_use]
    pub fn src(&self) -> PathBuf {
        self.target.join("src")
    }

    /// Children of `datadir`, in creation order.
    #[must_use]
    pub fn state_dirs(&self) -> [PathBuf; 4] {
        [self.venv(), self.search(), self.data(), self.files()]
    }

    /// Children of `target`, in creation order.
    #[must_use]
    pub fn tree_dirs(&self) -> [PathBuf; 2] {
        [self.conf(), self.src()]
    }

    /// `(template in src, destination in conf)` pairs for the local copies.
    #[must_use]
    pub fn template_copies(&self) -> [(PathBuf, PathBuf); 2] {
        [
            (self.src().join(WHO_INI_TEMPLATE), self.conf().join("who.ini")),
            (
                self.src().join(SOLR_SCHEMA_TEMPLATE),
                self.conf().join("schema.xml"),
            ),
        ]
    }

    #[must_use]
    pub fn schema_xml(&self) -> PathBuf {
        self.conf().join("schema.xml")
    }

    #[must_use]
    pub fn ckan_ini(&self) -> PathBuf {
        self.conf().join("ckan.ini")
    }
}
