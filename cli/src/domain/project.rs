//! Project identity and derived paths.
//!
//! A `Project` is constructed once at the command entry point and threaded
//! through every step, so no step consults the working directory or the
//! home directory on its own.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use datacats_common::DATA_ROOT_DIR;
use regex::Regex;

use crate::domain::error::ValidationError;

/// Project names: a leading lowercase letter followed by lowercase letters
/// and digits. Names end up in container names and paths.
pub static PROJECT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][a-z0-9]*$").expect("valid regex")
});

/// Returns `true` if `name` satisfies the project name grammar.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    PROJECT_NAME_RE.is_match(name)
}

/// A project being provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    workdir: PathBuf,
    target: PathBuf,
    datadir: PathBuf,
}

impl Project {
    /// Build a project from the user-supplied path.
    ///
    /// Relative paths are resolved against `cwd` and normalised lexically;
    /// the last component is the project name and the rest is `workdir`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidName` when the last path component
    /// does not match the name grammar.
    pub fn from_path(path: &Path, cwd: &Path, home: &Path) -> Result<Self, ValidationError> {
        let absolute = normalize(&cwd.join(path));
        let name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_valid_name(&name) {
            return Err(ValidationError::InvalidName(name));
        }
        let workdir = absolute
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
        Ok(Self {
            target: workdir.join(&name),
            datadir: home.join(DATA_ROOT_DIR).join(&name),
            workdir,
            name,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent of the project tree.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Project source and configuration tree.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Persistent state tree under the per-user data root.
    #[must_use]
    pub fn datadir(&self) -> &Path {
        &self.datadir
    }
}

/// Lexically remove `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
