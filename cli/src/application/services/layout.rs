//! Application service: project directory precheck and creation.

use std::io::ErrorKind;

use anyhow::Result;

use crate::application::ports::ProjectFs;
use crate::application::services::ledger::{Compensation, Ledger};
use crate::domain::layout::DATADIR_MODE;
use crate::domain::{DirectoryLayout, LayoutError, Project, ValidationError};

/// Check that the project can be created without touching anything that
/// already exists. Nothing is mutated.
///
/// # Errors
///
/// `ParentMissing` if the project's parent directory is absent;
/// `DataDirExists` / `ProjectDirExists` on collision.
pub fn precheck(fs: &impl ProjectFs, project: &Project) -> Result<(), ValidationError> {
    if !fs.is_dir(project.workdir()) {
        return Err(ValidationError::ParentMissing(project.workdir().to_path_buf()));
    }
    if fs.is_dir(project.datadir()) {
        return Err(ValidationError::DataDirExists(project.datadir().to_path_buf()));
    }
    if fs.is_dir(project.target()) {
        return Err(ValidationError::ProjectDirExists(project.target().to_path_buf()));
    }
    Ok(())
}

/// Materialise the directory tree.
///
/// Both top-level directories are claimed with exclusive creation, so a
/// concurrent run for the same name fails here even if it passed
/// `precheck`. Each claimed directory is recorded in `ledger`. No rollback
/// happens in this function.
///
/// # Errors
///
/// A `ValidationError` if a top-level directory appeared after the
/// precheck, otherwise a `LayoutError`.
pub fn create(fs: &impl ProjectFs, layout: &DirectoryLayout, ledger: &mut Ledger) -> Result<()> {
    if let Some(root) = layout.datadir().parent() {
        fs.create_dir_all(root).map_err(|source| LayoutError::Create {
            path: root.to_path_buf(),
            source,
        })?;
    }

    claim(fs, layout.datadir(), Some(DATADIR_MODE)).map_err(|e| match e {
        Claim::Taken => anyhow::Error::from(ValidationError::DataDirExists(
            layout.datadir().to_path_buf(),
        )),
        Claim::Failed(err) => err.into(),
    })?;
    ledger.record(Compensation::RemoveDir(layout.datadir().to_path_buf()));
    for dir in layout.state_dirs() {
        make(fs, &dir)?;
    }

    claim(fs, layout.target(), None).map_err(|e| match e {
        Claim::Taken => anyhow::Error::from(ValidationError::ProjectDirExists(
            layout.target().to_path_buf(),
        )),
        Claim::Failed(err) => err.into(),
    })?;
    ledger.record(Compensation::RemoveDir(layout.target().to_path_buf()));
    for dir in layout.tree_dirs() {
        make(fs, &dir)?;
    }
    Ok(())
}

enum Claim {
    Taken,
    Failed(LayoutError),
}

fn claim(fs: &impl ProjectFs, path: &std::path::Path, mode: Option<u32>) -> Result<(), Claim> {
    fs.create_dir(path, mode).map_err(|source| {
        if source.kind() == ErrorKind::AlreadyExists {
            Claim::Taken
        } else {
            Claim::Failed(LayoutError::Create {
                path: path.to_path_buf(),
                source,
            })
        }
    })
}

fn make(fs: &impl ProjectFs, path: &std::path::Path) -> Result<(), LayoutError> {
    fs.create_dir(path, None).map_err(|source| LayoutError::Create {
        path: path.to_path_buf(),
        source,
    })
}
