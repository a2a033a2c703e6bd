//! Compensating-action ledger for provisioning.
//!
//! Every step that creates a resource records its inverse here. When a run
//! fails, the ledger is unwound in reverse order, or its entries are listed
//! so the operator can clean up by hand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ContainerRuntime, ProgressReporter, ProjectFs};
use crate::domain::{RuntimeError, Stack};

/// Inverse of one resource-creating action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    RemoveDir(PathBuf),
    RemoveContainer(String),
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoveDir(path) => write!(f, "directory {}", path.display()),
            Self::RemoveContainer(name) => write!(f, "container {name}"),
        }
    }
}

/// Resources created so far, oldest first.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<Compensation>,
}

impl Ledger {
    pub fn record(&mut self, entry: Compensation) {
        self.entries.push(entry);
    }

    /// Forget an entry whose resource was removed deliberately.
    pub fn discharge(&mut self, entry: &Compensation) {
        self.entries.retain(|e| e != entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[Compensation] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every compensation newest first. Failures are reported and do not
    /// stop the unwind; the entries that could not be undone are returned.
    pub async fn unwind(
        self,
        runtime: &impl ContainerRuntime,
        fs: &impl ProjectFs,
        stack: &Stack<'_>,
        reporter: &impl ProgressReporter,
    ) -> Vec<Compensation> {
        let mut leftovers = Vec::new();
        for entry in self.entries.into_iter().rev() {
            let result = match &entry {
                Compensation::RemoveContainer(name) => runtime.remove(name).await,
                Compensation::RemoveDir(path) => remove_tree(runtime, fs, stack, path).await,
            };
            match result {
                Ok(()) => {
                    tracing::info!(%entry, "compensated");
                    reporter.step(&format!("removed {entry}"));
                }
                Err(e) => {
                    tracing::warn!(%entry, error = %e, "compensation failed");
                    reporter.warn(&format!("could not remove {entry}: {e:#}"));
                    leftovers.push(entry);
                }
            }
        }
        leftovers
    }
}

/// Remove a directory tree that may contain files owned by a container user.
///
/// Tries a local recursive delete first; if that fails, empties the tree
/// from inside a container and retries.
///
/// # Errors
///
/// Returns an error if both the local delete and the in-container wipe fail.
pub async fn remove_tree(
    runtime: &impl ContainerRuntime,
    fs: &impl ProjectFs,
    stack: &Stack<'_>,
    path: &Path,
) -> Result<()> {
    let Err(local) = fs.remove_dir_all(path) else {
        return Ok(());
    };
    tracing::debug!(path = %path.display(), error = %local, "local delete failed, wiping in container");

    let outcome = runtime
        .run_ephemeral(&stack.wipe_dir(path))
        .await
        .with_context(|| format!("wiping {}", path.display()))?;
    if !outcome.success() {
        return Err(RuntimeError::CommandFailed {
            step: format!("wipe {}", path.display()),
            code: outcome.code_display(),
            stderr: outcome.stderr,
        }
        .into());
    }
    fs.remove_dir_all(path)
        .with_context(|| format!("removing {}", path.display()))
}
