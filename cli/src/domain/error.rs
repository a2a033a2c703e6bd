//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Raised before anything is created; the user can fix the input and retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid project name '{0}': choose a name starting with a letter and \
including only lowercase letters and digits"
    )]
    InvalidName(String),

    #[error("Parent directory for project does not exist: {}", .0.display())]
    ParentMissing(PathBuf),

    #[error("Project data directory {} already exists.", .0.display())]
    DataDirExists(PathBuf),

    #[error("Project directory {} already exists.", .0.display())]
    ProjectDirExists(PathBuf),
}

// ── Layout errors ─────────────────────────────────────────────────────────────

/// Local filesystem failures while materialising the project tree.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cannot create directory {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot copy {} to {}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Runtime errors ────────────────────────────────────────────────────────────

/// Failures reported by the container runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{step} failed (exit code {code}){}", fmt_stderr(.stderr))]
    CommandFailed {
        step: String,
        code: String,
        stderr: String,
    },

    #[error("container {name} failed to start{}", fmt_stderr(.stderr))]
    StartFailed { name: String, stderr: String },

    #[error("cannot inspect container {name}{}", fmt_stderr(.stderr))]
    InspectFailed { name: String, stderr: String },

    #[error("cannot remove container {name}{}", fmt_stderr(.stderr))]
    RemoveFailed { name: String, stderr: String },

    #[error("container {0} has no network address")]
    MissingAddress(String),
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
