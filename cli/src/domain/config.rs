//! Domain types and validators for datacats configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "images.web",
    "images.data",
    "images.search",
    "runtime.program",
    "runtime.timeout_secs",
    "provision.rollback",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.datacats/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DatacatsConfig {
    pub images: ImageConfig,
    pub runtime: RuntimeConfig,
    pub provision: ProvisionConfig,
}

/// Images for the three container roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageConfig {
    pub web: String,
    pub data: String,
    pub search: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            web: "datacats/web".to_string(),
            data: "datacats/data".to_string(),
            search: "datacats/search".to_string(),
        }
    }
}

/// Container runtime CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime binary, e.g. `docker` or `podman`.
    pub program: String,
    /// Per-command timeout. Unset means commands may run indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            timeout_secs: None,
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Provisioning behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Undo created resources when a create run fails.
    pub rollback: bool,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self { rollback: true }
    }
}

impl DatacatsConfig {
    /// Validate and apply one `key = value` setting.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "images.web" => self.images.web = value.to_string(),
            "images.data" => self.images.data = value.to_string(),
            "images.search" => self.images.search = value.to_string(),
            "runtime.program" => self.runtime.program = value.to_string(),
            "runtime.timeout_secs" => {
                self.runtime.timeout_secs = if value == "none" {
                    None
                } else {
                    value.parse().ok()
                };
            }
            "provision.rollback" => self.provision.rollback = value == "true",
            other => anyhow::bail!("Unknown setting: {other}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let expected = match key {
        "images.web" | "images.data" | "images.search" | "runtime.program"
            if value.is_empty() || value.chars().any(char::is_whitespace) =>
        {
            Some("a non-empty value without whitespace")
        }
        "runtime.timeout_secs"
            if value != "none" && !value.parse::<u64>().is_ok_and(|n| n > 0) =>
        {
            Some("a positive number of seconds, or none")
        }
        "provision.rollback" if value != "true" && value != "false" => Some("true or false"),
        _ => None,
    };
    if let Some(expected) = expected {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
