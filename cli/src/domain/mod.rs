//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod layout;
pub mod project;
pub mod secrets;
pub mod settings;
pub mod stack;

pub use config::{DatacatsConfig, ImageConfig, validate_config_key, validate_config_value};
pub use container::{Attach, ContainerInfo, ContainerSpec, EphemeralCommand, EphemeralOutcome};
pub use error::{ConfigError, LayoutError, RuntimeError, ValidationError};
pub use layout::DirectoryLayout;
pub use project::Project;
pub use secrets::{CredentialSet, Secret};
pub use settings::{ConfigAssignment, compute_assignments};
pub use stack::Stack;
