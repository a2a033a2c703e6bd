//! Naming contract for project resources.
//!
//! Every operation that addresses a project's containers or state directory
//! (create, purge, re-attach) recomputes names from the project name alone,
//! so these functions must stay stable across releases.

use crate::types::ContainerRole;

/// Prefix shared by every container this tool creates.
pub const CONTAINER_PREFIX: &str = "datacats";

/// Directory under the user's home that holds per-project persistent state.
pub const DATA_ROOT_DIR: &str = ".datacats";

/// Hostname under which dependent containers reach the database.
pub const DB_ALIAS: &str = "db";

/// Hostname under which dependent containers reach the search engine.
pub const SOLR_ALIAS: &str = "solr";

/// Deterministic container name: `datacats_<role>_<project>`.
#[must_use]
pub fn container_name(role: ContainerRole, project: &str) -> String {
    format!("{CONTAINER_PREFIX}_{}_{project}", role.as_str())
}

/// Names of all containers a project may own, in teardown order
/// (dependents before their dependencies).
#[must_use]
pub fn project_containers(project: &str) -> [String; 3] {
    [
        container_name(ContainerRole::Web, project),
        container_name(ContainerRole::Search, project),
        container_name(ContainerRole::Data, project),
    ]
}
