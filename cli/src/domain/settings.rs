//! Application configuration values derived from generated secrets.
//!
//! Key names belong to the web application's config schema and must be
//! preserved verbatim.

use datacats_common::{DB_ALIAS, SOLR_ALIAS};

use crate::domain::secrets::CredentialSet;

/// Storage path inside the web container, bound to `datadir/files`.
pub const STORAGE_PATH: &str = "/var/www/storage";

/// One `key = value` edit applied to the application config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigAssignment {
    pub key: &'static str,
    pub value: String,
}

impl ConfigAssignment {
    /// Render as a single config-tool argument (`key = value`).
    #[must_use]
    pub fn render(&self) -> String {
        format!("{} = {}", self.key, self.value)
    }
}

/// Derive the config edits for a freshly generated credential set.
///
/// Pure: identical secrets always yield identical, identically ordered
/// assignments.
#[must_use]
pub fn compute_assignments(secrets: &CredentialSet) -> Vec<ConfigAssignment> {
    vec![
        ConfigAssignment {
            key: "sqlalchemy.url",
            value: format!(
                "postgresql://ckan:{}@{DB_ALIAS}:5432/ckan",
                secrets.ckan.expose()
            ),
        },
        ConfigAssignment {
            key: "ckan.datastore.read_url",
            value: format!(
                "postgresql://ckan_datastore_readonly:{}@{DB_ALIAS}:5432/ckan_datastore",
                secrets.datastore_ro.expose()
            ),
        },
        ConfigAssignment {
            key: "ckan.datastore.write_url",
            value: format!(
                "postgresql://ckan_datastore_readwrite:{}@{DB_ALIAS}:5432/ckan_datastore",
                secrets.datastore_rw.expose()
            ),
        },
        ConfigAssignment {
            key: "solr_url",
            value: format!("http://{SOLR_ALIAS}:8080/solr"),
        },
        ConfigAssignment {
            key: "ckan.storage_path",
            value: STORAGE_PATH.to_string(),
        },
    ]
}
