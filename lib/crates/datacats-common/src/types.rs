use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a long-lived project container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRole {
    /// Relational database.
    Data,
    /// Search index engine.
    Search,
    /// Web application.
    Web,
}

impl ContainerRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Search => "search",
            Self::Web => "web",
        }
    }
}

impl std::fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful `create`, emitted as JSON in `--json` mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateReport {
    /// Project name.
    pub project: String,
    /// Persistent state directory (`~/.datacats/<name>`).
    pub datadir: String,
    /// Project source and configuration tree.
    pub target: String,
    /// Containers left running after the command.
    pub containers: Vec<String>,
    /// Site URL; absent in image-only mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether the run only prepared image state.
    pub image_only: bool,
    pub created_at: DateTime<Utc>,
}
