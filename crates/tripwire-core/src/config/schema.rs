//! Configuration schema types.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripwireConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Projects keyed by name, in document order
    #[serde(default)]
    pub projects: IndexMap<String, ProjectProperties>,
}

impl TripwireConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, properties) in &self.projects {
            if name.trim().is_empty() {
                anyhow::bail!("Project name cannot be empty");
            }
            if properties.directory.as_os_str().is_empty() {
                anyhow::bail!("Project '{}' has an empty directory", name);
            }
            if properties.branch.trim().is_empty() {
                anyhow::bail!("Project '{}' has an empty branch", name);
            }
        }
        Ok(())
    }
}

/// Properties of a single deployable project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProperties {
    /// Path to the git working copy
    pub directory: PathBuf,
    /// Branch pulled from `origin`
    pub branch: String,
    /// Project language (`Python`, `VB` or `C#`)
    pub language: String,
    /// Where build output is published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_location: Option<PathBuf>,
}

impl ProjectProperties {
    pub fn new(
        directory: impl Into<PathBuf>,
        branch: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            branch: branch.into(),
            language: language.into(),
            publish_location: None,
        }
    }

    pub fn with_publish_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.publish_location = Some(location.into());
        self
    }
}

/// Logging sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `tripwire_core=debug,warn`
    pub level: String,
    /// Append log lines to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Colored output (only honored on stderr)
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            ansi: true,
        }
    }
}
