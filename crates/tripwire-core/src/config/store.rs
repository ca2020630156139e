//! Config store for loading the projects file.

use std::path::{Path, PathBuf};

use super::{TripwireConfig, parser, paths::resolve_config_path};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Locate the config file, honoring an explicit path when given.
    pub fn locate(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self::from_path(resolve_config_path(explicit)?))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration. A missing file is an error.
    pub fn load(&self) -> anyhow::Result<TripwireConfig> {
        if !self.config_path.exists() {
            anyhow::bail!("Config file not found: {}", self.config_path.display());
        }
        parser::parse_config_file(&self.config_path)
    }
}
