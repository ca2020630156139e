//! Config path resolution helpers.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "TRIPWIRE_CONFIG";

/// Resolve the config file path.
///
/// Order: explicit path, then `$TRIPWIRE_CONFIG`, then
/// `<config dir>/tripwire/config.json`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    resolve_config_path_with(explicit, std::env::var_os(CONFIG_ENV_VAR))
}

/// Resolve the config file path given the value of `$TRIPWIRE_CONFIG`.
/// An empty value counts as unset.
pub fn resolve_config_path_with(
    explicit: Option<PathBuf>,
    env_value: Option<OsString>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("tripwire").join("config.json"))
}
