//! Config parser with helpful error messages

use super::schema::TripwireConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick a format from the file extension. Anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parse a config file, choosing the format from its extension
pub fn parse_config_file(path: &Path) -> Result<TripwireConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse config content from string
pub fn parse_config_str(content: &str, format: ConfigFormat) -> Result<TripwireConfig> {
    let config: TripwireConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| enhance_json_error(e, content))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| anyhow::anyhow!("TOML parsing error: {}", e))?
        }
    };

    config.validate()?;

    Ok(config)
}

/// Add the offending source lines to a JSON error
fn enhance_json_error(error: serde_json::Error, content: &str) -> anyhow::Error {
    let line_num = error.line();
    if line_num == 0 {
        return anyhow::anyhow!("JSON parsing error: {}", error);
    }

    let context = get_line_context(content, line_num);
    anyhow::anyhow!(
        "JSON parsing error at line {}, column {}:\n{}\n\nError: {}",
        line_num,
        error.column(),
        context,
        error
    )
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

