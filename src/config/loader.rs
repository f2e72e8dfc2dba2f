//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::TemplateHeadersConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML.
    #[error("TOML parse error: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The file is not valid JSON.
    #[error("JSON parse error: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Load configuration from a TOML or JSON file, dispatching on the
/// file extension.
pub fn load_config(path: &Path) -> Result<TemplateHeadersConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(toml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
